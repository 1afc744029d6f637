//! Decides how a login is authenticated and checks the presented credentials.

use super::{AuthenticationError, CredentialRecord, Field, Password, Protocol};
use derive_more::Display;
use serde_json::Value;

/// How a login is authenticated.
///
/// Determined solely by whether the client sent a password, never by anything stored for the
/// user.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum AuthMode {
    /// The client sent a password, which we verify against the stored one
    #[display("PASSWORD")]
    Password,
    /// The client sent no password. The gateway verifies the client's key itself, against the
    /// public keys we hand out.
    #[display("SSH")]
    Ssh,
}

impl AuthMode {
    /// Picks the mode for a login attempt. Fails for an empty password over FTP or FTPS, before
    /// anything is looked up.
    pub fn select(password: &Password, protocol: &Protocol) -> Result<AuthMode, AuthenticationError> {
        if !password.is_empty() {
            return Ok(AuthMode::Password);
        }
        if protocol.requires_password() {
            return Err(AuthenticationError::EmptyPassword(protocol.clone()));
        }
        Ok(AuthMode::Ssh)
    }
}

/// Verifies the presented credentials against the record.
///
/// Key based logins always pass here, the public keys are checked later on when building the
/// response.
pub fn authenticate(mode: AuthMode, record: &CredentialRecord, password: &Password, protocol: &Protocol) -> Result<(), AuthenticationError> {
    match mode {
        AuthMode::Ssh => {
            tracing::debug!("skipping password check for key based login");
            Ok(())
        }
        AuthMode::Password => match record.resolve(Field::Password, protocol) {
            None => Err(AuthenticationError::NoStoredPassword),
            Some(Value::String(stored)) if password.matches(stored) => Ok(()),
            Some(_) => Err(AuthenticationError::BadPassword),
        },
    }
}
