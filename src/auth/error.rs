use super::{MalformedRecord, Protocol};
use ftpgate_core::secret;
use ipnet::IpNet;
use thiserror::Error;

/// The reasons a login can be refused.
///
/// These never reach the gateway: every one of them turns into the same empty authorization
/// response. They exist for logging and metrics.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// No password was sent over a protocol that can't do key based logins
    #[error("empty password not allowed for {0}")]
    EmptyPassword(Protocol),
    /// The secret could not be fetched
    #[error("could not look up credential record")]
    SecretLookup(#[from] secret::Error),
    /// The secret doesn't hold a usable credential record
    #[error("could not read credential record")]
    MalformedRecord(#[from] MalformedRecord),
    /// A password was sent but the record doesn't hold one
    #[error("no field match in credential record for password")]
    NoStoredPassword,
    /// The password doesn't match the stored one
    #[error("incoming password does not match stored")]
    BadPassword,
    /// Key based login but the record holds no public key
    #[error("no public keys found")]
    NoPublicKey,
    /// The accepted network field doesn't hold a valid network
    #[error("invalid accepted IP network {0:?}")]
    InvalidNetwork(String),
    /// The client's source IP can't be parsed
    #[error("invalid source IP {0:?}")]
    InvalidSourceIp(String),
    /// The client connects from outside the accepted network
    #[error("source IP {ip} not in accepted network {network}")]
    SourceIpRejected {
        /// The client's address
        ip: String,
        /// The configured network
        network: IpNet,
    },
}

impl AuthenticationError {
    /// A short, stable label for this failure, suitable for metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthenticationError::EmptyPassword(_) => "empty_password",
            AuthenticationError::SecretLookup(e) => match e.kind() {
                secret::ErrorKind::NotFound => "secret_not_found",
                secret::ErrorKind::AccessDenied => "secret_access_denied",
                secret::ErrorKind::Unavailable => "secret_store_unavailable",
                secret::ErrorKind::Malformed => "malformed_secret",
            },
            AuthenticationError::MalformedRecord(_) => "malformed_secret",
            AuthenticationError::NoStoredPassword => "no_stored_password",
            AuthenticationError::BadPassword => "bad_password",
            AuthenticationError::NoPublicKey => "no_public_key",
            AuthenticationError::InvalidNetwork(_) => "invalid_network",
            AuthenticationError::InvalidSourceIp(_) => "invalid_source_ip",
            AuthenticationError::SourceIpRejected { .. } => "source_ip_rejected",
        }
    }
}
