//! The payload handed back to the gateway.

use super::{AuthMode, AuthenticationError, CredentialRecord, Field, Protocol};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

/// Tells the gateway how to interpret the home directory settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HomeDirectoryType {
    /// `HomeDirectoryDetails` holds logical directory mappings
    Logical,
}

/// Session settings for an authenticated user.
///
/// `HomeDirectoryDetails` and `HomeDirectory` are not meant to be used together, but both are
/// passed on when the record holds both. What the gateway makes of that is up to the gateway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthResponse {
    /// The IAM role for the session. Always present, empty when the record has none.
    pub role: String,
    /// Session policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Logical directory mappings, passed through as stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_directory_details: Option<Value>,
    /// Set whenever `home_directory_details` is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_directory_type: Option<HomeDirectoryType>,
    /// Plain home directory path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_directory: Option<String>,
    /// Keys the gateway checks the client's key against. Only set for key based logins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<String>>,
}

/// The outcome of a login attempt as seen by the gateway.
///
/// A denied login serializes to `{}`, whatever the reason. The reason is deliberately not exposed.
#[derive(Clone, Debug, PartialEq)]
pub enum Authorization {
    /// The user may log in with these settings
    Granted(AuthResponse),
    /// The user may not log in
    Denied,
}

impl Authorization {
    /// True if the login is allowed.
    pub fn is_granted(&self) -> bool {
        matches!(self, Authorization::Granted(_))
    }
}

impl Serialize for Authorization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Authorization::Granted(response) => response.serialize(serializer),
            Authorization::Denied => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Assembles the session settings from the record of an authenticated user.
///
/// Key based logins without any public key in the record fail here, there would be nothing for
/// the gateway to check the client's key against.
pub fn build_response(record: &CredentialRecord, mode: AuthMode, protocol: &Protocol) -> Result<AuthResponse, AuthenticationError> {
    let role = match record.resolve(Field::Role, protocol) {
        Some(role) => as_text(role),
        None => {
            tracing::debug!("no field match for role, setting empty string in response");
            String::new()
        }
    };

    let policy = record.resolve(Field::Policy, protocol).map(as_text);

    let home_directory_details = record.resolve(Field::HomeDirectoryDetails, protocol).cloned();
    let home_directory_type = home_directory_details.as_ref().map(|_| {
        tracing::debug!("HomeDirectoryDetails found, setting HomeDirectoryType to LOGICAL");
        HomeDirectoryType::Logical
    });

    let home_directory = record.resolve(Field::HomeDirectory, protocol).map(as_text);
    if home_directory.is_some() && home_directory_details.is_some() {
        tracing::warn!("both HomeDirectory and HomeDirectoryDetails are set, passing both on");
    }

    let public_keys = match mode {
        AuthMode::Password => None,
        AuthMode::Ssh => Some(public_keys(record, protocol).ok_or(AuthenticationError::NoPublicKey)?),
    };

    Ok(AuthResponse {
        role,
        policy,
        home_directory_details,
        home_directory_type,
        home_directory,
        public_keys,
    })
}

fn public_keys(record: &CredentialRecord, protocol: &Protocol) -> Option<Vec<String>> {
    match record.resolve(Field::PublicKey, protocol)? {
        Value::String(key) => Some(vec![key.clone()]),
        Value::Array(items) => {
            let keys: Vec<String> = items.iter().filter_map(Value::as_str).filter(|k| !k.is_empty()).map(str::to_string).collect();
            (!keys.is_empty()).then_some(keys)
        }
        _ => None,
    }
}

// Strings go out as they are, anything else as its JSON text.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
