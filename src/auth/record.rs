//! The credential record stored per user and the rule used to read fields from it.

use super::Protocol;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use ftpgate_core::secret::SecretValue;
use serde_json::{Map, Value};
use std::{borrow::Cow, fmt};
use thiserror::Error;

/// The logical fields ftpgate reads from a [`CredentialRecord`].
///
/// Each of them may be stored either under its plain name or prefixed with a protocol name, e.g.
/// `SFTPPublicKey`. The prefixed variant wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The clear text password
    Password,
    /// ARN of the IAM role the gateway assumes for the session
    Role,
    /// Optional session policy, scoping down the role
    Policy,
    /// Path the user lands in
    HomeDirectory,
    /// Logical directory mappings, used instead of `HomeDirectory`
    HomeDirectoryDetails,
    /// SSH public key(s) for key based logins
    PublicKey,
    /// CIDR network the client must connect from
    AcceptedIpNetwork,
}

impl Field {
    /// The generic (unprefixed) key of this field.
    pub fn name(self) -> &'static str {
        match self {
            Field::Password => "Password",
            Field::Role => "Role",
            Field::Policy => "Policy",
            Field::HomeDirectory => "HomeDirectory",
            Field::HomeDirectoryDetails => "HomeDirectoryDetails",
            Field::PublicKey => "PublicKey",
            Field::AcceptedIpNetwork => "AcceptedIpNetwork",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a secret doesn't hold a JSON object.
#[derive(Debug, Error)]
pub enum MalformedRecord {
    /// The payload isn't valid JSON
    #[error("credential record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload is JSON but not an object
    #[error("credential record is not a JSON object")]
    NotAnObject,
}

/// The credentials and session settings of one user on one server, as found in the secret store.
///
/// There is no fixed schema: fields are looked up by name when needed and may hold strings or
/// structured JSON.
#[derive(Clone, Default, PartialEq)]
pub struct CredentialRecord {
    fields: Map<String, Value>,
}

impl CredentialRecord {
    /// Parses the JSON object held by a secret.
    ///
    /// Binary secrets are expected to hold the base64 encoded JSON text. Binary content that isn't
    /// valid base64 is parsed as JSON as is.
    pub fn from_secret(secret: &SecretValue) -> Result<Self, MalformedRecord> {
        let json = match secret {
            SecretValue::Text(s) => Cow::Borrowed(s.as_bytes()),
            SecretValue::Binary(b) => BASE64.decode(b.trim_ascii()).map_or(Cow::Borrowed(b.as_ref()), Cow::Owned),
        };
        match serde_json::from_slice(&json)? {
            Value::Object(fields) => Ok(CredentialRecord { fields }),
            _ => Err(MalformedRecord::NotAnObject),
        }
    }

    /// Resolves a logical field for the given protocol.
    ///
    /// The protocol prefixed key is tried first and, when it exists, its value is used even if it
    /// turns out to be empty. Otherwise the generic key is used. Empty values (`null`, `false`,
    /// `0`, `""`, `[]` and `{}`) count as absent.
    pub fn resolve(&self, field: Field, protocol: &Protocol) -> Option<&Value> {
        let prefixed = format!("{}{}", protocol, field);
        let value = match self.fields.get(&prefixed) {
            Some(value) => {
                tracing::debug!(%field, key = %prefixed, "found protocol-specific field");
                Some(value)
            }
            None => self.fields.get(field.name()),
        };
        value.filter(|v| is_present(v))
    }
}

impl From<Map<String, Value>> for CredentialRecord {
    fn from(fields: Map<String, Value>) -> Self {
        CredentialRecord { fields }
    }
}

// Records hold passwords, only ever show the keys.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.fields.keys()).finish()
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
