//! [`SecretStore`] implementation that serves credential records from a JSON file.
//!
//! Meant for running ftpgate locally or in tests without a cloud secret store. The file maps
//! secret ids to credential records:
//!
//! ```json
//! {
//!   "ftpSecret/s-1234/alice": {
//!     "Password": "not secret",
//!     "Role": "arn:aws:iam::123456789012:role/ftp-alice",
//!     "HomeDirectory": "/bucket/alice"
//!   },
//!   "ftpSecret/s-1234/bob": "{\"SFTPPublicKey\": \"ssh-ed25519 AAAA...\"}"
//! }
//! ```
//!
//! A record may be given as a JSON object or as a string holding the JSON text, the latter being
//! how secrets are usually exported from a secret manager. The file itself may be plain JSON,
//! gzipped JSON or base64 encoded gzipped JSON.
//!
//! [`SecretStore`]: ftpgate_core::secret::SecretStore

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use flate2::read::GzDecoder;
use ftpgate_core::secret::{ErrorKind, Result, SecretStore, SecretValue};
use serde_json::Value;
use std::{collections::HashMap, fs, io::Read, path::Path};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// [`SecretStore`](ftpgate_core::secret::SecretStore) implementation that looks up secrets in a
/// JSON document loaded once at start-up.
#[derive(Clone, Debug)]
pub struct JsonFileSecretStore {
    secrets: HashMap<String, SecretValue>,
}

impl JsonFileSecretStore {
    /// Initialize a new [`JsonFileSecretStore`] from file.
    pub fn from_file<P: AsRef<Path>>(filename: P) -> std::result::Result<Self, LoadError> {
        let content = fs::read(filename)?;
        JsonFileSecretStore::from_json(decode(content)?)
    }

    /// Initialize a new [`JsonFileSecretStore`] from a JSON string.
    pub fn from_json<T: Into<String>>(json: T) -> std::result::Result<Self, LoadError> {
        let doc: HashMap<String, Value> = serde_json::from_str(&json.into())?;
        let secrets = doc
            .into_iter()
            .map(|(secret_id, value)| {
                let value = match value {
                    Value::String(s) => SecretValue::Text(s),
                    other => SecretValue::Text(other.to_string()),
                };
                (secret_id, value)
            })
            .collect();
        Ok(JsonFileSecretStore { secrets })
    }

    /// The number of secrets held by this store.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// True if the file did not define any secret.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

// Undoes the optional base64 and gzip layers around the JSON text.
fn decode(content: Vec<u8>) -> std::result::Result<String, LoadError> {
    let content = match BASE64.decode(content.trim_ascii()) {
        Ok(decoded) => decoded,
        Err(_) => content,
    };
    if content.starts_with(&GZIP_MAGIC) {
        let mut json = String::new();
        GzDecoder::new(content.as_slice()).read_to_string(&mut json)?;
        Ok(json)
    } else {
        Ok(String::from_utf8(content)?)
    }
}

#[async_trait]
impl SecretStore for JsonFileSecretStore {
    #[tracing_attributes::instrument(skip(self))]
    async fn get_secret(&self, secret_id: &str) -> Result<SecretValue> {
        match self.secrets.get(secret_id) {
            Some(value) => Ok(value.clone()),
            None => {
                tracing::debug!("no such secret in JSON file");
                Err(ErrorKind::NotFound.into())
            }
        }
    }

    fn name(&self) -> &str {
        "jsonfile"
    }
}
