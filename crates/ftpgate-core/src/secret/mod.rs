//! Contains the [`SecretStore`] trait that can be implemented to plug a credential store into
//! ftpgate.
//!
//! Pre-made implementations exist in this workspace (search for `ftpgate-secrets-`) and you can
//! define your own to look up credential records wherever they live.
//!
//! To create a new secret store back-end:
//!
//! 1. Declare dependencies on the async-trait and ftpgate-core crates:
//!
//! ```toml
//! async-trait = "0.1.89"
//! ftpgate-core = { path = "../path/to/ftpgate-core" }
//! ```
//!
//! 2. Implement the [`SecretStore`] trait:
//!
//! ```no_run
//! use async_trait::async_trait;
//! use ftpgate_core::secret::{ErrorKind, Result, SecretStore, SecretValue};
//! use std::collections::HashMap;
//!
//! #[derive(Debug)]
//! struct StaticStore {
//!     secrets: HashMap<String, String>,
//! }
//!
//! #[async_trait]
//! impl SecretStore for StaticStore {
//!     async fn get_secret(&self, secret_id: &str) -> Result<SecretValue> {
//!         match self.secrets.get(secret_id) {
//!             Some(json) => Ok(SecretValue::Text(json.clone())),
//!             None => Err(ErrorKind::NotFound.into()),
//!         }
//!     }
//! }
//! ```
//!
//! Back-ends are created once per process and shared between requests, so they must be cheap to
//! call concurrently.

mod error;
pub use error::{Error, ErrorKind};

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::{self, Debug};

/// Result type used by [`SecretStore`] implementations.
pub type Result<T> = std::result::Result<T, Error>;

/// The raw payload of a secret as handed out by the store.
///
/// Depending on how the secret was written, stores hand out either a string or opaque bytes. Both
/// are expected to hold a JSON document; interpreting it is up to the caller.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// The secret was stored as a string
    Text(String),
    /// The secret was stored as binary data
    Binary(Bytes),
}

impl SecretValue {
    /// The payload as raw bytes, regardless of how it was stored.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SecretValue::Text(s) => s.as_bytes(),
            SecretValue::Binary(b) => b.as_ref(),
        }
    }
}

// Secrets hold passwords so we never print their content.
impl Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretValue::Text(s) => write!(f, "Text({} bytes)", s.len()),
            SecretValue::Binary(b) => write!(f, "Binary({} bytes)", b.len()),
        }
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue::Text(s)
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        SecretValue::Text(s.to_string())
    }
}

impl From<Vec<u8>> for SecretValue {
    fn from(v: Vec<u8>) -> Self {
        SecretValue::Binary(Bytes::from(v))
    }
}

/// Defines the requirements for secret store implementations.
///
/// A store resolves a secret id, for example `ftpSecret/s-1234/alice`, to its payload. Both a
/// missing secret and a refused lookup are reported as an [`Error`]; callers treat all of them as
/// a failed login.
#[async_trait]
pub trait SecretStore: Sync + Send + Debug {
    /// Fetches the secret stored under `secret_id`.
    async fn get_secret(&self, secret_id: &str) -> Result<SecretValue>;

    /// A short name for the store, used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
