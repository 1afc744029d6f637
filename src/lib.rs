//! ftpgate is a custom identity provider for managed FTP, FTPS and SFTP gateways.
//!
//! The gateway forwards every login attempt: server id, username, protocol, the client's source IP
//! and, for password logins, the password. ftpgate looks up the user's credential record in a
//! secret store under `ftpSecret/{serverId}/{username}`, checks the password and source IP, and
//! answers with the session settings: IAM role, optional policy, home directory and, for key based
//! logins, the user's public keys. Refused logins get an empty object.
//!
//! It can be driven in three ways:
//!
//! - as a library, through [`IdentityProvider::authorize`]
//! - as an AWS Lambda function behind API Gateway, see [`lambda`] and [`handler`]
//! - as a plain HTTP service, see [`server`]
//!
//! # Quick Start
//!
//! ```no_run
//! use ftpgate::{IdentityProvider, request::AuthRequest};
//! use ftpgate_secrets_jsonfile::JsonFileSecretStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let store = JsonFileSecretStore::from_file("secrets.json")?;
//! let idp = IdentityProvider::new(Arc::new(store));
//!
//! let request = AuthRequest {
//!     server_id: "s-1234".to_string(),
//!     username: "alice".to_string(),
//!     protocol: "SFTP".into(),
//!     source_ip: "10.0.0.1".to_string(),
//!     password: "secret".into(),
//! };
//! println!("{}", serde_json::to_string(&idp.authorize(&request).await)?);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod handler;
pub mod lambda;
pub(crate) mod metrics;
pub mod options;
pub mod provider;
pub mod request;
pub mod server;

pub use crate::auth::{AuthResponse, Authorization};
pub use crate::options::Options;
pub use crate::provider::IdentityProvider;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
