//! The decision logic: who may log in, and with which session settings.
//!
//! A login attempt goes through these steps:
//!
//! 1. [`AuthMode::select`] picks password or key based authentication, purely from whether a
//!    password was sent.
//! 2. The [`CredentialRecord`] of the user is fetched from a secret store and parsed.
//! 3. [`authenticate`] verifies the password (password logins only) and [`check_source_ip`] checks
//!    the client's address against the record's accepted network.
//! 4. [`build_response`] assembles the [`AuthResponse`].
//!
//! Every field is read through [`CredentialRecord::resolve`], which prefers a protocol specific
//! key like `SFTPPublicKey` over the generic `PublicKey`.
//!
//! Any failure along the way is an [`AuthenticationError`] and ends up as
//! [`Authorization::Denied`].

mod authenticator;
mod error;
mod network;
mod password;
mod protocol;
mod record;
mod response;

pub use authenticator::{AuthMode, authenticate};
pub use error::AuthenticationError;
pub use network::{check_source_ip, parse_network};
pub use password::Password;
pub use protocol::Protocol;
pub use record::{CredentialRecord, Field, MalformedRecord};
pub use response::{AuthResponse, Authorization, HomeDirectoryType, build_response};
