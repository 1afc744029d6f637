use crate::BoxError;
use derive_more::Display;
use thiserror::Error;

/// The Error returned by secret store back-ends. Whatever the kind, the identity provider treats a
/// failed lookup as a failed login. The kind only shows up in logs and metrics so back-ends should
/// still pick it carefully.
#[derive(Debug, Error)]
#[error("secret store error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates a new secret store error
    pub fn new<E>(kind: ErrorKind, error: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            source: Some(error.into()),
        }
    }

    /// What went wrong, in terms the identity provider understands
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

/// The `ErrorKind` variants that can be produced by the [`SecretStore`] implementations.
///
/// [`SecretStore`]: super::SecretStore
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// No secret exists under the requested id. This is the normal outcome for unknown users.
    #[display("secret not found")]
    NotFound,
    /// The store refused access to the secret, for instance because of missing permissions or a
    /// key that could not be used for decryption.
    #[display("access denied")]
    AccessDenied,
    /// The store could not be reached or failed internally.
    #[display("secret store unavailable")]
    Unavailable,
    /// A secret was found but holds neither text nor binary content that can be handed out.
    #[display("malformed secret")]
    Malformed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as _;

    #[test]
    fn kind_is_part_of_display() {
        let err = Error::from(ErrorKind::NotFound);
        assert_eq!("secret store error: secret not found", err.to_string());
    }

    #[test]
    fn source_is_kept() {
        let err = Error::new(ErrorKind::Unavailable, "connection reset");
        assert_eq!(ErrorKind::Unavailable, err.kind());
        assert_eq!("connection reset", err.source().map(|s| s.to_string()).unwrap_or_default());
    }
}
