//! Contains the error type used by the HTTP endpoint

use crate::BoxError;

use std::net::SocketAddr;
use thiserror::Error;

/// Error returned by [`serve`](crate::server::serve) and [`bind`](crate::server::bind)
#[derive(Error, Debug)]
#[error("server error: {msg}")]
pub struct ServerError {
    msg: String,
    #[source]
    source: BoxError,
}

impl ServerError {
    fn new<E: std::error::Error + Send + Sync + 'static>(msg: impl Into<String>, source: E) -> ServerError {
        ServerError {
            msg: msg.into(),
            source: Box::new(source),
        }
    }

    pub(super) fn bind(addr: SocketAddr, source: std::io::Error) -> ServerError {
        ServerError::new(format!("could not bind to {}", addr), source)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::new("io error", e)
    }
}
