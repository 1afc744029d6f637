//! Core traits and types for ftpgate secret store back-ends.

pub mod secret;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
