//! Runtime configuration, read from the environment.

use crate::provider::DEFAULT_SECRET_PREFIX;
use std::{
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
};
use thiserror::Error;

/// The address the HTTP endpoint listens on by default.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

pub(crate) const ENV_SECRET_PREFIX: &str = "FTPGATE_SECRET_PREFIX";
pub(crate) const ENV_LISTEN: &str = "FTPGATE_LISTEN";
pub(crate) const ENV_SECRETS_FILE: &str = "FTPGATE_SECRETS_FILE";
pub(crate) const ENV_SECRETS_ENDPOINT: &str = "FTPGATE_SECRETS_ENDPOINT";
pub(crate) const ENV_REGION: &str = "AWS_REGION";
pub(crate) const ENV_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

/// Returned when an environment variable holds an unusable value.
#[derive(Debug, Error)]
#[error("invalid value {value:?} for {var}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    #[source]
    source: AddrParseError,
}

/// Settings of the `ftpgate` binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// First path segment of the secret ids
    pub secret_prefix: String,
    /// Where the HTTP endpoint listens
    pub listen: SocketAddr,
    /// Read credential records from this JSON file instead of Secrets Manager
    pub secrets_file: Option<PathBuf>,
    /// Secrets Manager region, defaults to the SDK's provider chain
    pub region: Option<String>,
    /// Secrets Manager endpoint override, e.g. for a local emulator
    pub secrets_endpoint: Option<String>,
    /// Host and port of the Lambda Runtime API. When set we run as a Lambda function.
    pub runtime_api: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            secret_prefix: DEFAULT_SECRET_PREFIX.to_string(),
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            secrets_file: None,
            region: None,
            secrets_endpoint: None,
            runtime_api: None,
        }
    }
}

impl Options {
    /// Reads the options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the options through the given lookup function. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut options = Options::default();
        if let Some(prefix) = get(ENV_SECRET_PREFIX) {
            options.secret_prefix = prefix;
        }
        if let Some(listen) = get(ENV_LISTEN) {
            options.listen = listen.parse().map_err(|source| ConfigError {
                var: ENV_LISTEN,
                value: listen.clone(),
                source,
            })?;
        }
        options.secrets_file = get(ENV_SECRETS_FILE).map(PathBuf::from);
        options.region = get(ENV_REGION);
        options.secrets_endpoint = get(ENV_SECRETS_ENDPOINT);
        options.runtime_api = get(ENV_RUNTIME_API);
        Ok(options)
    }

    /// Sets the secret id prefix.
    pub fn secret_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.secret_prefix = prefix.into();
        self
    }

    /// Sets the listen address of the HTTP endpoint.
    pub fn listen(mut self, addr: SocketAddr) -> Self {
        self.listen = addr;
        self
    }

    /// Reads credential records from a JSON file.
    pub fn secrets_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_file = Some(path.into());
        self
    }

    /// Sets the Secrets Manager endpoint.
    pub fn secrets_endpoint(mut self, url: impl Into<String>) -> Self {
        self.secrets_endpoint = Some(url.into());
        self
    }
}
