//! A secret store back-end for ftpgate that looks up credential records in
//! [AWS Secrets Manager](https://aws.amazon.com/secrets-manager/).
//!
//! # Usage
//!
//! ```no_run
//! use ftpgate_core::secret::SecretStore;
//! use ftpgate_secrets_aws::SecretsManager;
//!
//! # async fn demo() {
//! let store = SecretsManager::builder().region("eu-west-1").build().await;
//! let secret = store.get_secret("ftpSecret/s-1234/alice").await;
//! # }
//! ```
//!
//! The client is built once and is meant to be shared for the lifetime of the process; it keeps
//! its connection pool and credentials cache between lookups.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::{
    Client,
    config::Region,
    error::ProvideErrorMetadata,
    operation::get_secret_value::{GetSecretValueError, GetSecretValueOutput},
};
use ftpgate_core::secret::{Error, ErrorKind, Result, SecretStore, SecretValue};

/// A [`SecretStore`](ftpgate_core::secret::SecretStore) backed by AWS Secrets Manager.
#[derive(Clone, Debug)]
pub struct SecretsManager {
    client: Client,
}

/// Used to build a [`SecretsManager`] store.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    region: Option<String>,
    endpoint_url: Option<String>,
}

impl Builder {
    /// Overrides the region found by the default provider chain (`AWS_REGION`, profile, IMDS).
    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sends requests to this endpoint instead of the regional AWS endpoint. Useful for VPC
    /// endpoints and local emulators.
    pub fn endpoint_url<S: Into<String>>(mut self, url: S) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Loads the shared AWS configuration and creates the store.
    pub async fn build(self) -> SecretsManager {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = self.region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut conf = aws_sdk_secretsmanager::config::Builder::from(&sdk_config);
        if let Some(url) = self.endpoint_url {
            conf = conf.endpoint_url(url);
        }
        tracing::info!(region = ?sdk_config.region(), "created Secrets Manager client");
        SecretsManager::new(Client::from_conf(conf.build()))
    }
}

impl SecretsManager {
    /// Wraps an existing Secrets Manager client.
    pub fn new(client: Client) -> Self {
        SecretsManager { client }
    }

    /// Returns a [`Builder`] to configure region and endpoint.
    pub fn builder() -> Builder {
        Builder::default()
    }
}

#[async_trait]
impl SecretStore for SecretsManager {
    #[tracing_attributes::instrument(skip(self))]
    async fn get_secret(&self, secret_id: &str) -> Result<SecretValue> {
        let output = self.client.get_secret_value().secret_id(secret_id).send().await.map_err(|err| {
            let kind = err.as_service_error().map(error_kind).unwrap_or(ErrorKind::Unavailable);
            let code = err.as_service_error().and_then(|e| e.code()).unwrap_or("-");
            tracing::warn!(%kind, %code, "error talking to Secrets Manager");
            Error::new(kind, err)
        })?;
        secret_value(output)
    }

    fn name(&self) -> &str {
        "secretsmanager"
    }
}

fn secret_value(output: GetSecretValueOutput) -> Result<SecretValue> {
    // Depending on how the secret was created, one of these is populated.
    if let Some(s) = output.secret_string() {
        tracing::debug!("found secret string");
        return Ok(SecretValue::Text(s.to_string()));
    }
    if let Some(b) = output.secret_binary() {
        tracing::debug!("found binary secret");
        return Ok(SecretValue::from(b.as_ref().to_vec()));
    }
    Err(ErrorKind::Malformed.into())
}

fn error_kind(err: &GetSecretValueError) -> ErrorKind {
    if err.is_resource_not_found_exception() || err.is_invalid_request_exception() || err.is_invalid_parameter_exception() {
        return ErrorKind::NotFound;
    }
    if err.is_decryption_failure() {
        return ErrorKind::AccessDenied;
    }
    match err.code() {
        Some("AccessDeniedException") | Some("UnrecognizedClientException") => ErrorKind::AccessDenied,
        _ => ErrorKind::Unavailable,
    }
}
