//! The `ftpgate` binary.
//!
//! Runs as a Lambda function when `AWS_LAMBDA_RUNTIME_API` is set, as an HTTP service otherwise.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FTPGATE_SECRET_PREFIX` | `ftpSecret` | First path segment of secret ids |
//! | `FTPGATE_LISTEN` | `127.0.0.1:8080` | HTTP bind address |
//! | `FTPGATE_SECRETS_FILE` | *(unset)* | Read credential records from this JSON file instead of Secrets Manager |
//! | `FTPGATE_SECRETS_ENDPOINT` | *(unset)* | Secrets Manager endpoint override |
//! | `AWS_REGION` | *(SDK default)* | Secrets Manager region |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `LOG_FORMAT` | `text` | `json` for one JSON object per line |

use ftpgate::{IdentityProvider, Options, lambda, server};
use ftpgate_core::secret::SecretStore;
use ftpgate_secrets_aws::SecretsManager;
use ftpgate_secrets_jsonfile::JsonFileSecretStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn init_tracing() -> Result<(), BoxError> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(&level).map_err(|e| format!("invalid log level filter {:?}: {}", level, e))?
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init()?,
        _ => builder.try_init()?,
    }
    Ok(())
}

async fn secret_store(options: &Options) -> Result<Arc<dyn SecretStore>, BoxError> {
    if let Some(path) = &options.secrets_file {
        let store = JsonFileSecretStore::from_file(path)?;
        tracing::info!(path = %path.display(), secrets = store.len(), "using JSON file secret store");
        return Ok(Arc::new(store));
    }

    let mut builder = SecretsManager::builder();
    if let Some(region) = &options.region {
        builder = builder.region(region.clone());
    }
    if let Some(url) = &options.secrets_endpoint {
        builder = builder.endpoint_url(url.clone());
    }
    tracing::info!(region = ?options.region, endpoint = ?options.secrets_endpoint, "using Secrets Manager secret store");
    Ok(Arc::new(builder.build().await))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing()?;

    let options = Options::from_env()?;
    let idp = IdentityProvider::new(secret_store(&options).await?).with_secret_prefix(options.secret_prefix.clone());

    match &options.runtime_api {
        Some(runtime_api) => {
            tracing::info!(%runtime_api, "starting in Lambda mode");
            lambda::run(lambda::RuntimeClient::new(runtime_api), idp).await?;
        }
        None => {
            let listener = server::bind(options.listen).await?;
            server::serve(listener, idp, shutdown_signal()).await?;
        }
    }
    Ok(())
}
