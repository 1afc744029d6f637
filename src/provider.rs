//! The identity provider ties the secret store and the decision logic together.

use crate::{
    auth::{AuthMode, AuthResponse, Authorization, AuthenticationError, CredentialRecord, authenticate, build_response, check_source_ip},
    metrics,
    request::AuthRequest,
};
use ftpgate_core::secret::SecretStore;
use std::sync::Arc;

/// The secret id prefix used unless configured otherwise.
pub const DEFAULT_SECRET_PREFIX: &str = "ftpSecret";

/// Answers authorization requests from credential records held in a [`SecretStore`].
///
/// Cheap to clone. All clones share the same store client.
///
/// # Example
///
/// ```no_run
/// # async fn example(store: std::sync::Arc<dyn ftpgate_core::secret::SecretStore>, request: ftpgate::request::AuthRequest) {
/// use ftpgate::IdentityProvider;
///
/// let idp = IdentityProvider::new(store).with_secret_prefix("sftpUsers");
/// let authorization = idp.authorize(&request).await;
/// println!("{}", serde_json::to_string(&authorization).unwrap());
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct IdentityProvider {
    store: Arc<dyn SecretStore>,
    secret_prefix: String,
}

impl IdentityProvider {
    /// Creates a provider reading from the given store, using the default secret prefix.
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        IdentityProvider {
            store,
            secret_prefix: DEFAULT_SECRET_PREFIX.to_string(),
        }
    }

    /// Sets the first path segment of the secret ids.
    pub fn with_secret_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.secret_prefix = prefix.into();
        self
    }

    /// The id of the secret holding the credential record of `username` on `server_id`.
    pub fn secret_id(&self, server_id: &str, username: &str) -> String {
        format!("{}/{}/{}", self.secret_prefix, server_id, username)
    }

    /// Decides on a login attempt.
    ///
    /// This never fails: every reason to refuse the login results in [`Authorization::Denied`],
    /// which is logged with its reason but not exposed any further.
    #[tracing_attributes::instrument(
        skip(self, request),
        fields(
            server_id = %request.server_id,
            username = %request.username,
            protocol = %request.protocol,
            source_ip = %request.source_ip,
        )
    )]
    pub async fn authorize(&self, request: &AuthRequest) -> Authorization {
        let mode = match AuthMode::select(&request.password, &request.protocol) {
            Ok(mode) => mode,
            Err(err) => return deny("NONE", err),
        };
        tracing::debug!(%mode, "selected authentication mode");

        match self.verify(mode, request).await {
            Ok(response) => {
                tracing::info!(%mode, "login authorized");
                metrics::add_authorization_metric(&mode.to_string(), true);
                Authorization::Granted(response)
            }
            Err(err) => deny(&mode.to_string(), err),
        }
    }

    async fn verify(&self, mode: AuthMode, request: &AuthRequest) -> Result<AuthResponse, AuthenticationError> {
        let secret_id = self.secret_id(&request.server_id, &request.username);
        let secret = self.store.get_secret(&secret_id).await?;
        let record = CredentialRecord::from_secret(&secret)?;

        authenticate(mode, &record, &request.password, &request.protocol)?;
        check_source_ip(&record, &request.source_ip, &request.protocol)?;

        build_response(&record, mode, &request.protocol)
    }
}

fn deny(mode: &str, err: AuthenticationError) -> Authorization {
    tracing::warn!(reason = err.reason(), error = %err, "login refused");
    metrics::add_authorization_metric(mode, false);
    metrics::add_failure_metric(err.reason());
    Authorization::Denied
}
