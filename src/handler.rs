//! The event adapter: API Gateway proxy event in, proxy response out.

use crate::{
    IdentityProvider,
    request::{AuthRequest, RequestError},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// What we hand back to API Gateway. The authorization travels as JSON text in `body`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// Always 200, refused logins included
    pub status_code: u16,
    /// The serialized [`Authorization`](crate::auth::Authorization)
    pub body: String,
}

/// Faults while handling an event. Refused logins are not faults.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event is not a usable authorization request
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The response could not be serialized
    #[error("could not encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl HandlerError {
    /// Short name of the fault, as reported to the Lambda runtime.
    pub fn error_type(&self) -> &'static str {
        match self {
            HandlerError::Request(RequestError::MissingField(_)) => "MissingField",
            HandlerError::Request(RequestError::InvalidEncoding(_)) => "InvalidEncoding",
            HandlerError::Request(RequestError::InvalidEvent(_)) => "InvalidEvent",
            HandlerError::Encode(_) => "EncodeError",
        }
    }
}

/// Handles a single proxy event.
pub async fn handle_event(idp: &IdentityProvider, event: Value) -> Result<ProxyResponse, HandlerError> {
    let request = AuthRequest::try_from(event)?;
    let authorization = idp.authorize(&request).await;
    let body = serde_json::to_string(&authorization).map_err(HandlerError::Encode)?;
    Ok(ProxyResponse { status_code: 200, body })
}
