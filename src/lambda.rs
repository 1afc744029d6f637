//! A minimal client for the AWS Lambda Runtime API, and the invocation loop on top of it.
//!
//! The loop fetches one invocation at a time, runs it through
//! [`handle_event`](crate::handler::handle_event) and posts back either the proxy response or,
//! for malformed events, an error document.

use crate::{
    IdentityProvider,
    handler::{HandlerError, ProxyResponse, handle_event},
    request::RequestError,
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use serde_json::{Value, json};
use thiserror::Error;

const API_VERSION: &str = "2018-06-01";
const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";

/// Talking to the Runtime API failed. The loop gives up on these, Lambda restarts the process.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The request could not be built
    #[error("invalid runtime API request: {0}")]
    Request(#[from] hyper::http::Error),
    /// The request could not be sent
    #[error("runtime API http client error: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),
    /// The response body could not be read
    #[error("error while receiving runtime API response: {0}")]
    Body(#[from] hyper::Error),
    /// The Runtime API answered with something other than 2xx
    #[error("runtime API returned {0}")]
    Status(StatusCode),
    /// The next invocation came without a request id
    #[error("invocation without request id header")]
    MissingRequestId,
    /// A payload could not be serialized
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One pending invocation.
#[derive(Debug)]
pub struct Invocation {
    /// Identifies the invocation towards the Runtime API
    pub request_id: String,
    /// The raw event payload
    pub payload: Bytes,
}

/// Client for the Runtime API at `AWS_LAMBDA_RUNTIME_API`.
#[derive(Clone, Debug)]
pub struct RuntimeClient {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
}

impl RuntimeClient {
    /// Creates a client for the Runtime API listening at `host:port`.
    pub fn new(runtime_api: &str) -> Self {
        RuntimeClient {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url: format!("http://{}/{}/runtime", runtime_api.trim_end_matches('/'), API_VERSION),
        }
    }

    /// Waits for the next invocation.
    pub async fn next_invocation(&self) -> Result<Invocation, RuntimeError> {
        let (request_id, payload) = self.send(Method::GET, format!("{}/invocation/next", self.base_url), Bytes::new()).await?;
        Ok(Invocation {
            request_id: request_id.ok_or(RuntimeError::MissingRequestId)?,
            payload,
        })
    }

    /// Posts the result of an invocation.
    pub async fn send_response(&self, request_id: &str, response: &ProxyResponse) -> Result<(), RuntimeError> {
        let body = serde_json::to_vec(response)?;
        let url = format!("{}/invocation/{}/response", self.base_url, request_id);
        self.send(Method::POST, url, body.into()).await.map(|_| ())
    }

    /// Reports a failed invocation.
    pub async fn send_error(&self, request_id: &str, error: &HandlerError) -> Result<(), RuntimeError> {
        let body = serde_json::to_vec(&json!({
            "errorMessage": error.to_string(),
            "errorType": error.error_type(),
        }))?;
        let url = format!("{}/invocation/{}/error", self.base_url, request_id);
        self.send(Method::POST, url, body.into()).await.map(|_| ())
    }

    async fn send(&self, method: Method, url: String, body: Bytes) -> Result<(Option<String>, Bytes), RuntimeError> {
        let req = Request::builder()
            .method(method)
            .header("Content-type", "application/json")
            .uri(url)
            .body(Full::new(body))?;

        let resp = self.client.request(req).await?;
        let (parts, body) = resp.into_parts();
        let body = BodyExt::collect(body).await?.to_bytes();
        if !parts.status.is_success() {
            tracing::error!(status = %parts.status, body = %String::from_utf8_lossy(&body), "runtime API error");
            return Err(RuntimeError::Status(parts.status));
        }

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok((request_id, body))
    }
}

/// Handles invocations until the Runtime API fails on us.
pub async fn run(client: RuntimeClient, idp: IdentityProvider) -> Result<(), RuntimeError> {
    tracing::info!("waiting for invocations");
    loop {
        let invocation = client.next_invocation().await?;
        handle_invocation(&client, &idp, invocation).await?;
    }
}

#[tracing_attributes::instrument(skip_all, fields(request_id = %invocation.request_id))]
async fn handle_invocation(client: &RuntimeClient, idp: &IdentityProvider, invocation: Invocation) -> Result<(), RuntimeError> {
    let result = match serde_json::from_slice::<Value>(&invocation.payload) {
        Ok(event) => handle_event(idp, event).await,
        Err(err) => Err(HandlerError::Request(RequestError::InvalidEvent(err))),
    };
    match result {
        Ok(response) => client.send_response(&invocation.request_id, &response).await,
        Err(err) => {
            tracing::warn!(error = %err, "could not handle event");
            client.send_error(&invocation.request_id, &err).await
        }
    }
}
