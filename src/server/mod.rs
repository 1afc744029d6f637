//! A small HTTP endpoint exposing the identity provider outside of Lambda.
//!
//! Routes:
//!
//! - `GET /servers/{serverId}/users/{username}/config?protocol=...&sourceIp=...` answers an
//!   authorization request. The password travels in the `Password` header. Without a `sourceIp`
//!   query parameter the peer address of the connection is used.
//! - `GET /health` reports liveness.
//! - `GET /metrics` renders the prometheus metrics, if the `prometheus` feature is enabled.

mod error;

pub use error::ServerError;

use crate::{
    IdentityProvider,
    request::{AuthRequest, PASSWORD_HEADER, RequestError},
    auth::Password,
};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode,
    header::{CONTENT_TYPE, HeaderValue},
    server::conn::http1,
    service::service_fn,
};
use hyper_util::{rt::TokioIo, server::graceful::GracefulShutdown};
use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::json;
use std::{convert::Infallible, future::Future, net::SocketAddr};
use tokio::net::TcpListener;

lazy_static! {
    static ref CONFIG_ROUTE: Regex = Regex::new(r"^/servers/([^/]+)/users/([^/]+)/config/?$").unwrap();
}

/// Binds a listener on the given address.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr).await.map_err(|e| ServerError::bind(addr, e))
}

/// Serves HTTP requests on `listener` until `shutdown` completes, then waits for in-flight
/// requests to finish.
pub async fn serve<F>(listener: TcpListener, idp: IdentityProvider, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    tracing::info!(addr = %listener.local_addr()?, "listening for authorization requests");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok(conn) => conn,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                };

                let idp = idp.clone();
                let service = service_fn(move |req| {
                    let idp = idp.clone();
                    async move { Ok::<_, Infallible>(handle_request(&idp, req, peer).await) }
                });
                let conn = graceful.watch(http1::Builder::new().serve_connection(TokioIo::new(stream), service));

                tokio::spawn(async move {
                    if let Err(err) = conn.await {
                        tracing::debug!(%peer, error = %err, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                tracing::info!("shutting down, draining connections");
                break;
            }
        }
    }

    graceful.shutdown().await;
    Ok(())
}

/// Routes a single request. The request body is never read.
pub async fn handle_request<B>(idp: &IdentityProvider, req: Request<B>, peer: SocketAddr) -> Response<Full<Bytes>> {
    let path = req.uri().path();

    if path == "/health" {
        return only_get(&req).unwrap_or_else(|| json_response(StatusCode::OK, json!({"status": "ok"}).to_string()));
    }

    #[cfg(feature = "prometheus")]
    if path == "/metrics" {
        if let Some(response) = only_get(&req) {
            return response;
        }
        return match crate::metrics::gather() {
            Ok(text) => response(StatusCode::OK, "text/plain; version=0.0.4", text),
            Err(err) => {
                tracing::error!(error = %err, "could not gather metrics");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "could not gather metrics")
            }
        };
    }

    if CONFIG_ROUTE.is_match(path) {
        if let Some(response) = only_get(&req) {
            return response;
        }
        return match auth_request(&req, peer) {
            Ok(request) => {
                let authorization = idp.authorize(&request).await;
                match serde_json::to_string(&authorization) {
                    Ok(body) => json_response(StatusCode::OK, body),
                    Err(err) => {
                        tracing::error!(error = %err, "could not encode response");
                        error_response(StatusCode::INTERNAL_SERVER_ERROR, "could not encode response")
                    }
                }
            }
            Err(err) => {
                tracing::info!(error = %err, "bad authorization request");
                error_response(StatusCode::BAD_REQUEST, &err.to_string())
            }
        };
    }

    error_response(StatusCode::NOT_FOUND, "not found")
}

fn auth_request<B>(req: &Request<B>, peer: SocketAddr) -> Result<AuthRequest, RequestError> {
    let path = req.uri().path();
    let captures = CONFIG_ROUTE.captures(path).ok_or(RequestError::MissingField("serverId"))?;
    let segment = |i: usize, name: &'static str| -> Result<String, RequestError> {
        let raw = captures.get(i).map(|m| m.as_str()).ok_or(RequestError::MissingField(name))?;
        let decoded = percent_decode_str(raw).decode_utf8().map_err(|_| RequestError::InvalidEncoding(name))?;
        if decoded.is_empty() {
            return Err(RequestError::MissingField(name));
        }
        Ok(decoded.into_owned())
    };

    let server_id = segment(1, "serverId")?;
    let username = segment(2, "username")?;
    let protocol = query_parameter(req, "protocol")?.ok_or(RequestError::MissingField("protocol"))?;
    let source_ip = query_parameter(req, "sourceIp")?.unwrap_or_else(|| peer.ip().to_string());
    let password = req
        .headers()
        .get(PASSWORD_HEADER)
        .map(|v| Password::new(Bytes::copy_from_slice(v.as_bytes())))
        .unwrap_or_default();

    Ok(AuthRequest {
        server_id,
        username,
        protocol: protocol.as_str().into(),
        source_ip,
        password,
    })
}

fn query_parameter<B>(req: &Request<B>, name: &'static str) -> Result<Option<String>, RequestError> {
    let Some(query) = req.uri().query() else {
        return Ok(None);
    };
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != name {
            continue;
        }
        let value = percent_decode_str(value).decode_utf8().map_err(|_| RequestError::InvalidEncoding(name))?;
        return Ok(Some(value.into_owned()).filter(|v| !v.is_empty()));
    }
    Ok(None)
}

fn only_get<B>(req: &Request<B>) -> Option<Response<Full<Bytes>>> {
    (req.method() != Method::GET).then(|| error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed"))
}

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    response(status, "application/json", body)
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, json!({ "message": message }).to_string())
}

fn response(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
