//! Turns whatever the gateway sends into an [`AuthRequest`].

use crate::auth::{Password, Protocol};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Name of the header carrying the client's password.
pub const PASSWORD_HEADER: &str = "Password";

/// A login attempt as forwarded by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRequest {
    /// The gateway server the client connected to
    pub server_id: String,
    /// The login name
    pub username: String,
    /// The protocol the client used
    pub protocol: Protocol,
    /// The client's address as seen by the gateway
    pub source_ip: String,
    /// Empty for key based logins
    pub password: Password,
}

/// Returned when the gateway's request can't be made sense of. Unlike a refused login, this is
/// reported back as a fault.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required field is missing or empty
    #[error("missing required field {0}")]
    MissingField(&'static str),
    /// A field is not valid UTF-8 after percent decoding
    #[error("field {0} is not valid UTF-8")]
    InvalidEncoding(&'static str),
    /// The event doesn't have the expected shape
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
}

/// The parts of an API Gateway proxy event we care about.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    /// Holds `serverId` and `username`
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    /// Holds `protocol` and optionally `sourceIp`
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Holds the password, if any
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Holds the client's source IP
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

/// Request context of a proxy event.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// The caller's identity
    #[serde(default)]
    pub identity: Option<Identity>,
}

/// Caller identity of a proxy event.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Address of the FTP/SFTP client
    #[serde(default)]
    pub source_ip: Option<String>,
}

impl GatewayEvent {
    /// Parses a raw proxy event.
    pub fn from_value(event: Value) -> Result<Self, RequestError> {
        Ok(serde_json::from_value(event)?)
    }

    fn path_parameter(&self, name: &'static str) -> Result<String, RequestError> {
        lookup(self.path_parameters.as_ref(), name).ok_or(RequestError::MissingField(name))
    }

    fn query_parameter(&self, name: &'static str) -> Option<String> {
        lookup(self.query_string_parameters.as_ref(), name)
    }

    fn source_ip(&self) -> Option<String> {
        self.request_context
            .as_ref()
            .and_then(|c| c.identity.as_ref())
            .and_then(|i| i.source_ip.clone())
            .filter(|ip| !ip.is_empty())
            .or_else(|| self.query_parameter("sourceIp"))
    }

    fn password(&self) -> Password {
        self.headers
            .as_ref()
            .and_then(|headers| header(headers, PASSWORD_HEADER))
            .map(Password::from)
            .unwrap_or_default()
    }
}

impl TryFrom<GatewayEvent> for AuthRequest {
    type Error = RequestError;

    fn try_from(event: GatewayEvent) -> Result<Self, Self::Error> {
        Ok(AuthRequest {
            server_id: event.path_parameter("serverId")?,
            username: event.path_parameter("username")?,
            protocol: event.query_parameter("protocol").ok_or(RequestError::MissingField("protocol"))?.as_str().into(),
            source_ip: event.source_ip().ok_or(RequestError::MissingField("sourceIp"))?,
            password: event.password(),
        })
    }
}

impl TryFrom<Value> for AuthRequest {
    type Error = RequestError;

    fn try_from(event: Value) -> Result<Self, Self::Error> {
        GatewayEvent::from_value(event)?.try_into()
    }
}

/// Looks up a header by name. An exact match wins, otherwise case is ignored.
pub fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .or_else(|| headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))
        .map(String::as_str)
}

fn lookup(params: Option<&HashMap<String, String>>, name: &str) -> Option<String> {
    params?.get(name).filter(|v| !v.is_empty()).cloned()
}
