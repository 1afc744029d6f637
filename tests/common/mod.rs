use async_trait::async_trait;
use ftpgate::{IdentityProvider, request::AuthRequest};
use ftpgate_core::secret::{self, ErrorKind, SecretStore, SecretValue};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

pub const SERVER_ID: &str = "s-1234";
pub const USERNAME: &str = "testuser";

/// A secret store holding its secrets in memory, counting lookups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: HashMap<String, Result<SecretValue, ErrorKind>>,
    lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn with_record(mut self, id: &str, record: Value) -> Self {
        self.secrets.insert(id.to_string(), Ok(SecretValue::Text(record.to_string())));
        self
    }

    pub fn with_secret(mut self, id: &str, secret: SecretValue) -> Self {
        self.secrets.insert(id.to_string(), Ok(secret));
        self
    }

    pub fn with_error(mut self, id: &str, kind: ErrorKind) -> Self {
        self.secrets.insert(id.to_string(), Err(kind));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get_secret(&self, secret_id: &str) -> secret::Result<SecretValue> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.secrets.get(secret_id) {
            Some(Ok(secret)) => Ok(secret.clone()),
            Some(Err(kind)) => Err((*kind).into()),
            None => Err(ErrorKind::NotFound.into()),
        }
    }
}

pub fn secret_id() -> String {
    format!("ftpSecret/{}/{}", SERVER_ID, USERNAME)
}

/// An identity provider over a store holding a single record for the test user.
pub fn provider_with(record: Value) -> (IdentityProvider, Arc<MemoryStore>) {
    provider(MemoryStore::default().with_record(&secret_id(), record))
}

pub fn provider(store: MemoryStore) -> (IdentityProvider, Arc<MemoryStore>) {
    let store = Arc::new(store);
    (IdentityProvider::new(store.clone()), store)
}

pub fn request(protocol: &str, password: &str, source_ip: &str) -> AuthRequest {
    AuthRequest {
        server_id: SERVER_ID.to_string(),
        username: USERNAME.to_string(),
        protocol: protocol.into(),
        source_ip: source_ip.to_string(),
        password: password.into(),
    }
}

/// An API Gateway proxy event for the test user.
pub fn event(protocol: &str, password: Option<&str>, source_ip: &str) -> Value {
    let headers = match password {
        Some(password) => json!({ "Password": password }),
        None => Value::Null,
    };
    json!({
        "resource": "/servers/{serverId}/users/{username}/config",
        "httpMethod": "GET",
        "pathParameters": {"serverId": SERVER_ID, "username": USERNAME},
        "queryStringParameters": {"protocol": protocol},
        "headers": headers,
        "requestContext": {"identity": {"sourceIp": source_ip}}
    })
}

pub fn record() -> Value {
    json!({
        "Role": "roleArn",
        "HomeDirectoryDetails": "[{\"Entry\": \"/\", \"Target\": \"/bucket/home\"}]",
        "Password": "password"
    })
}
