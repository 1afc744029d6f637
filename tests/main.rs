#![allow(missing_docs)]

pub mod common;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use common::*;
use ftpgate::{Authorization, IdentityProvider};
use ftpgate_core::secret::{ErrorKind, SecretValue};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

async fn authorize(record: Value, protocol: &str, password: &str, source_ip: &str) -> Value {
    let (idp, _) = provider_with(record);
    serde_json::to_value(idp.authorize(&request(protocol, password, source_ip)).await).unwrap()
}

#[tokio::test]
async fn password_login_returns_session_settings() {
    let response = authorize(record(), "FTP", "password", "8.8.8.8").await;
    assert_eq!(
        json!({
            "Role": "roleArn",
            "HomeDirectoryDetails": "[{\"Entry\": \"/\", \"Target\": \"/bucket/home\"}]",
            "HomeDirectoryType": "LOGICAL"
        }),
        response
    );
}

#[tokio::test]
async fn wrong_password_is_denied() {
    assert_eq!(json!({}), authorize(record(), "FTP", "wrong", "8.8.8.8").await);
}

#[tokio::test]
async fn empty_password_over_ftp_is_denied_without_lookup() {
    for protocol in ["FTP", "FTPS", "ftp"] {
        let (idp, store) = provider_with(record());
        let authorization = idp.authorize(&request(protocol, "", "8.8.8.8")).await;
        assert_eq!(Authorization::Denied, authorization);
        assert_eq!(0, store.lookups(), "{} should not hit the secret store", protocol);
    }
}

#[tokio::test]
async fn key_login_returns_public_key() {
    let record = json!({"Role": "roleArn", "PublicKey": "ssh-ed25519 AAAAC3Nza", "HomeDirectory": "/bucket/home"});
    assert_eq!(
        json!({"Role": "roleArn", "HomeDirectory": "/bucket/home", "PublicKeys": ["ssh-ed25519 AAAAC3Nza"]}),
        authorize(record, "SFTP", "", "8.8.8.8").await
    );
}

#[tokio::test]
async fn key_login_without_key_is_denied() {
    assert_eq!(json!({}), authorize(record(), "SFTP", "", "8.8.8.8").await);
    assert_eq!(json!({}), authorize(record(), "AS2", "", "8.8.8.8").await);
}

#[tokio::test]
async fn password_login_over_sftp_works_too() {
    let response = authorize(record(), "SFTP", "password", "8.8.8.8").await;
    assert_eq!(Some(&json!("roleArn")), response.get("Role"));
    assert_eq!(None, response.get("PublicKeys"));
}

#[tokio::test]
async fn any_source_is_accepted_without_network() {
    for ip in ["8.8.8.8", "10.0.0.1", "2001:db8::1", "not even an ip"] {
        assert_eq!(Some(&json!("roleArn")), authorize(record(), "FTP", "password", ip).await.get("Role"));
    }
}

#[tokio::test]
async fn source_outside_network_is_denied() {
    let mut r = record();
    r["AcceptedIpNetwork"] = json!("192.168.1.0/24");
    assert_eq!(json!({}), authorize(r.clone(), "FTP", "password", "8.8.8.8").await);
    assert_eq!(json!({}), authorize(r.clone(), "FTP", "wrong", "8.8.8.8").await);
    assert_eq!(Some(&json!("roleArn")), authorize(r, "FTP", "password", "192.168.1.77").await.get("Role"));
}

#[tokio::test]
async fn malformed_network_is_denied() {
    let mut r = record();
    r["AcceptedIpNetwork"] = json!("192.168.1.0/40");
    assert_eq!(json!({}), authorize(r, "FTP", "password", "192.168.1.1").await);
}

#[tokio::test]
async fn protocol_specific_password_wins() {
    let r = json!({"FTPPassword": "x", "Password": "y", "Role": "r"});
    assert_eq!(json!({"Role": "r"}), authorize(r.clone(), "FTP", "x", "8.8.8.8").await);
    assert_eq!(json!({}), authorize(r.clone(), "FTP", "y", "8.8.8.8").await);
    assert_eq!(json!({"Role": "r"}), authorize(r, "SFTP", "y", "8.8.8.8").await);
}

#[tokio::test]
async fn store_failures_are_denied() {
    for kind in [ErrorKind::NotFound, ErrorKind::AccessDenied, ErrorKind::Unavailable] {
        let (idp, _) = provider(MemoryStore::default().with_error(&secret_id(), kind));
        assert_eq!(Authorization::Denied, idp.authorize(&request("FTP", "password", "8.8.8.8")).await);
    }
    let (idp, _) = provider(MemoryStore::default());
    assert_eq!(Authorization::Denied, idp.authorize(&request("FTP", "password", "8.8.8.8")).await);
}

#[tokio::test]
async fn malformed_records_are_denied() {
    for secret in [SecretValue::from("not json"), SecretValue::from("[\"Password\"]"), SecretValue::from(vec![0xff, 0xfe])] {
        let (idp, _) = provider(MemoryStore::default().with_secret(&secret_id(), secret));
        assert_eq!(Authorization::Denied, idp.authorize(&request("FTP", "password", "8.8.8.8")).await);
    }
}

#[tokio::test]
async fn binary_records_are_read() {
    let secret = SecretValue::from(record().to_string().into_bytes());
    let (idp, _) = provider(MemoryStore::default().with_secret(&secret_id(), secret));
    assert!(idp.authorize(&request("FTP", "password", "8.8.8.8")).await.is_granted());
}

#[tokio::test]
async fn base64_binary_records_are_read() {
    let encoded = BASE64.encode(json!({"Role": "roleArn", "Password": "password"}).to_string());
    let secret = SecretValue::from(encoded.into_bytes());
    let (idp, _) = provider(MemoryStore::default().with_secret(&secret_id(), secret));
    let authorization = idp.authorize(&request("FTP", "password", "8.8.8.8")).await;
    assert_eq!(json!({"Role": "roleArn"}), serde_json::to_value(authorization).unwrap());
}

#[tokio::test]
async fn secret_prefix_is_configurable() {
    let store = Arc::new(MemoryStore::default().with_record(&format!("sftpUsers/{}/{}", SERVER_ID, USERNAME), record()));
    let idp = IdentityProvider::new(store).with_secret_prefix("sftpUsers");
    assert_eq!("sftpUsers/a/b", idp.secret_id("a", "b"));
    assert!(idp.authorize(&request("FTP", "password", "8.8.8.8")).await.is_granted());
}

#[tokio::test]
async fn empty_stored_password_never_matches() {
    let r = json!({"Password": "", "Role": "r"});
    assert_eq!(json!({}), authorize(r, "SFTP", "anything", "8.8.8.8").await);
}
