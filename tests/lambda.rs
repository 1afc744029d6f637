#![allow(missing_docs)]

pub mod common;

use bytes::Bytes;
use common::*;
use ftpgate::lambda::{RuntimeClient, RuntimeError, run};
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Response, StatusCode, body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::{
    collections::VecDeque,
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

/// Hands out the queued events one by one, then answers `410 Gone`. Records everything posted.
#[derive(Default)]
struct FakeRuntime {
    events: Mutex<VecDeque<Vec<u8>>>,
    posted: Mutex<Vec<(String, Value)>>,
}

impl FakeRuntime {
    async fn handle(self: Arc<Self>, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
        let path = req.uri().path().to_string();
        if req.method() == Method::GET && path == "/2018-06-01/runtime/invocation/next" {
            let next = self.events.lock().unwrap().pop_front();
            let resp = match next {
                Some(event) => {
                    let n = self.posted.lock().unwrap().len();
                    Response::builder()
                        .header("Lambda-Runtime-Aws-Request-Id", format!("req-{}", n))
                        .body(Full::new(Bytes::from(event)))
                        .unwrap()
                }
                None => Response::builder().status(StatusCode::GONE).body(Full::new(Bytes::new())).unwrap(),
            };
            return Ok(resp);
        }
        let body = req.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        self.posted.lock().unwrap().push((path, body));
        Ok(Response::builder().status(StatusCode::ACCEPTED).body(Full::new(Bytes::new())).unwrap())
    }
}

async fn start(runtime: Arc<FakeRuntime>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let runtime = runtime.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req| runtime.clone().handle(req));
                let _ = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await;
            });
        }
    });
    addr
}

#[tokio::test]
async fn invocations_are_answered_in_order() {
    let runtime = Arc::new(FakeRuntime::default());
    {
        let mut events = runtime.events.lock().unwrap();
        events.push_back(event("FTP", Some("password"), "8.8.8.8").to_string().into_bytes());
        events.push_back(event("FTP", Some("wrong"), "8.8.8.8").to_string().into_bytes());
        events.push_back(json!({"pathParameters": {"serverId": SERVER_ID}}).to_string().into_bytes());
        events.push_back(b"not json".to_vec());
    }
    let addr = start(runtime.clone()).await;
    let (idp, _) = provider_with(record());

    let result = run(RuntimeClient::new(&addr.to_string()), idp).await;
    assert!(matches!(result, Err(RuntimeError::Status(StatusCode::GONE))));

    let posted = runtime.posted.lock().unwrap().clone();
    assert_eq!(4, posted.len());

    assert_eq!("/2018-06-01/runtime/invocation/req-0/response", posted[0].0);
    assert_eq!(Some(&json!(200)), posted[0].1.get("statusCode"));
    let body: Value = serde_json::from_str(posted[0].1["body"].as_str().unwrap()).unwrap();
    assert_eq!(Some(&json!("roleArn")), body.get("Role"));

    assert_eq!("/2018-06-01/runtime/invocation/req-1/response", posted[1].0);
    assert_eq!(json!({"statusCode": 200, "body": "{}"}), posted[1].1);

    assert_eq!("/2018-06-01/runtime/invocation/req-2/error", posted[2].0);
    assert_eq!(
        json!({"errorMessage": "missing required field username", "errorType": "MissingField"}),
        posted[2].1
    );

    assert_eq!("/2018-06-01/runtime/invocation/req-3/error", posted[3].0);
    assert_eq!(Some(&json!("InvalidEvent")), posted[3].1.get("errorType"));
}
