#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOKEN: &str = "test-token";

pub fn ok_envelope() -> Value {
    json!({"ok": true, "result": {}})
}

/// Stub Bot API that accepts `TOKEN` and answers `sendmessage` with `send`.
pub async fn stub_api(send: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{}/getme", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendmessage", TOKEN)))
        .respond_with(send)
        .mount(&server)
        .await;
    server
}

pub async fn accepting_api() -> MockServer {
    stub_api(ResponseTemplate::new(200).set_body_json(ok_envelope())).await
}

/// All `sendmessage` requests received so far.
pub async fn sent_messages(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path().ends_with("/sendmessage"))
        .collect()
}

/// Poll until at least `n` messages arrived, failing after two seconds.
pub async fn wait_for_messages(server: &MockServer, n: usize) -> Vec<Request> {
    for _ in 0..100 {
        let sent = sent_messages(server).await;
        if sent.len() >= n {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {} sendmessage request(s) within 2s", n);
}

pub fn body_of(req: &Request) -> Value {
    serde_json::from_slice(&req.body).expect("sendmessage body is JSON")
}
