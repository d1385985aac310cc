// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn new_rejects_non_http_scheme() {
    let result = WebhookNotifyAdapter::new("ftp://example.com/hook");
    assert!(matches!(result, Err(NotifyError::SendFailed(_))));
}

#[test]
fn new_rejects_unparseable_url() {
    let result = WebhookNotifyAdapter::new("not a url");
    assert!(result.is_err());
}

#[test]
fn new_accepts_https() {
    assert!(WebhookNotifyAdapter::new("https://example.com/hook").is_ok());
}

#[tokio::test]
async fn notify_posts_json_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = WebhookNotifyAdapter::new(format!("{}/hook", server.uri())).unwrap();
    adapter.notify("Session stuck", "needs attention").await.unwrap();
}

#[tokio::test]
async fn notify_returns_error_on_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let adapter = WebhookNotifyAdapter::new(format!("{}/hook", server.uri())).unwrap();
    let result = adapter.notify("title", "message").await;
    assert!(matches!(result, Err(NotifyError::SendFailed(_))));
}
