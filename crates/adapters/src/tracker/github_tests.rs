// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project(repo: &str) -> ProjectConfig {
    ProjectConfig {
        name: "demo".into(),
        repo: repo.into(),
        path: PathBuf::from("/repo"),
        default_branch: "main".into(),
        session_prefix: "demo".into(),
        agent_rules: None,
        orchestrator_rules: None,
        symlinks: Vec::new(),
        post_create: Vec::new(),
        tracker_config: toml::Table::new(),
        agent_config: toml::Table::new(),
        reactions: HashMap::new(),
    }
}

fn gh_issue_json(number: u64, state: &str) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": "Fix the thing",
        "body": "Details here",
        "state": state,
        "labels": [],
        "html_url": format!("https://github.com/acme/widgets/issues/{number}"),
    })
}

#[tokio::test]
async fn get_issue_maps_open_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gh_issue_json(42, "open")))
        .mount(&server)
        .await;

    let adapter = GitHubTrackerAdapter::with_base_url("tok", server.uri());
    let issue = adapter.get_issue("42", &project("acme/widgets")).await.unwrap();

    assert_eq!(issue.id, "42");
    assert_eq!(issue.state, IssueState::Open);
    assert_eq!(issue.title, "Fix the thing");
}

#[tokio::test]
async fn get_issue_maps_not_planned_closure_to_cancelled() {
    let server = MockServer::start().await;
    let mut body = gh_issue_json(7, "closed");
    body["state_reason"] = serde_json::json!("not_planned");
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let adapter = GitHubTrackerAdapter::with_base_url("tok", server.uri());
    let issue = adapter.get_issue("7", &project("acme/widgets")).await.unwrap();
    assert_eq!(issue.state, IssueState::Cancelled);
}

#[tokio::test]
async fn get_issue_not_found_is_tracker_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let adapter = GitHubTrackerAdapter::with_base_url("tok", server.uri());
    let result = adapter.get_issue("999", &project("acme/widgets")).await;
    assert!(matches!(result, Err(TrackerError::NotFound(_))));
}

#[tokio::test]
async fn get_issue_rate_limit_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues/1"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let adapter = GitHubTrackerAdapter::with_base_url("tok", server.uri());
    let result = adapter.get_issue("1", &project("acme/widgets")).await;
    assert!(matches!(result, Err(TrackerError::Transient(_))));
}

#[tokio::test]
async fn is_completed_true_for_closed_issue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gh_issue_json(5, "closed")))
        .mount(&server)
        .await;

    let adapter = GitHubTrackerAdapter::with_base_url("tok", server.uri());
    assert!(adapter.is_completed("5", &project("acme/widgets")).await.unwrap());
}

#[tokio::test]
async fn owner_repo_rejects_malformed_spec() {
    let adapter = GitHubTrackerAdapter::with_base_url("tok", "http://unused");
    let result = adapter.get_issue("1", &project("not-a-repo-spec")).await;
    assert!(matches!(result, Err(TrackerError::Permanent(_))));
}

#[tokio::test]
async fn branch_name_uses_session_prefix() {
    let adapter = GitHubTrackerAdapter::with_base_url("tok", "http://unused");
    let name = adapter.branch_name("42", &project("acme/widgets"));
    assert_eq!(name, "feat/demo-42");
}
