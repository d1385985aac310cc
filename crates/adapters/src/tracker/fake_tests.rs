// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use std::path::PathBuf;

fn project() -> ProjectConfig {
    ProjectConfig {
        name: "demo".into(),
        repo: "acme/widgets".into(),
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

#[tokio::test]
async fn create_issue_then_get_issue_round_trips() {
    let tracker = FakeTrackerAdapter::new();
    let id = tracker
        .create_issue(&project(), "Fix the thing", "details")
        .await
        .unwrap();

    let issue = tracker.get_issue(&id, &project()).await.unwrap();
    assert_eq!(issue.title, "Fix the thing");
    assert_eq!(issue.state, IssueState::Open);
}

#[tokio::test]
async fn get_issue_unknown_id_is_not_found() {
    let tracker = FakeTrackerAdapter::new();
    let result = tracker.get_issue("missing", &project()).await;
    assert!(matches!(result, Err(TrackerError::NotFound(_))));
}

#[tokio::test]
async fn get_issue_records_call_and_propagates_configured_error() {
    let tracker = FakeTrackerAdapter::new();
    tracker.set_get_issue_error("rate limited");
    let result = tracker.get_issue("1", &project()).await;
    assert!(matches!(result, Err(TrackerError::Transient(_))));
    assert_eq!(
        tracker.calls(),
        vec![TrackerCall::GetIssue { issue_id: "1".into() }]
    );
}

#[tokio::test]
async fn update_issue_replaces_labels() {
    let tracker = FakeTrackerAdapter::new();
    let id = tracker.create_issue(&project(), "Title", "body").await.unwrap();
    tracker
        .update_issue(&id, &project(), &["in-progress".to_string()])
        .await
        .unwrap();

    let issue = tracker.get_issue(&id, &project()).await.unwrap();
    assert_eq!(issue.labels, vec!["in-progress".to_string()]);
}

#[tokio::test]
async fn list_issues_filters_by_state() {
    let tracker = FakeTrackerAdapter::new();
    tracker.insert_issue(Issue {
        id: "1".into(),
        title: "Open one".into(),
        body: String::new(),
        state: IssueState::Open,
        labels: Vec::new(),
        url: "https://example.test/1".into(),
    });
    tracker.insert_issue(Issue {
        id: "2".into(),
        title: "Closed one".into(),
        body: String::new(),
        state: IssueState::Closed,
        labels: Vec::new(),
        url: "https://example.test/2".into(),
    });

    let open = tracker.list_issues(&project(), Some(IssueState::Open)).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, "1");
}

#[tokio::test]
async fn is_completed_true_only_for_closed_or_cancelled() {
    let tracker = FakeTrackerAdapter::new();
    tracker.insert_issue(Issue {
        id: "1".into(),
        title: "t".into(),
        body: String::new(),
        state: IssueState::Cancelled,
        labels: Vec::new(),
        url: String::new(),
    });
    assert!(tracker.is_completed("1", &project()).await.unwrap());
}
