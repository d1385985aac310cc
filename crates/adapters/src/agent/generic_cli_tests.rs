// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::agent::AgentAdapter;
use crate::runtime::FakeRuntimeAdapter;
use fleet_core::{RuntimeHandle, SessionBuilder, SessionStatus};

fn adapter() -> GenericCliAgentAdapter<FakeRuntimeAdapter> {
    GenericCliAgentAdapter::new(FakeRuntimeAdapter::new(), "fake-agent")
}

#[test]
fn extract_process_name_handles_paths() {
    assert_eq!(extract_process_name("/usr/bin/claude --flag"), "claude");
    assert_eq!(extract_process_name("./claude"), "claude");
    assert_eq!(extract_process_name("claude"), "claude");
}

#[tokio::test]
async fn get_launch_command_rejects_empty_prompt() {
    let req = LaunchRequest {
        session_id: "proj-1".into(),
        permissions: "default".into(),
        model: None,
        prompt: "".into(),
    };
    let result = adapter().get_launch_command(&req).await;
    assert!(matches!(result, Err(AgentError::LaunchFailed(_))));
}

#[tokio::test]
async fn get_launch_command_includes_model_and_prompt() {
    let req = LaunchRequest {
        session_id: "proj-1".into(),
        permissions: "default".into(),
        model: Some("fast".into()),
        prompt: "fix the bug".into(),
    };
    let cmd = adapter().get_launch_command(&req).await.unwrap();
    assert!(cmd.contains("--session-id proj-1"));
    assert!(cmd.contains("--model fast"));
    assert!(cmd.contains("fix the bug"));
}

#[tokio::test]
async fn is_processing_reflects_runtime_state() {
    let a = adapter();
    let id = a
        .runtime
        .spawn("t", std::path::Path::new("/tmp"), "fake-agent", &[])
        .await
        .unwrap();
    let handle = RuntimeHandle {
        id: id.clone(),
        runtime_name: "fake".into(),
        data: serde_json::Map::new(),
    };
    assert!(a.is_processing(&handle).await.unwrap());

    a.runtime.set_process_running(&id, false);
    assert!(!a.is_processing(&handle).await.unwrap());
}

#[tokio::test]
async fn get_activity_state_exited_when_not_alive() {
    let a = adapter();
    let id = a
        .runtime
        .spawn("t", std::path::Path::new("/tmp"), "fake-agent", &[])
        .await
        .unwrap();
    a.runtime.set_exited(&id, 0);

    let session = SessionBuilder::new("proj-1", "proj")
        .status(SessionStatus::Working)
        .runtime_handle(RuntimeHandle {
            id,
            runtime_name: "fake".into(),
            data: serde_json::Map::new(),
        })
        .build();

    let activity = a.get_activity_state(&session).await.unwrap();
    assert_eq!(activity, Activity::Exited);
}

#[tokio::test]
async fn get_activity_state_waiting_input_on_prompt_marker() {
    let a = adapter();
    let id = a
        .runtime
        .spawn("t", std::path::Path::new("/tmp"), "fake-agent", &[])
        .await
        .unwrap();
    a.runtime
        .set_output(&id, vec!["Continue? (y/n)".to_string()]);

    let session = SessionBuilder::new("proj-1", "proj")
        .status(SessionStatus::Working)
        .runtime_handle(RuntimeHandle {
            id,
            runtime_name: "fake".into(),
            data: serde_json::Map::new(),
        })
        .build();

    let activity = a.get_activity_state(&session).await.unwrap();
    assert_eq!(activity, Activity::WaitingInput);
}

#[tokio::test]
async fn get_activity_state_active_without_handle_pending_spawn() {
    let a = adapter();
    let session = SessionBuilder::new("proj-1", "proj")
        .status(SessionStatus::Spawning)
        .build();

    let activity = a.get_activity_state(&session).await.unwrap();
    assert_eq!(activity, Activity::Exited);
}
