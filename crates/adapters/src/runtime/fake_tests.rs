// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_runtime_spawn() {
    let adapter = FakeRuntimeAdapter::new();
    let id = adapter
        .spawn(
            "test",
            Path::new("/tmp"),
            "echo hello",
            &[("KEY".to_string(), "value".to_string())],
        )
        .await
        .unwrap();

    assert!(adapter.get_instance(&id).is_some());

    let calls = adapter.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], RuntimeCall::Spawn { .. }));
}

#[tokio::test]
async fn fake_runtime_lifecycle() {
    let adapter = FakeRuntimeAdapter::new();
    let id = adapter
        .spawn("test", Path::new("/tmp"), "cmd", &[])
        .await
        .unwrap();

    assert!(adapter.is_alive(&id).await.unwrap());

    adapter.set_exited(&id, 0);
    assert!(!adapter.is_alive(&id).await.unwrap());
}

#[tokio::test]
async fn fake_runtime_send_success() {
    let adapter = FakeRuntimeAdapter::new();
    let id = adapter
        .spawn("test", Path::new("/tmp"), "cmd", &[])
        .await
        .unwrap();

    adapter.send(&id, "input text").await.unwrap();

    let calls = adapter.calls();
    assert!(
        matches!(&calls[1], RuntimeCall::Send { id: sid, input } if sid == &id && input == "input text")
    );
}

#[tokio::test]
async fn fake_runtime_send_not_found() {
    let adapter = FakeRuntimeAdapter::new();
    let result = adapter.send("nonexistent", "input").await;
    assert!(matches!(result, Err(RuntimeError::NotFound(_))));
}

#[tokio::test]
async fn fake_runtime_destroy() {
    let adapter = FakeRuntimeAdapter::new();
    let id = adapter
        .spawn("test", Path::new("/tmp"), "cmd", &[])
        .await
        .unwrap();

    assert!(adapter.is_alive(&id).await.unwrap());
    adapter.destroy(&id).await.unwrap();
    assert!(!adapter.is_alive(&id).await.unwrap());

    let calls = adapter.calls();
    assert!(matches!(&calls[2], RuntimeCall::Destroy { .. }));
}

#[tokio::test]
async fn fake_runtime_destroy_nonexistent_succeeds() {
    let adapter = FakeRuntimeAdapter::new();
    let result = adapter.destroy("nonexistent").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn fake_runtime_set_output_and_capture() {
    let adapter = FakeRuntimeAdapter::new();
    let id = adapter
        .spawn("test", Path::new("/tmp"), "cmd", &[])
        .await
        .unwrap();

    adapter.set_output(&id, vec!["line1".into(), "line2".into(), "line3".into()]);

    let output = adapter.capture_output(&id, 2).await.unwrap();
    assert_eq!(output, "line2\nline3");

    let all_output = adapter.capture_output(&id, 10).await.unwrap();
    assert_eq!(all_output, "line1\nline2\nline3");
}

#[tokio::test]
async fn fake_runtime_capture_output_not_found() {
    let adapter = FakeRuntimeAdapter::new();
    let result = adapter.capture_output("nonexistent", 10).await;
    assert!(matches!(result, Err(RuntimeError::NotFound(_))));
}

#[tokio::test]
async fn fake_runtime_set_process_running() {
    let adapter = FakeRuntimeAdapter::new();
    let id = adapter
        .spawn("test", Path::new("/tmp"), "cmd", &[])
        .await
        .unwrap();

    assert!(adapter.is_process_running(&id, "cmd").await.unwrap());

    adapter.set_process_running(&id, false);
    assert!(!adapter.is_process_running(&id, "cmd").await.unwrap());

    adapter.set_process_running(&id, true);
    assert!(adapter.is_process_running(&id, "cmd").await.unwrap());
}

#[tokio::test]
async fn fake_runtime_is_process_running_not_found() {
    let adapter = FakeRuntimeAdapter::new();
    assert!(!adapter
        .is_process_running("nonexistent", "cmd")
        .await
        .unwrap());
}

#[tokio::test]
async fn fake_runtime_is_alive_not_found() {
    let adapter = FakeRuntimeAdapter::new();
    assert!(!adapter.is_alive("nonexistent").await.unwrap());
}
