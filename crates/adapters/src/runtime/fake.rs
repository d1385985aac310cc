// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake runtime adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RuntimeAdapter, RuntimeError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded runtime call
#[derive(Debug, Clone)]
pub enum RuntimeCall {
    Spawn {
        name: String,
        cwd: PathBuf,
        cmd: String,
        env: Vec<(String, String)>,
    },
    Send {
        id: String,
        input: String,
    },
    SendLiteral {
        id: String,
        text: String,
    },
    SendEnter {
        id: String,
    },
    Destroy {
        id: String,
    },
    IsAlive {
        id: String,
    },
    CaptureOutput {
        id: String,
        lines: u32,
    },
    IsProcessRunning {
        id: String,
        pattern: String,
    },
}

/// Fake runtime instance state
#[derive(Debug, Clone)]
pub struct FakeRuntime {
    pub name: String,
    pub cwd: PathBuf,
    pub cmd: String,
    pub env: Vec<(String, String)>,
    pub output: Vec<String>,
    pub alive: bool,
    pub exit_code: Option<i32>,
    pub process_running: bool,
}

struct FakeRuntimeState {
    instances: HashMap<String, FakeRuntime>,
    calls: Vec<RuntimeCall>,
    next_id: u64,
}

/// Fake runtime adapter for testing
#[derive(Clone)]
pub struct FakeRuntimeAdapter {
    inner: Arc<Mutex<FakeRuntimeState>>,
}

impl Default for FakeRuntimeAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeRuntimeState {
                instances: HashMap::new(),
                calls: Vec::new(),
                next_id: 0,
            })),
        }
    }
}

impl FakeRuntimeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a runtime instance by ID
    pub fn get_instance(&self, id: &str) -> Option<FakeRuntime> {
        self.inner.lock().instances.get(id).cloned()
    }

    /// Set instance output
    pub fn set_output(&self, id: &str, output: Vec<String>) {
        if let Some(instance) = self.inner.lock().instances.get_mut(id) {
            instance.output = output;
        }
    }

    /// Mark instance as exited
    pub fn set_exited(&self, id: &str, exit_code: i32) {
        if let Some(instance) = self.inner.lock().instances.get_mut(id) {
            instance.alive = false;
            instance.exit_code = Some(exit_code);
        }
    }

    /// Set whether a process is running in the instance
    pub fn set_process_running(&self, id: &str, running: bool) {
        if let Some(instance) = self.inner.lock().instances.get_mut(id) {
            instance.process_running = running;
        }
    }

    /// Add a pre-existing instance by ID (for testing liveness checks)
    pub fn add_instance(&self, id: &str, alive: bool) {
        self.inner.lock().instances.insert(
            id.to_string(),
            FakeRuntime {
                name: id.to_string(),
                cwd: PathBuf::new(),
                cmd: String::new(),
                env: Vec::new(),
                output: Vec::new(),
                alive,
                exit_code: None,
                process_running: alive,
            },
        );
    }
}

#[async_trait]
impl RuntimeAdapter for FakeRuntimeAdapter {
    async fn spawn(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<String, RuntimeError> {
        let mut inner = self.inner.lock();

        inner.next_id += 1;
        let id = format!("fake-{}", inner.next_id);

        inner.calls.push(RuntimeCall::Spawn {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
            env: env.to_vec(),
        });

        let instance = FakeRuntime {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
            env: env.to_vec(),
            output: Vec::new(),
            alive: true,
            exit_code: None,
            process_running: true,
        };

        inner.instances.insert(id.clone(), instance);

        Ok(id)
    }

    async fn send(&self, id: &str, input: &str) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock();

        inner.calls.push(RuntimeCall::Send {
            id: id.to_string(),
            input: input.to_string(),
        });

        if !inner.instances.contains_key(id) {
            return Err(RuntimeError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn send_literal(&self, id: &str, text: &str) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock();

        inner.calls.push(RuntimeCall::SendLiteral {
            id: id.to_string(),
            text: text.to_string(),
        });

        if !inner.instances.contains_key(id) {
            return Err(RuntimeError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn send_enter(&self, id: &str) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock();

        inner
            .calls
            .push(RuntimeCall::SendEnter { id: id.to_string() });

        if !inner.instances.contains_key(id) {
            return Err(RuntimeError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock();

        inner
            .calls
            .push(RuntimeCall::Destroy { id: id.to_string() });

        if let Some(instance) = inner.instances.get_mut(id) {
            instance.alive = false;
        }

        Ok(())
    }

    async fn is_alive(&self, id: &str) -> Result<bool, RuntimeError> {
        let mut inner = self.inner.lock();

        inner
            .calls
            .push(RuntimeCall::IsAlive { id: id.to_string() });

        match inner.instances.get(id) {
            Some(instance) => Ok(instance.alive),
            None => Ok(false),
        }
    }

    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, RuntimeError> {
        let mut inner = self.inner.lock();

        inner.calls.push(RuntimeCall::CaptureOutput {
            id: id.to_string(),
            lines,
        });

        match inner.instances.get(id) {
            Some(instance) => {
                let start = instance.output.len().saturating_sub(lines as usize);
                Ok(instance.output[start..].join("\n"))
            }
            None => Err(RuntimeError::NotFound(id.to_string())),
        }
    }

    async fn is_process_running(&self, id: &str, pattern: &str) -> Result<bool, RuntimeError> {
        let mut inner = self.inner.lock();

        inner.calls.push(RuntimeCall::IsProcessRunning {
            id: id.to_string(),
            pattern: pattern.to_string(),
        });

        match inner.instances.get(id) {
            Some(instance) => Ok(instance.process_running),
            None => Ok(false),
        }
    }

    async fn get_exit_code(&self, id: &str) -> Result<Option<i32>, RuntimeError> {
        let inner = self.inner.lock();

        match inner.instances.get(id) {
            Some(instance) => Ok(instance.exit_code),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
