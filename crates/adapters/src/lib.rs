// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the runtime a session lives in, the agent
//! process hosted inside it, and the trackers/SCMs/notification channels
//! the engine talks to.

pub mod agent;
mod env;
pub mod notify;
pub mod runtime;
pub mod scm;
pub mod subprocess;
pub mod tracker;
pub mod traced;
pub mod workspace;

pub use agent::{AgentAdapter, AgentError, GenericCliAgentAdapter, LaunchRequest};
pub use notify::{DesktopNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter, WebhookNotifyAdapter};
pub use runtime::{RuntimeAdapter, RuntimeError, TmuxAdapter};
pub use scm::{GitHubScmAdapter, ScmAdapter, ScmError};
pub use tracker::{GitHubTrackerAdapter, TrackerAdapter, TrackerError};
pub use traced::{TracedAgent, TracedRuntime};
pub use workspace::{GitWorktreeAdapter, WorkspaceAdapter, WorkspaceError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use agent::{AgentCall, FakeAgentAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use runtime::{FakeRuntime, FakeRuntimeAdapter, RuntimeCall};
#[cfg(any(test, feature = "test-support"))]
pub use scm::{FakeScmAdapter, ScmCall};
#[cfg(any(test, feature = "test-support"))]
pub use tracker::{FakeTrackerAdapter, TrackerCall};
#[cfg(any(test, feature = "test-support"))]
pub use workspace::{FakeWorkspaceAdapter, WorkspaceCall};
