// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability Registry: a typed dispatcher for the six capability slots
//! (plus a seventh, `terminal`, used only by the CLI).
//!
//! Rust adapters are trait objects, not reflectively loadable plugin
//! modules, so each slot is a name-keyed map of `Arc<dyn Trait>` guarded by
//! one `parking_lot::RwLock` per slot — read-mostly, written only at boot
//! or reload, matching the registry pattern used throughout the retrieval
//! pack for shared tool/service maps.

use crate::error::RegistryError;
use fleet_adapters::{
    AgentAdapter, DesktopNotifyAdapter, GenericCliAgentAdapter, GitHubScmAdapter,
    GitHubTrackerAdapter, GitWorktreeAdapter, NoOpNotifyAdapter, NotifyAdapter, RuntimeAdapter,
    ScmAdapter, TmuxAdapter, TrackerAdapter, TracedAgent, TracedRuntime, WebhookNotifyAdapter,
    WorkspaceAdapter,
};
use fleet_core::Config;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A name-keyed, read-mostly map of live adapter instances for one slot.
struct SlotMap<T: ?Sized>(RwLock<HashMap<String, Arc<T>>>);

impl<T: ?Sized> SlotMap<T> {
    fn new() -> Self {
        Self(RwLock::new(HashMap::new()))
    }

    fn insert(&self, name: impl Into<String>, adapter: Arc<T>) {
        self.0.write().insert(name.into(), adapter);
    }

    fn get(&self, name: &str) -> Option<Arc<T>> {
        self.0.read().get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }
}

/// Process-scoped registry of every capability adapter the engine can
/// dispatch to. Initialized once at boot via [`CapabilityRegistry::load_builtins`]
/// and [`CapabilityRegistry::load_from_config`].
pub struct CapabilityRegistry {
    runtimes: SlotMap<dyn RuntimeAdapter>,
    agents: SlotMap<dyn AgentAdapter>,
    workspaces: SlotMap<dyn WorkspaceAdapter>,
    trackers: SlotMap<dyn TrackerAdapter>,
    scms: SlotMap<dyn ScmAdapter>,
    notifiers: SlotMap<dyn NotifyAdapter>,
}

/// One capability slot, used for error messages and config-driven lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Runtime,
    Agent,
    Workspace,
    Tracker,
    Scm,
    Notifier,
    Terminal,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Runtime => "runtime",
            Slot::Agent => "agent",
            Slot::Workspace => "workspace",
            Slot::Tracker => "tracker",
            Slot::Scm => "scm",
            Slot::Notifier => "notifier",
            Slot::Terminal => "terminal",
        }
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            runtimes: SlotMap::new(),
            agents: SlotMap::new(),
            workspaces: SlotMap::new(),
            trackers: SlotMap::new(),
            scms: SlotMap::new(),
            notifiers: SlotMap::new(),
        }
    }

    pub fn register_runtime(&self, name: impl Into<String>, adapter: Arc<dyn RuntimeAdapter>) {
        self.runtimes.insert(name, adapter);
    }
    pub fn register_agent(&self, name: impl Into<String>, adapter: Arc<dyn AgentAdapter>) {
        self.agents.insert(name, adapter);
    }
    pub fn register_workspace(&self, name: impl Into<String>, adapter: Arc<dyn WorkspaceAdapter>) {
        self.workspaces.insert(name, adapter);
    }
    pub fn register_tracker(&self, name: impl Into<String>, adapter: Arc<dyn TrackerAdapter>) {
        self.trackers.insert(name, adapter);
    }
    pub fn register_scm(&self, name: impl Into<String>, adapter: Arc<dyn ScmAdapter>) {
        self.scms.insert(name, adapter);
    }
    pub fn register_notifier(&self, name: impl Into<String>, adapter: Arc<dyn NotifyAdapter>) {
        self.notifiers.insert(name, adapter);
    }

    pub fn runtime(&self, name: &str) -> Option<Arc<dyn RuntimeAdapter>> {
        self.runtimes.get(name)
    }
    pub fn agent(&self, name: &str) -> Option<Arc<dyn AgentAdapter>> {
        self.agents.get(name)
    }
    pub fn workspace(&self, name: &str) -> Option<Arc<dyn WorkspaceAdapter>> {
        self.workspaces.get(name)
    }
    pub fn tracker(&self, name: &str) -> Option<Arc<dyn TrackerAdapter>> {
        self.trackers.get(name)
    }
    pub fn scm(&self, name: &str) -> Option<Arc<dyn ScmAdapter>> {
        self.scms.get(name)
    }
    pub fn notifier(&self, name: &str) -> Option<Arc<dyn NotifyAdapter>> {
        self.notifiers.get(name)
    }

    /// Look up a single slot by name, for `list(slot)`-style introspection.
    pub fn list(&self, slot: Slot) -> Vec<String> {
        match slot {
            Slot::Runtime => self.runtimes.names(),
            Slot::Agent => self.agents.names(),
            Slot::Workspace => self.workspaces.names(),
            Slot::Tracker => self.trackers.names(),
            Slot::Scm => self.scms.names(),
            Slot::Notifier => self.notifiers.names(),
            Slot::Terminal => Vec::new(),
        }
    }

    /// Resolve `name` in `slot`, returning a typed error the caller can
    /// surface to the operator if it's missing.
    pub fn require(&self, project: &str, slot: Slot, name: &str) -> Result<(), RegistryError> {
        let found = match slot {
            Slot::Runtime => self.runtimes.get(name).is_some(),
            Slot::Agent => self.agents.get(name).is_some(),
            Slot::Workspace => self.workspaces.get(name).is_some(),
            Slot::Tracker => self.trackers.get(name).is_some(),
            Slot::Scm => self.scms.get(name).is_some(),
            Slot::Notifier => self.notifiers.get(name).is_some(),
            Slot::Terminal => true,
        };
        if found {
            Ok(())
        } else {
            Err(RegistryError::UnknownPlugin {
                project: project.to_string(),
                slot: slot.name().to_string(),
                name: name.to_string(),
            })
        }
    }

    /// Attempt to construct each well-known adapter. A builtin whose
    /// prerequisites are unavailable (no `tmux` on `$PATH`, no tracker
    /// token configured, ...) is skipped silently — this is the
    /// extensibility contract, not an error.
    pub fn load_builtins(&self) {
        let tmux = TmuxAdapter::new();
        if tmux_is_available() {
            self.register_runtime("tmux", Arc::new(TracedRuntime::new(tmux.clone())));
            self.register_agent(
                "generic-cli",
                Arc::new(TracedAgent::new(GenericCliAgentAdapter::new(
                    tmux, "claude",
                ))),
            );
        } else {
            tracing::info!("tmux not found on PATH, skipping tmux runtime and generic-cli agent");
        }

        self.register_workspace("git-worktree", Arc::new(GitWorktreeAdapter::new()));

        if let Some(tracker) = GitHubTrackerAdapter::from_env() {
            self.register_tracker("github", Arc::new(tracker));
        } else {
            tracing::info!("GITHUB_TOKEN not set, skipping github tracker");
        }
        if let Some(scm) = GitHubScmAdapter::from_env() {
            self.register_scm("github", Arc::new(scm));
        } else {
            tracing::info!("GITHUB_TOKEN not set, skipping github scm");
        }

        self.register_notifier("desktop", Arc::new(DesktopNotifyAdapter::new()));
        self.register_notifier("no-op", Arc::new(NoOpNotifyAdapter::new()));
    }

    /// Builtins plus anything named explicitly in `config`. A name with no
    /// matching constructor is a fatal configuration error.
    pub fn load_from_config(&self, config: &Config) -> Result<(), RegistryError> {
        self.load_builtins();

        for (project_id, project) in &config.projects {
            self.require(project_id, Slot::Runtime, &config.defaults.runtime)?;
            self.require(project_id, Slot::Agent, &config.defaults.agent)?;
            self.require(project_id, Slot::Workspace, &config.defaults.workspace)?;
            let _ = project;
        }

        for (name, cfg) in &config.notifiers {
            if self.notifiers.get(name).is_some() {
                continue;
            }
            let url = cfg
                .get("url")
                .and_then(|v| v.as_str())
                .ok_or_else(|| RegistryError::UnknownPlugin {
                    project: "<notifiers>".to_string(),
                    slot: Slot::Notifier.name().to_string(),
                    name: name.clone(),
                })?;
            let adapter = WebhookNotifyAdapter::new(url).map_err(|_| {
                RegistryError::UnknownPlugin {
                    project: "<notifiers>".to_string(),
                    slot: Slot::Notifier.name().to_string(),
                    name: name.clone(),
                }
            })?;
            self.register_notifier(name.clone(), Arc::new(adapter));
        }

        for notifier_names in config.notification_routing.values() {
            for name in notifier_names {
                if self.notifiers.get(name).is_none() {
                    return Err(RegistryError::UnknownPlugin {
                        project: "<notification_routing>".to_string(),
                        slot: Slot::Notifier.name().to_string(),
                        name: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn tmux_is_available() -> bool {
    std::env::var_os("PATH")
        .and_then(|path| {
            std::env::split_paths(&path)
                .map(|dir| dir.join("tmux"))
                .find(|candidate| candidate.is_file())
        })
        .is_some()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
