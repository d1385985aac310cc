// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative project configuration, loaded from `config.toml`.
//!
//! Validation is strict at the top level (unknown keys are rejected) but
//! permissive inside plugin-owned config blocks, which are opaque TOML
//! tables interpreted only by the matching adapter.

use crate::reaction::ReactionSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("port {0} is out of range 1..=65535")]
    InvalidPort(u32),
    #[error("project '{project}' references unknown plugin '{name}' in slot '{slot}'")]
    UnknownPlugin {
        project: String,
        slot: String,
        name: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default = "default_runtime")]
    pub runtime: String,
    #[serde(default = "default_agent")]
    pub agent: String,
    #[serde(default = "default_workspace")]
    pub workspace: String,
    #[serde(default)]
    pub notifiers: Vec<String>,
}

fn default_runtime() -> String {
    "tmux".to_string()
}
fn default_agent() -> String {
    "generic-cli".to_string()
}
fn default_workspace() -> String {
    "git-worktree".to_string()
}

impl Defaults {
    fn placeholder() -> Self {
        Self {
            runtime: default_runtime(),
            agent: default_agent(),
            workspace: default_workspace(),
            notifiers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
    pub repo: String,
    pub path: PathBuf,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub session_prefix: String,
    #[serde(default)]
    pub agent_rules: Option<String>,
    #[serde(default)]
    pub orchestrator_rules: Option<String>,
    #[serde(default)]
    pub symlinks: Vec<String>,
    #[serde(default)]
    pub post_create: Vec<String>,
    #[serde(default)]
    pub tracker_config: toml::Table,
    #[serde(default)]
    pub agent_config: toml::Table,
    #[serde(default)]
    pub reactions: HashMap<String, ReactionSpec>,
}

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    #[serde(default = "default_worktree_dir")]
    pub worktree_dir: PathBuf,
    #[serde(default = "default_port")]
    pub port: u32,
    #[serde(default = "Defaults::placeholder")]
    pub defaults: Defaults,
    pub projects: HashMap<String, ProjectConfig>,
    #[serde(default)]
    pub notifiers: HashMap<String, toml::Table>,
    #[serde(default)]
    pub notification_routing: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub reactions: HashMap<String, ReactionSpec>,
}

fn default_worktree_dir() -> PathBuf {
    PathBuf::from("worktrees")
}

fn default_port() -> u32 {
    7878
}

impl Config {
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &std::path::Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 || self.port > 65535 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
