// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleet init` - scaffold a minimal `config.toml` in the state directory.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use fleet_core::{Config, Defaults};

pub fn init() -> Result<()> {
    let state_dir = crate::env::state_dir().map_err(|e| anyhow!("{}", e))?;
    let config_path = state_dir.join("config.toml");

    if config_path.exists() {
        return Err(anyhow!(
            "config already exists at {}",
            config_path.display()
        ));
    }

    std::fs::create_dir_all(&state_dir)?;

    let config = Config {
        data_dir: state_dir.join("data"),
        worktree_dir: state_dir.join("worktrees"),
        port: 7878,
        defaults: Defaults::default(),
        projects: HashMap::new(),
        notifiers: HashMap::new(),
        notification_routing: HashMap::new(),
        reactions: HashMap::new(),
    };

    let text = toml::to_string_pretty(&config)?;
    std::fs::write(&config_path, text)?;

    println!("Scaffolded config at {}", config_path.display());
    println!("Add a [projects.<name>] section before running `fleet spawn`.");
    Ok(())
}
