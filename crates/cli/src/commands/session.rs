// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-centric command handlers: spawn, list, status, send, kill,
//! cleanup, restore, attach.

use std::io::Write;

use anyhow::{anyhow, bail, Result};

use crate::client::{ClientError, DaemonClient};
use crate::output::{format_time_ago, OutputFormat};
use crate::table::{project_cell, should_show_project, Column, Table};
use fleet_daemon::protocol::SessionEntry;

fn not_connected(e: &ClientError) -> bool {
    matches!(e, ClientError::DaemonNotRunning)
        || matches!(
            e,
            ClientError::Io(io) if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
            )
        )
}

pub async fn status(format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(_) => return print_not_running(format),
    };

    let summary = match client.status().await {
        Ok(s) => s,
        Err(e) if not_connected(&e) => return print_not_running(format),
        Err(e) => return Err(anyhow!("{}", e)),
    };

    match format {
        OutputFormat::Text => {
            println!("Status: running");
            println!("Version: {}", summary.version);
            println!("Uptime: {}", format_uptime(summary.uptime_secs));
            println!("Sessions: {} total", summary.session_count);
            for (status, count) in &summary.sessions_by_status {
                println!("  {}: {}", status, count);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn print_not_running(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("Daemon not running"),
        OutputFormat::Json => println!(r#"{{ "status": "not_running" }}"#),
    }
    Ok(())
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

pub async fn list(client: &DaemonClient, project: Option<&str>, format: OutputFormat) -> Result<()> {
    let sessions = client.list(project).await?;

    match format {
        OutputFormat::Text => {
            if sessions.is_empty() {
                println!("No sessions");
                return Ok(());
            }
            print_session_table(&mut std::io::stdout(), &sessions);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sessions)?),
    }
    Ok(())
}

fn print_session_table(w: &mut impl Write, sessions: &[SessionEntry]) {
    let show_project = should_show_project(sessions.iter().map(|s| s.project_id.as_str()));

    let mut columns = vec![Column::muted("SESSION")];
    if show_project {
        columns.push(Column::left("PROJECT"));
    }
    columns.push(Column::left("BRANCH"));
    columns.push(Column::status("STATUS"));
    columns.push(Column::left("UPDATED"));

    let mut table = Table::new(columns);
    for s in sessions {
        let mut row = vec![s.id.clone()];
        if show_project {
            row.push(project_cell(&s.project_id));
        }
        row.push(s.branch.clone());
        row.push(s.status.clone());
        row.push(format_time_ago(s.last_activity_at.timestamp_millis() as u64));
        table.row(row);
    }
    table.render(w);
}

pub async fn spawn(
    client: &DaemonClient,
    project: &str,
    issue: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let entry = client.spawn(project, issue).await?;
    print_session_entry(&entry, format)
}

pub async fn batch_spawn(
    client: &DaemonClient,
    project: &str,
    issues: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let entries = client.batch_spawn(project, issues).await?;
    match format {
        OutputFormat::Text => {
            println!("Spawned {} session(s):", entries.len());
            print_session_table(&mut std::io::stdout(), &entries);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

fn print_session_entry(entry: &SessionEntry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Session: {}", entry.id);
            println!("Project: {}", entry.project_id);
            println!("Branch: {}", entry.branch);
            println!("Workspace: {}", entry.workspace_path);
            println!("Status: {}", entry.status);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
    }
    Ok(())
}

pub async fn send(client: &DaemonClient, id: &str, message: &str) -> Result<()> {
    client.send_message(id, message).await?;
    println!("Sent to session {}", id);
    Ok(())
}

pub async fn kill(client: &DaemonClient, id: &str) -> Result<()> {
    client.kill(id).await?;
    println!("Session killed: {}", id);
    Ok(())
}

pub async fn cleanup(
    client: &DaemonClient,
    project: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let removed = client.cleanup(project).await?;
    match format {
        OutputFormat::Text => {
            if removed.is_empty() {
                println!("No sessions to clean up");
            } else {
                println!("Removed {} session(s):", removed.len());
                for id in &removed {
                    println!("  {}", id);
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&removed)?),
    }
    Ok(())
}

pub async fn restore(client: &DaemonClient, id: &str, format: OutputFormat) -> Result<()> {
    let entry = client.restore(id).await?;
    print_session_entry(&entry, format)
}

/// Attach to a session's tmux terminal. Session names are `fleet-<id>`,
/// matching the naming the tmux runtime adapter uses when it spawns sessions.
pub fn attach(id: &str) -> Result<()> {
    let tmux_session = format!("fleet-{}", id);
    let status = std::process::Command::new("tmux")
        .args(["attach", "-t", &tmux_session])
        .status()?;

    if !status.success() {
        bail!("Failed to attach to session {}", id);
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
