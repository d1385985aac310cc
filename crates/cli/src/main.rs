// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fleet - Agent orchestrator CLI

mod client;
mod client_lifecycle;
mod color;
mod commands;
mod daemon_process;
mod env;
mod exit_error;
mod help;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(
    name = "fleet",
    version,
    disable_version_flag = true,
    about = "Agent orchestrator - manage parallel coding agent sessions"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a project config in the state directory
    Init,
    /// Start the daemon in the background
    Start,
    /// Stop the daemon
    Stop,
    /// Spawn a session for a project, optionally tied to an issue
    Spawn {
        /// Project name (must exist in config.toml)
        project: String,
        /// Issue/ticket identifier to attach to the new session
        issue: Option<String>,
    },
    /// Spawn one session per issue for a project
    BatchSpawn {
        /// Project name (must exist in config.toml)
        project: String,
        /// Issue/ticket identifiers, one session is spawned per issue
        #[arg(required = true)]
        issues: Vec<String>,
    },
    /// Show daemon uptime and session counts
    Status,
    /// List sessions, optionally filtered by project
    List {
        /// Filter by project name
        #[arg(long = "project")]
        project: Option<String>,
    },
    /// Attach to a session's terminal
    Attach {
        /// Session ID
        session: String,
    },
    /// Send a message to a session
    Send {
        /// Session ID
        session: String,
        /// Message to deliver to the session's agent
        message: String,
    },
    /// Kill a session
    Kill {
        /// Session ID
        session: String,
    },
    /// Remove terminated sessions, optionally filtered by project
    Cleanup {
        /// Filter by project name
        #[arg(long = "project")]
        project: Option<String>,
    },
    /// Restore a terminated session's workspace
    Restore {
        /// Session ID
        session: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

fn cli_command() -> clap::Command {
    Cli::command()
        .help_template(help::template())
        .before_help(help::commands())
        .after_help(help::after_help())
        .styles(help::styles())
        .arg(
            clap::Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .action(clap::ArgAction::Version)
                .help("Print version"),
        )
}

async fn run() -> Result<()> {
    let matches = match cli_command().try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp {
                let args: Vec<String> = std::env::args().collect();
                print_formatted_help(&args);
                return Ok(());
            }
            e.exit();
        }
    };
    let cli = Cli::from_arg_matches(&matches)?;
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            help::print_help(cli_command());
            return Ok(());
        }
    };

    match command {
        Commands::Init => commands::init::init()?,

        Commands::Start => commands::daemon::start().await?,
        Commands::Stop => commands::daemon::stop().await?,

        Commands::Status => commands::session::status(format).await?,

        Commands::List { project } => {
            let client = DaemonClient::for_query()?;
            commands::session::list(&client, project.as_deref(), format).await?
        }

        Commands::Spawn { project, issue } => {
            let client = DaemonClient::for_action()?;
            commands::session::spawn(&client, &project, issue.as_deref(), format).await?
        }

        Commands::BatchSpawn { project, issues } => {
            let client = DaemonClient::for_action()?;
            commands::session::batch_spawn(&client, &project, issues, format).await?
        }

        Commands::Send { session, message } => {
            let client = DaemonClient::for_action()?;
            commands::session::send(&client, &session, &message).await?
        }

        Commands::Kill { session } => {
            let client = DaemonClient::for_action()?;
            commands::session::kill(&client, &session).await?
        }

        Commands::Cleanup { project } => {
            let client = DaemonClient::for_action()?;
            commands::session::cleanup(&client, project.as_deref(), format).await?
        }

        Commands::Restore { session } => {
            let client = DaemonClient::for_action()?;
            commands::session::restore(&client, &session, format).await?
        }

        // Attach shells out to tmux directly; it needs no daemon round-trip.
        Commands::Attach { session } => commands::session::attach(&session)?,
    }

    Ok(())
}

/// Print help with post-hoc colorization, resolving the correct subcommand from args.
fn print_formatted_help(args: &[String]) {
    let cmd = cli_command();

    let non_flags: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'))
        .collect();

    let subcommand_names: Vec<&str> = if non_flags.first().map(|s| s.as_str()) == Some("help") {
        non_flags.iter().skip(1).map(|s| s.as_str()).collect()
    } else {
        non_flags.iter().map(|s| s.as_str()).collect()
    };

    let target_cmd = find_subcommand(cmd, &subcommand_names);
    help::print_help(target_cmd);
}

/// Recursively find a nested subcommand by name path.
pub(crate) fn find_subcommand(mut cmd: clap::Command, names: &[&str]) -> clap::Command {
    for name in names {
        let mut found_sub = None;
        for sub in cmd.get_subcommands() {
            if sub.get_name() == *name || sub.get_all_aliases().any(|a| a == *name) {
                found_sub = Some(sub.get_name().to_string());
                break;
            }
        }
        if let Some(sub_name) = found_sub {
            if let Some(sub) = cmd.find_subcommand_mut(&sub_name) {
                cmd = sub.clone();
            } else {
                break;
            }
        } else {
            break;
        }
    }
    cmd
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
