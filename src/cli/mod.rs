//! Command-line interface.
//!
//! Each command lives in its own module with an args struct and an
//! `execute` entry point. The command handler is the coordinating context
//! from the concurrency model: it loads a settings snapshot, dispatches
//! background work through the [`crate::scheduler`], and is the only place
//! that renders results to the terminal.
//!
//! Commands:
//! - `status` — sweep all channels and print the reconciliation table
//! - `update` — check one channel and install/update/repair after
//!   confirmation
//! - `launch` — start a channel with its isolated profile
//! - `delete` — remove a channel installation
//! - `config` — show or change persisted settings

pub mod common;

mod config;
mod delete;
mod launch;
mod status;
mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::channel::ChannelName;
use crate::config::Settings;

/// Portable Firefox channel manager.
///
/// Keeps isolated Stable/Beta/Nightly installations up to date, each with
/// its own core directory and user profile.
#[derive(Parser, Debug)]
#[command(name = "fxpm", version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file (defaults to the platform config dir,
    /// or $FXPM_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check all channels and show their installation status
    Status(status::StatusArgs),
    /// Check one channel for updates and install after confirmation
    Update(update::UpdateArgs),
    /// Start a channel with its isolated profile
    Launch(launch::LaunchArgs),
    /// Remove a channel installation
    Delete(delete::DeleteArgs),
    /// Show or change persisted settings
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

impl Cli {
    /// Default log filter derived from the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "fxpm_cli=debug"
        } else if self.quiet {
            "error"
        } else {
            // Commands render their own results; the default log level only
            // surfaces degraded probes and other warnings
            "fxpm_cli=warn"
        }
    }

    /// Execute the selected command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(self.config.clone()).await?.snapshot();

        match self.command {
            Commands::Status(args) => status::execute(args, settings).await,
            Commands::Update(args) => update::execute(args, settings).await,
            Commands::Launch(args) => launch::execute(args, settings).await,
            Commands::Delete(args) => delete::execute(args, settings).await,
            Commands::Config(command) => config::execute(command, self.config, settings).await,
        }
    }
}

/// Shared positional argument: which channel a command targets.
#[derive(clap::Args, Debug)]
pub struct ChannelArg {
    /// Target channel
    #[arg(value_enum, value_name = "CHANNEL")]
    pub channel: ChannelName,
}
