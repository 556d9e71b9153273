//! `fxpm status` — the startup reconciliation sweep.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::channel::Channel;
use crate::config::Settings;
use crate::scheduler::{ReconcileEvent, Scheduler};
use crate::status::InstallStatus;

/// Arguments for the status command.
#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

/// Sweep every channel and print the reconciliation table as results
/// arrive. Check failures degrade inside the sweep and are reported only
/// through the log, never as interruptive errors.
pub async fn execute(_args: StatusArgs, settings: Arc<Settings>) -> Result<()> {
    println!("Base directory: {}", settings.base_dir.display());

    let scheduler = Scheduler::new(settings);
    let mut events = scheduler.spawn_sweep(Channel::all());

    while let Some(event) = events.recv().await {
        match event {
            ReconcileEvent::Status { channel, status } => {
                let rendered = match &status {
                    InstallStatus::NotInstalled => status.to_string().dimmed().to_string(),
                    InstallStatus::UnknownVersionInstalled | InstallStatus::UpToDate { .. } => {
                        status.to_string().green().to_string()
                    }
                    InstallStatus::UpdateAvailable { .. } => {
                        status.to_string().red().bold().to_string()
                    }
                };
                println!("  {channel:<8} {rendered}");
            }
            ReconcileEvent::SweepFinished { updates_available } => {
                if updates_available > 0 {
                    println!("{}", format!("{updates_available} update(s) found.").red());
                } else {
                    println!("{}", "All installations up to date.".green());
                }
            }
            // The sweep produces no install events
            ReconcileEvent::Progress { .. } | ReconcileEvent::InstallFinished { .. } => {}
        }
    }

    Ok(())
}
