//! `fxpm update` — check one channel and install after confirmation.
//!
//! The manual flow is interactive by contract: the operator is informed of
//! the verdict and must confirm before the pipeline runs, and is informed
//! synchronously of the outcome afterwards. `--yes` answers every prompt
//! for scripted use; `--reinstall` forces a repair cycle when the channel
//! is already current.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::sync::Arc;

use super::ChannelArg;
use super::common::confirm;
use crate::channel::{Channel, LocalInstallation};
use crate::config::Settings;
use crate::constants::UNKNOWN_VERSION;
use crate::scheduler::{ReconcileEvent, Scheduler};
use crate::version;

/// Arguments for the update command.
#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    target: ChannelArg,

    /// Answer yes to every prompt
    #[arg(short, long)]
    yes: bool,

    /// Reinstall even when the channel is already up to date
    #[arg(long)]
    reinstall: bool,
}

/// Present the reconciliation verdict and decide whether to install.
async fn should_install(
    args: &UpdateArgs,
    local: &LocalInstallation,
    remote: Option<&str>,
) -> Result<bool> {
    if !local.installed {
        println!("{} is not installed.", args.target.channel);
        println!("Path: {}", local.executable.display());
        if let Some(remote) = remote {
            println!("Available: {remote}");
        }
        return confirm("Install now?", args.yes).await;
    }

    let local_display =
        if local.version_unknown() { UNKNOWN_VERSION } else { local.version.as_str() };

    match remote {
        Some(remote_version) if version::is_newer(&local.version, remote_version) => {
            println!("{}", "Update available!".red().bold());
            println!("Local:  {local_display}");
            println!("Online: {remote_version}");
            confirm("Update now?", args.yes).await
        }
        Some(remote_version) => {
            println!("{}", "Version is up to date.".green());
            println!("Local:  {local_display}");
            println!("Online: {remote_version}");
            if args.reinstall {
                return Ok(true);
            }
            // --yes alone never forces a repair; that takes --reinstall
            confirm("Reinstall / repair anyway?", false).await
        }
        None => {
            println!("{}", "No online version information.".yellow());
            println!("Local: {local_display}");
            confirm("Download anyway?", args.yes).await
        }
    }
}

/// Check the channel, confirm, run the install pipeline, and report the
/// outcome synchronously.
pub async fn execute(args: UpdateArgs, settings: Arc<Settings>) -> Result<()> {
    let channel = Channel::builtin(args.target.channel);
    let scheduler = Scheduler::new(settings);

    println!("Checking online version for {}...", channel.name);
    let (local, remote) =
        scheduler.spawn_check(channel.clone()).await.context("version check task failed")?;

    if !should_install(&args, &local, remote.as_deref()).await? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut events = scheduler.spawn_install(channel)?;

    let mut outcome = None;
    while let Some(event) = events.recv().await {
        match event {
            ReconcileEvent::Progress { message, .. } => println!("  {message}"),
            ReconcileEvent::InstallFinished { result, .. } => outcome = Some(result),
            ReconcileEvent::Status { channel, status } => {
                println!("{channel}: {status}");
            }
            ReconcileEvent::SweepFinished { .. } => {}
        }
    }

    match outcome {
        Some(Ok(())) => {
            println!("{}", format!("{} installed.", args.target.channel).green().bold());
            Ok(())
        }
        Some(Err(err)) => Err(err).context("installation failed"),
        None => bail!("install task ended without reporting an outcome"),
    }
}
