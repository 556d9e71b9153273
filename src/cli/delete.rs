//! `fxpm delete` — remove a channel installation.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use super::ChannelArg;
use super::common::confirm;
use crate::channel::ChannelPaths;
use crate::config::Settings;
use crate::launcher;
use crate::utils::fs as fs_util;

/// Arguments for the delete command.
#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    target: ChannelArg,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

/// Remove the channel directory (core *and* profile) and its launcher.
pub async fn execute(args: DeleteArgs, settings: Arc<Settings>) -> Result<()> {
    let channel = args.target.channel;
    let paths = ChannelPaths::new(&settings.base_dir, channel);

    if !paths.executable.exists() {
        println!("{channel} is not installed.");
        return Ok(());
    }

    let question = format!("Really delete Firefox {channel} (including its profile)?");
    if !confirm(&question, args.yes).await? {
        println!("Cancelled.");
        return Ok(());
    }

    fs_util::remove_dir_all(&paths.root)?;
    launcher::remove_launcher(&settings.base_dir, channel)?;

    println!("{}", format!("{channel} deleted.").green());
    Ok(())
}
