//! `fxpm launch` — start a channel with its isolated profile.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::ChannelArg;
use crate::channel::ChannelPaths;
use crate::config::Settings;
use crate::launcher;

/// Arguments for the launch command.
#[derive(clap::Args, Debug)]
pub struct LaunchArgs {
    #[command(flatten)]
    target: ChannelArg,

    /// Files to open, forwarded to the browser once
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,
}

/// Start the channel executable detached, forwarding any files.
pub async fn execute(args: LaunchArgs, settings: Arc<Settings>) -> Result<()> {
    let paths = ChannelPaths::new(&settings.base_dir, args.target.channel);
    launcher::launch_channel(&paths, &args.files)?;
    println!("{} started.", args.target.channel);
    Ok(())
}
