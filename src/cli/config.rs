//! `fxpm config` — show or change persisted settings.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;

/// Configuration subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the active settings
    Show,
    /// Set the base directory channels are installed under
    SetBaseDir {
        /// New base directory (tilde-expanded)
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Set the archive tool used to unpack installers
    SetTool {
        /// Path to the 7-Zip executable (tilde-expanded)
        #[arg(value_name = "PATH")]
        path: String,
    },
}

async fn save(settings: Settings, config_override: Option<PathBuf>) -> Result<()> {
    match config_override {
        Some(path) => settings.save_to(&path).await,
        None => settings.save().await,
    }
}

/// Execute a config subcommand against the loaded settings.
pub async fn execute(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
    settings: Arc<Settings>,
) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("base directory: {}", settings.base_dir.display());
            match &settings.extractor_path {
                Some(path) => println!("archive tool:   {} (configured)", path.display()),
                None => match settings.resolve_extractor() {
                    Ok(found) => println!("archive tool:   {} (found on PATH)", found.display()),
                    Err(_) => println!("archive tool:   {}", "not found".red()),
                },
            }
            let config_path = match config_override {
                Some(path) => path,
                None => Settings::default_path()?,
            };
            println!("settings file:  {}", config_path.display());
            Ok(())
        }
        ConfigCommand::SetBaseDir { path } => {
            let mut updated = (*settings).clone();
            updated.base_dir = PathBuf::from(shellexpand::tilde(&path).into_owned());
            println!("base directory set to {}", updated.base_dir.display());
            save(updated, config_override).await
        }
        ConfigCommand::SetTool { path } => {
            let mut updated = (*settings).clone();
            let expanded = PathBuf::from(shellexpand::tilde(&path).into_owned());
            if !expanded.exists() {
                eprintln!("{}", format!("warning: {} does not exist yet", expanded.display()).yellow());
            }
            updated.extractor_path = Some(expanded);
            save(updated, config_override).await
        }
    }
}
