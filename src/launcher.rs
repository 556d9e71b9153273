//! Launching channels and creating desktop launchers.
//!
//! The launch contract: the channel executable is started with an isolated
//! profile (`-profile <dir>`) and single-instance remoting disabled
//! (`-no-remote`); any files handed to this tool's own command line are
//! forwarded once as additional arguments.
//!
//! Launcher creation is the post-install collaborator: a small platform
//! script in the base directory that applies the same contract. Its
//! failures are reported as warnings by the caller, never escalated — a
//! missing launcher does not invalidate an install.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::channel::{ChannelName, ChannelPaths};
use crate::core::FxpmError;

/// Compose the argument vector for the launch contract.
fn launch_args(paths: &ChannelPaths, extra_files: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> =
        vec!["-profile".into(), paths.profile_dir.clone().into(), "-no-remote".into()];
    args.extend(extra_files.iter().map(|file| file.clone().into()));
    args
}

/// Start the channel's executable, detached from this process.
///
/// # Errors
///
/// [`FxpmError::LaunchFailed`] when the executable is missing or cannot be
/// spawned.
pub fn launch_channel(paths: &ChannelPaths, extra_files: &[PathBuf]) -> Result<(), FxpmError> {
    if !paths.executable.exists() {
        return Err(FxpmError::LaunchFailed {
            executable: paths.executable.display().to_string(),
            reason: "not installed".to_string(),
        });
    }

    std::process::Command::new(&paths.executable)
        .args(launch_args(paths, extra_files))
        .spawn()
        .map_err(|e| FxpmError::LaunchFailed {
            executable: paths.executable.display().to_string(),
            reason: e.to_string(),
        })?;

    info!("launched {}", paths.executable.display());
    Ok(())
}

/// Filename of the launcher script for `channel` in the base directory.
pub fn launcher_name(channel: ChannelName) -> String {
    let channel = channel.to_string().to_lowercase();
    #[cfg(windows)]
    return format!("firefox-portable-{channel}.cmd");
    #[cfg(not(windows))]
    format!("firefox-portable-{channel}.sh")
}

/// Write the launcher script for `channel` into `base_dir`.
///
/// Overwrites any previous launcher so the embedded paths track the
/// current base directory.
pub fn create_launcher(
    base_dir: &Path,
    paths: &ChannelPaths,
    channel: ChannelName,
) -> Result<PathBuf, FxpmError> {
    let launcher = base_dir.join(launcher_name(channel));

    #[cfg(windows)]
    let content = format!(
        "@echo off\r\nstart \"\" \"{}\" -profile \"{}\" -no-remote %*\r\n",
        paths.executable.display(),
        paths.profile_dir.display()
    );
    #[cfg(not(windows))]
    let content = format!(
        "#!/bin/sh\nexec \"{}\" -profile \"{}\" -no-remote \"$@\"\n",
        paths.executable.display(),
        paths.profile_dir.display()
    );

    std::fs::write(&launcher, content)
        .map_err(|e| FxpmError::filesystem("write launcher", &launcher, &e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&launcher, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| FxpmError::filesystem("set launcher permissions", &launcher, &e))?;
    }

    info!("launcher written to {}", launcher.display());
    Ok(launcher)
}

/// Remove the launcher script for `channel`, if present.
pub fn remove_launcher(base_dir: &Path, channel: ChannelName) -> Result<(), FxpmError> {
    let launcher = base_dir.join(launcher_name(channel));
    if launcher.exists() {
        std::fs::remove_file(&launcher)
            .map_err(|e| FxpmError::filesystem("remove launcher", &launcher, &e))?;
    }
    Ok(())
}
