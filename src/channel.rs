//! Channel identity, on-disk layout, and derived local installation state.
//!
//! A [`Channel`] pairs one of the statically enumerated channel names with
//! the remote source URL its artifacts are downloaded from. Everything else
//! is derived: [`ChannelPaths`] computes the per-channel directory layout
//! from the configured base directory, and [`LocalInstallation`] is the
//! per-check snapshot of what is actually on disk. Local state is
//! recomputed on every check and never cached, because installs can happen
//! between checks.
//!
//! Layout per channel:
//!
//! ```text
//! <baseDir>/<Channel>/core/<executable>   application files, replaced on update
//! <baseDir>/<Channel>/profile/            isolated user profile, never touched
//! <baseDir>/temp_install/                 shared scratch root during installs
//! <baseDir>/temp_install/extracted/       archive extraction target
//! ```

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{
    BACKUP_SUFFIX, CORE_DIR, EXECUTABLE_NAME, EXTRACTED_DIR, PROFILE_DIR, SCRATCH_DIR,
    UNKNOWN_VERSION,
};
use crate::version;

/// Platform segment of the download URL, fixed at compile time.
#[cfg(windows)]
const DOWNLOAD_OS: &str = "win64";
#[cfg(target_os = "macos")]
const DOWNLOAD_OS: &str = "osx";
#[cfg(not(any(windows, target_os = "macos")))]
const DOWNLOAD_OS: &str = "linux64";

/// The fixed set of release channels this tool manages.
///
/// Channels are enumerated statically at startup; there is no dynamic
/// registration. The `Display` form doubles as the channel's directory name
/// under the base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ChannelName {
    /// The release channel
    Stable,
    /// The beta channel
    Beta,
    /// The nightly channel
    Nightly,
}

impl ChannelName {
    /// All channels, in the order they are swept and displayed.
    pub const ALL: [ChannelName; 3] = [ChannelName::Stable, ChannelName::Beta, ChannelName::Nightly];

    /// Bouncer product token for this channel's latest build.
    fn product(self) -> &'static str {
        match self {
            ChannelName::Stable => "firefox-latest-ssl",
            ChannelName::Beta => "firefox-beta-latest-ssl",
            ChannelName::Nightly => "firefox-nightly-latest-ssl",
        }
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelName::Stable => "Stable",
            ChannelName::Beta => "Beta",
            ChannelName::Nightly => "Nightly",
        };
        f.write_str(name)
    }
}

/// A channel plus the URL its artifacts are fetched from.
///
/// [`Channel::builtin`] wires up the Mozilla bouncer endpoint for the current
/// platform; tests construct channels against local endpoints instead.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Channel identity (also the directory name under the base dir)
    pub name: ChannelName,
    /// Remote source locator for the latest artifact
    pub url: String,
}

impl Channel {
    /// The built-in channel definition with the official download endpoint.
    pub fn builtin(name: ChannelName) -> Self {
        Self {
            name,
            url: format!(
                "https://download.mozilla.org/?product={}&os={}&lang=en-US",
                name.product(),
                DOWNLOAD_OS
            ),
        }
    }

    /// All built-in channels in sweep order.
    pub fn all() -> Vec<Channel> {
        ChannelName::ALL.iter().map(|&name| Self::builtin(name)).collect()
    }

    /// A channel pointing at an arbitrary URL. Used by tests to run the
    /// pipeline against a local endpoint.
    pub fn with_url(name: ChannelName, url: impl Into<String>) -> Self {
        Self {
            name,
            url: url.into(),
        }
    }
}

/// Per-channel filesystem layout, derived from the base directory.
#[derive(Debug, Clone)]
pub struct ChannelPaths {
    /// `<base>/<Channel>`
    pub root: PathBuf,
    /// `<base>/<Channel>/core`
    pub core_dir: PathBuf,
    /// `<base>/<Channel>/core/<executable>`
    pub executable: PathBuf,
    /// `<base>/<Channel>/profile`
    pub profile_dir: PathBuf,
    /// `<base>/temp_install` — shared scratch root for installs
    pub scratch_dir: PathBuf,
}

impl ChannelPaths {
    /// Compute the layout for `name` under `base_dir`.
    pub fn new(base_dir: &Path, name: ChannelName) -> Self {
        let root = base_dir.join(name.to_string());
        let core_dir = root.join(CORE_DIR);
        Self {
            executable: core_dir.join(EXECUTABLE_NAME),
            profile_dir: root.join(PROFILE_DIR),
            scratch_dir: base_dir.join(SCRATCH_DIR),
            root,
            core_dir,
        }
    }

    /// Sibling path the core directory is renamed to while an install runs.
    pub fn backup_dir(&self) -> PathBuf {
        let mut name = self.core_dir.file_name().unwrap_or_default().to_os_string();
        name.push(BACKUP_SUFFIX);
        self.core_dir.with_file_name(name)
    }

    /// Extraction target inside the scratch root.
    pub fn extract_dir(&self) -> PathBuf {
        self.scratch_dir.join(EXTRACTED_DIR)
    }

    /// Download target for this channel's artifact inside the scratch root.
    pub fn artifact_path(&self) -> PathBuf {
        let channel = self.root.file_name().unwrap_or_default().to_string_lossy();
        self.scratch_dir.join(format!("firefox_{channel}.installer"))
    }
}

/// Snapshot of a channel's local installation, computed on demand.
///
/// `version` is the [`UNKNOWN_VERSION`] sentinel when the executable exists
/// but no version could be read; see [`crate::version::resolve_local_version`].
#[derive(Debug, Clone)]
pub struct LocalInstallation {
    /// Expected executable path (present or not)
    pub executable: PathBuf,
    /// Isolated profile directory for this channel
    pub profile_dir: PathBuf,
    /// Installed version string, or the `"unknown"` sentinel
    pub version: String,
    /// Whether the executable exists on disk
    pub installed: bool,
}

impl LocalInstallation {
    /// Inspect the filesystem for the channel's current state.
    pub fn inspect(paths: &ChannelPaths) -> Self {
        let installed = paths.executable.exists();
        let version = if installed {
            version::resolve_local_version(&paths.executable)
        } else {
            UNKNOWN_VERSION.to_string()
        };
        Self {
            executable: paths.executable.clone(),
            profile_dir: paths.profile_dir.clone(),
            version,
            installed,
        }
    }

    /// True when the installed version could not be determined.
    pub fn version_unknown(&self) -> bool {
        self.version == UNKNOWN_VERSION
    }
}
