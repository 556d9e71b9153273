//! Per-channel installation status.
//!
//! [`InstallStatus`] is presentation-facing and holds no independent truth:
//! it is always recomputable from a [`LocalInstallation`] snapshot, the
//! remote version (if any), and the comparator. Two lenient rules are
//! deliberate product decisions, not bugs:
//!
//! - an executable whose version cannot be read is classified as an
//!   acceptable install ([`InstallStatus::UnknownVersionInstalled`]) —
//!   presence of the file is sufficient evidence of a usable install;
//! - a failed remote probe with a known local version classifies as
//!   [`InstallStatus::UpToDate`] — connectivity absence must never be
//!   surfaced as "update available" or as an error state.

use std::fmt;

use crate::channel::LocalInstallation;
use crate::version;

/// Reconciliation verdict for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// No executable on disk.
    NotInstalled,
    /// Executable present but no version source succeeded; treated as
    /// current for display purposes.
    UnknownVersionInstalled,
    /// Installed and no evidence of a newer remote version.
    UpToDate {
        /// The installed version
        version: String,
    },
    /// The remote feed published something newer.
    UpdateAvailable {
        /// The installed version
        local: String,
        /// The published version
        remote: String,
    },
}

impl InstallStatus {
    /// Pure resolution of `(local, remote)` into a status.
    pub fn resolve(local: &LocalInstallation, remote: Option<&str>) -> Self {
        if !local.installed {
            return Self::NotInstalled;
        }
        if local.version_unknown() {
            return Self::UnknownVersionInstalled;
        }
        match remote {
            Some(remote_version) if version::is_newer(&local.version, remote_version) => {
                Self::UpdateAvailable {
                    local: local.version.clone(),
                    remote: remote_version.to_string(),
                }
            }
            _ => Self::UpToDate {
                version: local.version.clone(),
            },
        }
    }

    /// True when this status should prompt the operator to update.
    pub fn update_available(&self) -> bool {
        matches!(self, Self::UpdateAvailable { .. })
    }
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "Not installed"),
            Self::UnknownVersionInstalled => write!(f, "Installed (Ver.?)"),
            Self::UpToDate { version } => write!(f, "{version}"),
            Self::UpdateAvailable { local, remote } => {
                write!(f, "{local} (Update! {remote} available)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNKNOWN_VERSION;
    use std::path::PathBuf;

    fn local(installed: bool, version: &str) -> LocalInstallation {
        LocalInstallation {
            executable: PathBuf::from("/base/Stable/core/firefox"),
            profile_dir: PathBuf::from("/base/Stable/profile"),
            version: version.to_string(),
            installed,
        }
    }

    #[test]
    fn missing_executable_is_not_installed_regardless_of_remote() {
        let l = local(false, UNKNOWN_VERSION);
        assert_eq!(InstallStatus::resolve(&l, None), InstallStatus::NotInstalled);
        assert_eq!(InstallStatus::resolve(&l, Some("999.0")), InstallStatus::NotInstalled);
    }

    #[test]
    fn unknown_version_with_file_present_is_acceptable() {
        let l = local(true, UNKNOWN_VERSION);
        assert_eq!(InstallStatus::resolve(&l, None), InstallStatus::UnknownVersionInstalled);
        assert_eq!(
            InstallStatus::resolve(&l, Some("999.0")),
            InstallStatus::UnknownVersionInstalled
        );
    }

    #[test]
    fn probe_failure_is_up_to_date_never_an_error() {
        let l = local(true, "131.0.1");
        assert_eq!(
            InstallStatus::resolve(&l, None),
            InstallStatus::UpToDate {
                version: "131.0.1".to_string()
            }
        );
    }

    #[test]
    fn equal_or_older_remote_is_up_to_date() {
        let l = local(true, "131.0.1.9136");
        assert_eq!(
            InstallStatus::resolve(&l, Some("131.0")),
            InstallStatus::UpToDate {
                version: "131.0.1.9136".to_string()
            }
        );
    }

    #[test]
    fn newer_remote_is_update_available() {
        let l = local(true, "131.0.1.9136");
        assert_eq!(
            InstallStatus::resolve(&l, Some("132.0")),
            InstallStatus::UpdateAvailable {
                local: "131.0.1.9136".to_string(),
                remote: "132.0".to_string()
            }
        );
    }
}
