//! Shared constants for paths, sentinels, and timing.

use std::time::Duration;

/// Sentinel returned when a local installation's version cannot be read.
///
/// The comparator treats any string containing this token as `(0, 0, 0)`, so
/// an unreadable install never wins a "newer" verdict in either direction.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Name of the channel subdirectory holding the application files.
pub const CORE_DIR: &str = "core";

/// Name of the channel subdirectory holding the isolated user profile.
pub const PROFILE_DIR: &str = "profile";

/// Scratch root under the base directory used by in-flight installs.
pub const SCRATCH_DIR: &str = "temp_install";

/// Subdirectory of the scratch root that archives are extracted into.
pub const EXTRACTED_DIR: &str = "extracted";

/// Suffix appended to a core directory when it is renamed aside as a backup.
pub const BACKUP_SUFFIX: &str = "_bak";

/// Sidecar metadata file read beside the executable for the version token.
pub const APPLICATION_INI: &str = "application.ini";

/// Timeout for the remote version probe. Applies only to the HEAD request,
/// never to downloads or extraction.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Platform executable name for the managed product.
#[cfg(windows)]
pub const EXECUTABLE_NAME: &str = "firefox.exe";
/// Platform executable name for the managed product.
#[cfg(not(windows))]
pub const EXECUTABLE_NAME: &str = "firefox";
