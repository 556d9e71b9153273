//! Error handling for fxpm.
//!
//! The error system is built around two principles:
//! 1. **Strongly-typed errors** ([`FxpmError`]) so the install pipeline can
//!    report exactly which stage failed and callers can match on it.
//! 2. **User-friendly rendering** ([`display_error`]) so the CLI surfaces a
//!    single readable message instead of a raw error chain.
//!
//! Pipeline stages map one-to-one onto variants: tool discovery to
//! [`FxpmError::ToolingUnavailable`], the download to
//! [`FxpmError::DownloadFailed`], the core-directory rename to
//! [`FxpmError::BackupFailed`], archive extraction to
//! [`FxpmError::ExtractionFailed`], the payload search to
//! [`FxpmError::PayloadNotFound`], and generic copy/move failures to
//! [`FxpmError::FilesystemError`]. [`FxpmError::NetworkUnavailable`] is
//! probe-only and never fatal: the remote-version oracle degrades it to
//! "no remote info" with a warning.

use colored::Colorize;
use thiserror::Error;

/// The main error type for fxpm operations.
///
/// Each variant represents a specific failure mode with enough context to
/// produce an actionable message. Errors from the install pipeline after the
/// backup stage imply that the previous core directory was restored (or, if
/// restoration itself failed, that the backup was left on disk — the log
/// carries its path).
#[derive(Error, Debug)]
pub enum FxpmError {
    /// The external archive tool could not be resolved.
    ///
    /// Raised before any network or disk action. The tool is taken from the
    /// configured path first, then discovered on PATH.
    #[error("archive tool not found (configure one with `fxpm config set-tool` or install 7-Zip)")]
    ToolingUnavailable,

    /// Downloading the channel artifact failed (transport error or non-2xx).
    #[error("download failed for {url}: {reason}")]
    DownloadFailed {
        /// The URL that failed to download
        url: String,
        /// Transport or HTTP status description
        reason: String,
    },

    /// Renaming the existing core directory aside failed.
    ///
    /// Typically the application is running and holds a file lock. The
    /// existing installation is left untouched and usable.
    #[error(
        "could not move existing installation aside at {path} (is the application running?): {reason}"
    )]
    BackupFailed {
        /// The core directory that could not be renamed
        path: String,
        /// Underlying rename failure
        reason: String,
    },

    /// The external archive tool exited non-zero.
    #[error("extraction of {archive} failed: {stderr}")]
    ExtractionFailed {
        /// The downloaded archive that failed to extract
        archive: String,
        /// Captured tool diagnostics
        stderr: String,
    },

    /// The expected executable was not found anywhere in the extracted tree.
    #[error("'{executable}' not found in the extracted archive under {root}")]
    PayloadNotFound {
        /// Executable name that was searched for
        executable: String,
        /// Root of the extracted tree that was searched
        root: String,
    },

    /// Generic filesystem failure (copy, move, create, remove).
    #[error("filesystem error during {operation} at {path}: {reason}")]
    FilesystemError {
        /// The operation that failed (e.g. "copy", "create directory")
        operation: String,
        /// Path where the failure occurred
        path: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// The remote version probe could not reach the release endpoint.
    ///
    /// Probe-only and non-fatal: [`crate::version::resolve_remote_version`]
    /// catches this, logs a warning, and reports "no remote info" so that
    /// connectivity absence is never surfaced as "update available".
    #[error("could not reach {url}: {reason}")]
    NetworkUnavailable {
        /// The probe URL
        url: String,
        /// Transport failure description
        reason: String,
    },

    /// An install is already in flight for this channel.
    #[error("an install is already running for the {channel} channel")]
    ChannelBusy {
        /// Name of the busy channel
        channel: String,
    },

    /// Starting the channel executable failed.
    #[error("failed to launch {executable}: {reason}")]
    LaunchFailed {
        /// The executable that failed to start
        executable: String,
        /// Underlying spawn failure
        reason: String,
    },

}

impl FxpmError {
    /// Convenience constructor for [`FxpmError::FilesystemError`].
    pub fn filesystem(operation: &str, path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::FilesystemError {
            operation: operation.to_string(),
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Print an error (and its cause chain) to stderr in the CLI's standard shape.
///
/// The top-level message is shown in red; nested causes are indented below it
/// so the operator sees one coherent report instead of a Debug dump.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".yellow(), cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_render_their_context() {
        let err = FxpmError::DownloadFailed {
            url: "https://example.invalid/fx".to_string(),
            reason: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.invalid/fx"));
        assert!(msg.contains("connection refused"));

        let err = FxpmError::BackupFailed {
            path: "/tmp/Stable/core".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("is the application running?"));
    }

    #[test]
    fn busy_channel_names_the_channel() {
        let err = FxpmError::ChannelBusy {
            channel: "Nightly".to_string(),
        };
        assert!(err.to_string().contains("Nightly"));
    }
}
