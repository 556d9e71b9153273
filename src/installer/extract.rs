//! External archive-tool invocation and payload location.
//!
//! Extraction is delegated to 7-Zip (or any tool honoring the same
//! conventions): `<tool> x <archive> -o<dest> -y` — extract all, overwrite,
//! non-interactive. Success is exit code zero; anything else surfaces as
//! [`FxpmError::ExtractionFailed`] with the tool's stderr attached.
//!
//! Mozilla installers bury the application directory at varying depths, so
//! after extraction the tree is searched depth-first for the expected
//! executable name; the first directory containing it is the payload.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::FxpmError;

/// A single invocation of the external archive tool.
pub struct ExtractorCommand {
    tool: PathBuf,
    archive: PathBuf,
    destination: PathBuf,
}

impl ExtractorCommand {
    /// Build an extract-all invocation of `tool` for `archive` into
    /// `destination`.
    pub fn new(tool: &Path, archive: &Path, destination: &Path) -> Self {
        Self {
            tool: tool.to_path_buf(),
            archive: archive.to_path_buf(),
            destination: destination.to_path_buf(),
        }
    }

    /// Run the tool to completion, capturing output.
    ///
    /// # Errors
    ///
    /// [`FxpmError::ExtractionFailed`] when the tool cannot be spawned or
    /// exits non-zero.
    pub async fn run(&self) -> Result<(), FxpmError> {
        let dest_flag = format!("-o{}", self.destination.display());
        debug!(
            "running {} x {} {} -y",
            self.tool.display(),
            self.archive.display(),
            dest_flag
        );

        let output = Command::new(&self.tool)
            .arg("x")
            .arg(&self.archive)
            .arg(&dest_flag)
            .arg("-y")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| FxpmError::ExtractionFailed {
                archive: self.archive.display().to_string(),
                stderr: format!("could not run {}: {e}", self.tool.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FxpmError::ExtractionFailed {
                archive: self.archive.display().to_string(),
                stderr: if stderr.is_empty() {
                    format!("tool exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        Ok(())
    }
}

/// Find the directory inside `root` that contains `executable_name`.
///
/// Depth-first, first match wins.
///
/// # Errors
///
/// [`FxpmError::PayloadNotFound`] when no directory in the tree contains
/// the executable.
pub fn locate_payload(root: &Path, executable_name: &str) -> Result<PathBuf, FxpmError> {
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file() && entry.file_name() == executable_name {
            let payload = entry
                .path()
                .parent()
                .unwrap_or(root)
                .to_path_buf();
            info!("payload found in {}", payload.display());
            return Ok(payload);
        }
    }
    Err(FxpmError::PayloadNotFound {
        executable: executable_name.to_string(),
        root: root.display().to_string(),
    })
}
