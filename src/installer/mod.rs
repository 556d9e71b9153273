//! The download → backup → extract → replace install pipeline.
//!
//! [`InstallPipeline::execute`] performs a full reinstall of one channel's
//! core directory. Stages, in order, each a distinct fault point with a
//! typed error:
//!
//! 1. **Precondition** — resolve the external archive tool
//!    ([`FxpmError::ToolingUnavailable`]); no network or disk action before
//!    this passes.
//! 2. **Download** — stream the channel artifact into the scratch
//!    directory ([`FxpmError::DownloadFailed`]); a partial file is left for
//!    diagnostics.
//! 3. **Backup** — rename any existing core directory to a `_bak` sibling
//!    ([`FxpmError::BackupFailed`]); the running-application lock case
//!    fails here, leaving the installation untouched.
//! 4. **Extract** — external tool into a fresh scratch subdirectory
//!    ([`FxpmError::ExtractionFailed`]).
//! 5. **Locate** — depth-first search for the executable
//!    ([`FxpmError::PayloadNotFound`]).
//! 6. **Replace** — recursive overwrite copy into the fresh core
//!    ([`FxpmError::FilesystemError`]).
//! 7. **Cleanup** — scratch and backup are removed only on success.
//! 8. **Post-install** — profile directory and launcher.
//!
//! Any failure after the backup was taken restores it: the partial core is
//! removed and the backup renamed back, so a failed update leaves the
//! channel exactly as it was. Only when that restore itself fails does the
//! backup stay on disk, with its path in the error log.
//!
//! Re-running the pipeline after a success is a repair: a fresh
//! backup/replace cycle with identical semantics.

pub mod backup;
pub mod extract;


use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

use crate::channel::{Channel, ChannelPaths};
use crate::config::Settings;
use crate::constants::EXECUTABLE_NAME;
use crate::core::FxpmError;
use crate::launcher;
use crate::scheduler::ReconcileEvent;
use crate::utils::fs as fs_util;

pub use backup::CoreBackup;
pub use extract::{ExtractorCommand, locate_payload};

/// One install attempt for one channel.
///
/// Owns every temporary path it creates. At most one pipeline may run per
/// channel at a time; the scheduler enforces that with its busy set before
/// spawning the task that calls [`execute`](Self::execute).
pub struct InstallPipeline {
    channel: Channel,
    paths: ChannelPaths,
    settings: Arc<Settings>,
    events: Option<UnboundedSender<ReconcileEvent>>,
}

impl InstallPipeline {
    /// Build a pipeline for `channel` under the snapshot's base directory.
    pub fn new(channel: Channel, settings: Arc<Settings>) -> Self {
        let paths = ChannelPaths::new(&settings.base_dir, channel.name);
        Self {
            channel,
            paths,
            settings,
            events: None,
        }
    }

    /// Attach the coordinator's event channel for progress lines.
    #[must_use]
    pub fn with_events(mut self, events: UnboundedSender<ReconcileEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Log a progress line and forward it to the coordinator, if attached.
    fn report(&self, message: impl Into<String>) {
        let message = message.into();
        info!("[{}] {}", self.channel.name, message);
        if let Some(events) = &self.events {
            let _ = events.send(ReconcileEvent::Progress {
                channel: self.channel.name,
                message,
            });
        }
    }

    /// Run the full pipeline to completion.
    pub async fn execute(&self) -> Result<(), FxpmError> {
        self.report("Starting installation");

        // Stage 1: fail fast before any network or disk action
        let tool = self.settings.resolve_extractor()?;

        // Stage 2
        let artifact = self.download().await?;

        // Stage 3
        let backup =
            CoreBackup::take(&self.paths.core_dir, &self.paths.backup_dir()).await?;

        // Stages 4-6, with rollback of the backup on failure
        match self.install_payload(&tool, &artifact).await {
            Ok(()) => {
                // Stage 7: scratch and backup go away only on success; a
                // leftover backup is noise, not a failed install
                self.cleanup_scratch().await;
                if let Some(backup) = backup {
                    if let Err(err) = backup.discard().await {
                        warn!("could not remove backup: {err}");
                    }
                }
                // Stage 8
                self.post_install().await?;
                self.report("Installation complete");
                Ok(())
            }
            Err(err) => {
                if let Some(backup) = backup {
                    let backup_path = backup.backup_path().to_path_buf();
                    match backup.restore().await {
                        Ok(()) => self.report("Previous installation restored"),
                        Err(restore_err) => error!(
                            "restore after failed install also failed: {restore_err}; \
                             previous installation remains at {}",
                            backup_path.display()
                        ),
                    }
                }
                Err(err)
            }
        }
    }

    /// Stream the channel artifact into the scratch directory.
    async fn download(&self) -> Result<PathBuf, FxpmError> {
        fs_util::ensure_dir(&self.paths.scratch_dir)?;
        let artifact = self.paths.artifact_path();
        self.report(format!("Downloading {}", self.channel.url));

        let map_err = |e: &dyn std::fmt::Display| FxpmError::DownloadFailed {
            url: self.channel.url.clone(),
            reason: e.to_string(),
        };

        let response = reqwest::get(self.channel.url.as_str()).await.map_err(|e| map_err(&e))?;
        let response = response.error_for_status().map_err(|e| map_err(&e))?;

        let bar = match response.content_length() {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:30.cyan/blue} {bytes}/{total_bytes} ({eta})",
                    )
                    .expect("static template"),
                );
                bar
            }
            None => ProgressBar::new_spinner(),
        };

        let mut file = tokio::fs::File::create(&artifact)
            .await
            .map_err(|e| FxpmError::filesystem("create download file", &artifact, &e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| map_err(&e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FxpmError::filesystem("write download", &artifact, &e))?;
            bar.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(|e| FxpmError::filesystem("flush download", &artifact, &e))?;
        bar.finish_and_clear();

        self.report("Download complete");
        Ok(artifact)
    }

    /// Stages 4-6: extract, locate, replace.
    async fn install_payload(&self, tool: &Path, artifact: &Path) -> Result<(), FxpmError> {
        // Fresh core to copy into; the previous one is already renamed aside
        fs_util::ensure_dir(&self.paths.core_dir)?;

        let extract_dir = self.paths.extract_dir();
        // Clear a stale tree left by a previous failed run
        fs_util::remove_dir_all(&extract_dir)?;

        self.report("Extracting archive");
        ExtractorCommand::new(tool, artifact, &extract_dir).run().await?;

        let payload = locate_payload(&extract_dir, EXECUTABLE_NAME)?;

        self.report("Installing files");
        fs_util::copy_dir(&payload, &self.paths.core_dir)?;
        Ok(())
    }

    /// Remove the scratch root. Failures are logged, never fatal — the next
    /// run clears stale state before reusing it.
    async fn cleanup_scratch(&self) {
        if let Err(err) = fs_util::remove_dir_all(&self.paths.scratch_dir) {
            warn!("could not clean scratch directory: {err}");
        }
    }

    /// Ensure the profile directory exists and create the launcher.
    async fn post_install(&self) -> Result<(), FxpmError> {
        fs_util::ensure_dir(&self.paths.profile_dir)?;
        // Launcher creation is a collaborator; its failures are warnings
        if let Err(err) = launcher::create_launcher(&self.settings.base_dir, &self.paths, self.channel.name) {
            warn!("launcher creation failed: {err}");
        }
        Ok(())
    }

    /// The derived layout this pipeline operates on.
    pub fn paths(&self) -> &ChannelPaths {
        &self.paths
    }
}
