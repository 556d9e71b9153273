//! Backup and restore of a channel's core directory during installs.
//!
//! The backup is the pipeline's only rollback mechanism: before anything
//! touches the core directory it is *renamed* to a `_bak` sibling (a rename
//! rather than a copy, so a running application holding file locks fails
//! the whole install up front instead of corrupting it midway). On success
//! the backup is discarded; on any later failure it is renamed back over
//! the partial core. Only if that restore itself fails is the backup left
//! on disk for manual recovery.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::FxpmError;

/// A core directory moved aside for the duration of an install.
///
/// `take` produces `None` when there was nothing to back up (first
/// install); the pipeline then has no rollback obligation for the replace
/// stage beyond reporting the failure.
#[derive(Debug)]
pub struct CoreBackup {
    /// Where the core directory normally lives
    core_dir: PathBuf,
    /// Where it was renamed to
    backup_dir: PathBuf,
}

impl CoreBackup {
    /// Rename `core_dir` to `backup_dir`, replacing any stale backup from a
    /// previous failed run.
    ///
    /// # Errors
    ///
    /// [`FxpmError::BackupFailed`] when the rename fails — typically the
    /// application is running and holds a lock. Nothing has been modified
    /// in that case; the existing installation stays usable.
    pub async fn take(core_dir: &Path, backup_dir: &Path) -> Result<Option<Self>, FxpmError> {
        if !core_dir.exists() {
            debug!("no existing core at {}, nothing to back up", core_dir.display());
            return Ok(None);
        }

        if backup_dir.exists() {
            debug!("removing stale backup at {}", backup_dir.display());
            fs::remove_dir_all(backup_dir).await.map_err(|e| FxpmError::BackupFailed {
                path: backup_dir.display().to_string(),
                reason: format!("could not remove stale backup: {e}"),
            })?;
        }

        info!("moving {} aside to {}", core_dir.display(), backup_dir.display());
        fs::rename(core_dir, backup_dir).await.map_err(|e| FxpmError::BackupFailed {
            path: core_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Some(Self {
            core_dir: core_dir.to_path_buf(),
            backup_dir: backup_dir.to_path_buf(),
        }))
    }

    /// Rename the backup back over the core location, removing whatever
    /// partial state the failed install left there.
    ///
    /// # Errors
    ///
    /// [`FxpmError::FilesystemError`] if the partial core cannot be removed
    /// or the rename fails. The backup directory is left in place in that
    /// case so the previous installation remains recoverable by hand.
    pub async fn restore(self) -> Result<(), FxpmError> {
        warn!("restoring previous installation from {}", self.backup_dir.display());

        if self.core_dir.exists() {
            fs::remove_dir_all(&self.core_dir)
                .await
                .map_err(|e| FxpmError::filesystem("remove partial core", &self.core_dir, &e))?;
        }

        fs::rename(&self.backup_dir, &self.core_dir)
            .await
            .map_err(|e| FxpmError::filesystem("restore backup", &self.backup_dir, &e))?;

        info!("previous installation restored at {}", self.core_dir.display());
        Ok(())
    }

    /// Delete the backup after a successful install.
    pub async fn discard(self) -> Result<(), FxpmError> {
        debug!("discarding backup at {}", self.backup_dir.display());
        if self.backup_dir.exists() {
            fs::remove_dir_all(&self.backup_dir)
                .await
                .map_err(|e| FxpmError::filesystem("remove backup", &self.backup_dir, &e))?;
        }
        Ok(())
    }

    /// Location of the backup directory, for logging and error reports.
    pub fn backup_path(&self) -> &Path {
        &self.backup_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn populate(dir: &Path) {
        stdfs::create_dir_all(dir).unwrap();
        stdfs::write(dir.join("firefox"), "old-binary").unwrap();
    }

    #[tokio::test]
    async fn take_moves_core_aside() {
        let tmp = TempDir::new().unwrap();
        let core = tmp.path().join("core");
        let bak = tmp.path().join("core_bak");
        populate(&core);

        let backup = CoreBackup::take(&core, &bak).await.unwrap().unwrap();
        assert!(!core.exists());
        assert!(bak.join("firefox").exists());
        assert_eq!(backup.backup_path(), bak);
    }

    #[tokio::test]
    async fn take_is_none_without_existing_core() {
        let tmp = TempDir::new().unwrap();
        let result =
            CoreBackup::take(&tmp.path().join("core"), &tmp.path().join("core_bak")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn restore_replaces_partial_core() {
        let tmp = TempDir::new().unwrap();
        let core = tmp.path().join("core");
        let bak = tmp.path().join("core_bak");
        populate(&core);

        let backup = CoreBackup::take(&core, &bak).await.unwrap().unwrap();

        // Simulate a half-finished replace
        stdfs::create_dir_all(&core).unwrap();
        stdfs::write(core.join("partial"), "junk").unwrap();

        backup.restore().await.unwrap();
        assert!(core.join("firefox").exists());
        assert!(!core.join("partial").exists());
        assert!(!bak.exists());
    }

    #[tokio::test]
    async fn discard_removes_backup() {
        let tmp = TempDir::new().unwrap();
        let core = tmp.path().join("core");
        let bak = tmp.path().join("core_bak");
        populate(&core);

        let backup = CoreBackup::take(&core, &bak).await.unwrap().unwrap();
        backup.discard().await.unwrap();
        assert!(!bak.exists());
    }

    #[tokio::test]
    async fn stale_backup_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let core = tmp.path().join("core");
        let bak = tmp.path().join("core_bak");
        populate(&core);
        stdfs::create_dir_all(&bak).unwrap();
        stdfs::write(bak.join("stale"), "previous failed run").unwrap();

        let backup = CoreBackup::take(&core, &bak).await.unwrap().unwrap();
        assert!(bak.join("firefox").exists());
        assert!(!bak.join("stale").exists());
        backup.discard().await.unwrap();
    }
}
