//! Persisted settings and per-operation snapshots.
//!
//! Settings live in a TOML file at a platform-resolved location
//! (`~/.config/fxpm/config.toml` on Linux, the equivalent config dir
//! elsewhere), overridable with the `FXPM_CONFIG` environment variable or
//! the global `--config` flag.
//!
//! Background tasks never read mutable global configuration. Each command
//! loads the file once, wraps it in an [`std::sync::Arc`] snapshot, and
//! passes that into every task it spawns — concurrent edits to the file
//! affect the *next* operation, not in-flight ones.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

use crate::core::FxpmError;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "FXPM_CONFIG";

/// Persisted user settings.
///
/// Only two knobs survive from the original product: where channels are
/// installed, and which archive tool unpacks the installers. Everything
/// else is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base directory that channel subdirectories are created under.
    pub base_dir: PathBuf,

    /// Explicit path to the archive tool (7-Zip). When unset or stale, the
    /// tool is discovered on PATH at pipeline start.
    pub extractor_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let base_dir = dirs::data_local_dir()
            .map(|dir| dir.join("fxpm"))
            .unwrap_or_else(|| PathBuf::from("fxpm"));
        Self {
            base_dir,
            extractor_path: None,
        }
    }
}

impl Settings {
    /// Default settings file location, honoring the `FXPM_CONFIG` override.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let expanded = shellexpand::tilde(&path);
            return Ok(PathBuf::from(expanded.as_ref()));
        }
        let config_dir = dirs::config_dir().context("could not determine a configuration directory")?;
        Ok(config_dir.join("fxpm").join("config.toml"))
    }

    /// Load settings from `path`, or from the default location when `None`.
    /// A missing file yields defaults; a malformed file is an error.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("no settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse settings from {}", path.display()))
    }

    /// Save settings to the default location, creating parent directories.
    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?).await
    }

    /// Save settings to a specific file.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        debug!("settings saved to {}", path.display());
        Ok(())
    }

    /// Freeze these settings into the immutable snapshot handed to
    /// background tasks.
    pub fn snapshot(self) -> Arc<Settings> {
        Arc::new(self)
    }

    /// Resolve the archive tool: the configured path when it exists,
    /// otherwise `7z`/`7za` discovered on PATH.
    ///
    /// # Errors
    ///
    /// [`FxpmError::ToolingUnavailable`] when neither yields a usable tool.
    /// The pipeline calls this before any network or disk action.
    pub fn resolve_extractor(&self) -> Result<PathBuf, FxpmError> {
        if let Some(configured) = &self.extractor_path {
            let expanded = shellexpand::tilde(&configured.to_string_lossy().into_owned()).into_owned();
            let candidate = PathBuf::from(expanded);
            if candidate.exists() {
                return Ok(candidate);
            }
            debug!("configured extractor {} does not exist, probing PATH", candidate.display());
        }
        for name in ["7z", "7za"] {
            if let Ok(found) = which::which(name) {
                return Ok(found);
            }
        }
        Err(FxpmError::ToolingUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn roundtrips_through_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let settings = Settings {
            base_dir: tmp.path().join("channels"),
            extractor_path: Some(PathBuf::from("/opt/7zip/7z")),
        };
        settings.save_to(&path).await.unwrap();

        let loaded = Settings::load_from(&path).await.unwrap();
        assert_eq!(loaded.base_dir, settings.base_dir);
        assert_eq!(loaded.extractor_path, settings.extractor_path);
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(Some(tmp.path().join("absent.toml"))).await.unwrap();
        assert!(settings.extractor_path.is_none());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "base_dir = [not toml").await.unwrap();
        assert!(Settings::load(Some(path)).await.is_err());
    }

    #[test]
    fn configured_extractor_wins_when_present() {
        let tmp = TempDir::new().unwrap();
        let tool = tmp.path().join("7z");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        let settings = Settings {
            base_dir: tmp.path().to_path_buf(),
            extractor_path: Some(tool.clone()),
        };
        assert_eq!(settings.resolve_extractor().unwrap(), tool);
    }
}
