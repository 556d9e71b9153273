//! Shared helpers for CLI integration tests.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// A sandbox with its own settings file and base directory, keeping every
/// test isolated from the user's real configuration.
pub struct Sandbox {
    #[allow(dead_code)]
    tmp: TempDir,
    pub config_path: PathBuf,
    pub base_dir: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let base_dir = tmp.path().join("channels");
        std::fs::create_dir_all(&base_dir).unwrap();

        let config_path = tmp.path().join("config.toml");
        // Literal TOML strings keep platform path separators intact
        std::fs::write(&config_path, format!("base_dir = '{}'\n", base_dir.display())).unwrap();

        Self {
            tmp,
            config_path,
            base_dir,
        }
    }

    /// A `fxpm` invocation scoped to this sandbox's settings file.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fxpm").unwrap();
        cmd.arg("--config").arg(&self.config_path);
        cmd
    }

    /// Lay down a fake installed channel with the given version token.
    pub fn install_channel(&self, channel: &str, version: &str) -> PathBuf {
        let core = self.base_dir.join(channel).join("core");
        std::fs::create_dir_all(&core).unwrap();
        let exe = core.join(executable_name());
        std::fs::write(&exe, "fake browser binary").unwrap();
        std::fs::write(core.join("application.ini"), format!("[App]\nVersion={version}\n"))
            .unwrap();
        exe
    }
}

pub fn executable_name() -> &'static str {
    if cfg!(windows) { "firefox.exe" } else { "firefox" }
}
