//! Local installed-version resolution.
//!
//! Resolution is an ordered strategy over [`LocalVersionSource`]
//! implementations, each of which either yields a version string or passes.
//! The first success wins; when every source passes the caller gets the
//! `"unknown"` sentinel. This makes the two-stage fallback of the original
//! design explicit instead of hiding it behind swallowed exceptions.
//!
//! Order matters: the `application.ini` sidecar is authoritative for this
//! product family because the binary's embedded metadata is frequently
//! stripped or unreliable after extraction. The embedded file-version
//! resource is only consulted when the sidecar is missing or unreadable.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::constants::{APPLICATION_INI, UNKNOWN_VERSION};

/// `Version=<digits>(.<digits>)*[<lowercase-alnum suffix>]` inside the sidecar.
static INI_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version=([0-9][0-9.]*[a-z0-9]*)").expect("static regex"));

/// One way of determining an installed executable's version.
///
/// Implementations must not fail: anything unexpected (missing file, bad
/// encoding, truncated binary) is a pass, expressed as `None`.
trait LocalVersionSource {
    /// Short name used in debug logs.
    fn name(&self) -> &'static str;

    /// Try to resolve a version for `executable`, passing on any failure.
    fn resolve(&self, executable: &Path) -> Option<String>;
}

/// Reads the `application.ini` sidecar next to the executable.
struct ApplicationIniSource;

impl LocalVersionSource for ApplicationIniSource {
    fn name(&self) -> &'static str {
        "application.ini"
    }

    fn resolve(&self, executable: &Path) -> Option<String> {
        let ini_path = executable.parent()?.join(APPLICATION_INI);
        // Read as UTF-8 with invalid bytes tolerated
        let bytes = std::fs::read(&ini_path).ok()?;
        let content = String::from_utf8_lossy(&bytes);
        let captures = INI_VERSION_RE.captures(&content)?;
        Some(captures.get(1)?.as_str().to_string())
    }
}

/// Reads the embedded file-version resource out of the binary itself.
///
/// Scans for the `VS_FIXEDFILEINFO` signature and composes a four-component
/// dotted string from the two 32-bit version words. Binaries without such a
/// resource (or on formats that never carry one) simply pass.
struct FileInfoSource;

/// `dwSignature` of `VS_FIXEDFILEINFO`.
const FIXEDFILEINFO_SIGNATURE: u32 = 0xFEEF_04BD;

impl LocalVersionSource for FileInfoSource {
    fn name(&self) -> &'static str {
        "file-version resource"
    }

    fn resolve(&self, executable: &Path) -> Option<String> {
        let bytes = std::fs::read(executable).ok()?;
        let signature = FIXEDFILEINFO_SIGNATURE.to_le_bytes();

        let mut offset = 0;
        while let Some(pos) = find_bytes(&bytes[offset..], &signature) {
            let start = offset + pos;
            if start + 16 > bytes.len() {
                return None;
            }
            let struc_version = read_u32_le(&bytes, start + 4);
            // Fixed-info blocks carry structure version 1.x
            if struc_version >> 16 == 1 {
                let ms = read_u32_le(&bytes, start + 8);
                let ls = read_u32_le(&bytes, start + 12);
                return Some(format!(
                    "{}.{}.{}.{}",
                    ms >> 16,
                    ms & 0xFFFF,
                    ls >> 16,
                    ls & 0xFFFF
                ));
            }
            offset = start + 4;
        }
        None
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

/// Resolve the installed version for `executable`.
///
/// Never fails: returns the `"unknown"` sentinel when no source can produce
/// a version (including when the executable itself is missing).
pub fn resolve_local_version(executable: &Path) -> String {
    let sources: [&dyn LocalVersionSource; 2] = [&ApplicationIniSource, &FileInfoSource];

    for source in sources {
        if let Some(version) = source.resolve(executable) {
            debug!("resolved {} via {}: {}", executable.display(), source.name(), version);
            return version;
        }
        trace!("{} yielded nothing for {}", source.name(), executable.display());
    }

    debug!("no version source succeeded for {}", executable.display());
    UNKNOWN_VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_exe(dir: &Path) -> std::path::PathBuf {
        let exe = dir.join("firefox");
        fs::write(&exe, b"\x7fELF not a real browser").unwrap();
        exe
    }

    #[test]
    fn sidecar_wins_when_present() {
        let tmp = TempDir::new().unwrap();
        let exe = fake_exe(tmp.path());
        fs::write(
            tmp.path().join("application.ini"),
            "[App]\nVendor=Mozilla\nName=Firefox\nVersion=131.0.1\nBuildID=20241001\n",
        )
        .unwrap();

        assert_eq!(resolve_local_version(&exe), "131.0.1");
    }

    #[test]
    fn sidecar_accepts_prerelease_suffix() {
        let tmp = TempDir::new().unwrap();
        let exe = fake_exe(tmp.path());
        fs::write(tmp.path().join("application.ini"), "[App]\nVersion=133.0a1\n").unwrap();

        assert_eq!(resolve_local_version(&exe), "133.0a1");
    }

    #[test]
    fn sidecar_tolerates_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let exe = fake_exe(tmp.path());
        let mut content = b"[App]\xff\xfe\nVersion=128.0\n".to_vec();
        content.extend_from_slice(&[0xC0, 0x80]);
        fs::write(tmp.path().join("application.ini"), content).unwrap();

        assert_eq!(resolve_local_version(&exe), "128.0");
    }

    #[test]
    fn file_info_fallback_reads_version_words() {
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("firefox");
        // Synthetic binary: padding, then a VS_FIXEDFILEINFO prefix with
        // version 131.0.1.9136 encoded in the MS/LS words.
        let mut bytes = vec![0u8; 64];
        bytes.extend_from_slice(&FIXEDFILEINFO_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&0x0001_0000u32.to_le_bytes()); // dwStrucVersion
        bytes.extend_from_slice(&((131u32 << 16) | 0).to_le_bytes()); // dwFileVersionMS
        bytes.extend_from_slice(&((1u32 << 16) | 9136).to_le_bytes()); // dwFileVersionLS
        fs::write(&exe, &bytes).unwrap();

        assert_eq!(resolve_local_version(&exe), "131.0.1.9136");
    }

    #[test]
    fn unreadable_install_degrades_to_sentinel() {
        let tmp = TempDir::new().unwrap();
        let exe = fake_exe(tmp.path());
        assert_eq!(resolve_local_version(&exe), UNKNOWN_VERSION);
    }

    #[test]
    fn missing_executable_degrades_to_sentinel() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_local_version(&tmp.path().join("nope")), UNKNOWN_VERSION);
    }

    #[test]
    fn garbage_sidecar_falls_through() {
        let tmp = TempDir::new().unwrap();
        let exe = fake_exe(tmp.path());
        fs::write(tmp.path().join("application.ini"), "[App]\nNoVersionHere=true\n").unwrap();
        assert_eq!(resolve_local_version(&exe), UNKNOWN_VERSION);
    }
}
