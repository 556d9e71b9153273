//! File system helpers used by the install pipeline and the CLI.
//!
//! These return the crate's typed [`FxpmError::FilesystemError`] so that a
//! failed copy or remove inside the pipeline is reported with the operation
//! and path that actually failed.

use std::fs;
use std::path::Path;

use crate::core::FxpmError;

/// Ensure a directory exists, creating it and all parents if necessary.
///
/// Returns an error if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<(), FxpmError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| FxpmError::filesystem("create directory", path, &e))?;
    } else if !path.is_dir() {
        return Err(FxpmError::FilesystemError {
            operation: "create directory".to_string(),
            path: path.display().to_string(),
            reason: "path exists but is not a directory".to_string(),
        });
    }
    Ok(())
}

/// Recursively copy a directory tree, overwriting files at the destination.
///
/// Creates the destination if it does not exist. Symlinks and other special
/// file types are skipped, matching how archive payloads are laid out.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), FxpmError> {
    ensure_dir(dst)?;

    let entries = fs::read_dir(src).map_err(|e| FxpmError::filesystem("read directory", src, &e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FxpmError::filesystem("read directory", src, &e))?;
        let file_type =
            entry.file_type().map_err(|e| FxpmError::filesystem("stat", &entry.path(), &e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path)
                .map_err(|e| FxpmError::filesystem("copy", &src_path, &e))?;
        }
        // Skip symlinks and other file types
    }

    Ok(())
}

/// Recursively remove a directory tree. Missing directories are not an error,
/// so this is safe for cleanup paths that may or may not exist.
pub fn remove_dir_all(path: &Path) -> Result<(), FxpmError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| FxpmError::filesystem("remove directory", path, &e))?;
    }
    Ok(())
}
