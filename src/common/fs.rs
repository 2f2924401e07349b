use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Error unless `path` exists and is a regular file.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Create the parent directory of `path` if it doesn’t exist.
pub(crate) fn ensure_parent_dir_exists(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            if parent.exists() && !parent.is_dir() {
                anyhow::bail!("Path exists but is not a directory: {}", parent.display());
            }
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))
        }
        _ => Ok(()),
    }
}

/// Error if `path` already exists and `force` is not set.
///
/// Nothing is created on disk; call `ensure_parent_dir_exists` right before writing.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Output file already exists (use --force to overwrite): {}", path.display());
    }
    if path.is_dir() {
        anyhow::bail!("Output path is a directory: {}", path.display());
    }
    Ok(())
}
