//! Utility functions for secure path handling

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolve a vault-relative note path, ensuring it stays within the vault
///
/// Accepts forward or back slashes. Absolute paths and `..` components that
/// climb above `base` are rejected with [`Error::PathEscapesVault`].
pub fn secure_path(base: &Path, relative: &str) -> Result<PathBuf> {
    let escapes = || Error::PathEscapesVault(relative.to_string());

    if relative.starts_with('/') || relative.starts_with('\\') || has_drive_prefix(relative) {
        return Err(escapes());
    }

    let mut result = base.to_path_buf();
    for component in relative.split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => {
                if result == base {
                    return Err(escapes());
                }
                result.pop();
            }
            _ => result.push(component),
        }
    }

    // Symlinks can still point outside; compare canonical forms when possible
    if result.exists() {
        let canonical_base = dunce::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        let canonical_result = dunce::canonicalize(&result).unwrap_or_else(|_| result.clone());
        if !canonical_result.starts_with(&canonical_base) {
            return Err(escapes());
        }
    }

    Ok(result)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Vault-relative form of `path`, with forward slashes
///
/// Returns `None` if `path` is not under `base`.
pub fn relative_path(base: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(display_path)
}

/// Display a path with forward slashes (cross-platform standard)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
