//! Vault and note resolution for commands

use std::path::Path;

use anyhow::{Context, Result};
use devpub::config::vault_root;
use devpub::util::{display_path, relative_path};
use devpub::{Error, FsVault, ResolvedNote};

/// Open the vault given by `--vault`, `DEVPUB_VAULT`, or the current directory
pub async fn open_vault(flag: Option<&Path>) -> Result<FsVault> {
    let root = vault_root(flag)?;
    FsVault::open(&root)
        .await
        .with_context(|| format!("Cannot open vault at {}", display_path(&root)))
}

/// Resolve a note reference to a vault-relative path
///
/// A reference naming an existing file inside the vault is taken as-is;
/// anything else goes through note name resolution.
pub fn resolve_note(vault: &FsVault, reference: &str) -> Result<String> {
    if let Ok(file) = dunce::canonicalize(reference) {
        if file.is_file() {
            if let Some(relative) = relative_path(vault.root(), &file) {
                return Ok(relative);
            }
        }
    }

    match vault.resolve(reference) {
        ResolvedNote::Found(path) => Ok(path),
        ResolvedNote::Ambiguous(candidates) => {
            eprintln!("Error: Ambiguous note reference '{}'", reference);
            eprintln!("Found {} matching notes:", candidates.len());
            for (i, path) in candidates.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, path);
            }
            Err(Error::AmbiguousNote {
                reference: reference.to_string(),
                candidates,
            }
            .into())
        }
        ResolvedNote::NotFound => Err(Error::NoteNotFound(reference.to_string()).into()),
    }
}
