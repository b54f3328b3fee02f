//! Host capabilities
//!
//! The publish pipeline never touches files directly. It reads note text and
//! frontmatter through a [`NoteStore`] and structural metadata through a
//! [`MetadataProvider`]; [`FsVault`] implements both over a directory of
//! markdown notes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::constants as C;
use crate::frontmatter::{render_note, split_note, Frontmatter};
use crate::markdown::{Embed, Heading, Link, NoteMetadata};
use crate::note_resolver::{resolve_link_target, resolve_note, ResolvedNote};
use crate::util::{relative_path, secure_path};
use crate::{Error, Result};

/// Note contents and frontmatter, addressed by vault-relative path
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Raw text of a note
    async fn read(&self, path: &str) -> Result<String>;

    /// Parsed frontmatter of a note (empty if it has none)
    async fn frontmatter(&self, path: &str) -> Result<Frontmatter>;

    /// Read-modify-write the frontmatter of a note
    ///
    /// The note body is preserved. No locking: concurrent writers race and
    /// the last one wins.
    async fn process_frontmatter<F>(&self, path: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut Frontmatter) -> Result<()> + Send;
}

/// Structural metadata of notes and link resolution
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Headings, links and embeds of a note, with offsets into its raw text
    async fn metadata_of(&self, path: &str) -> Result<NoteMetadata>;

    async fn headings_of(&self, path: &str) -> Result<Vec<Heading>> {
        Ok(self.metadata_of(path).await?.headings)
    }

    async fn links_of(&self, path: &str) -> Result<Vec<Link>> {
        Ok(self.metadata_of(path).await?.links)
    }

    async fn embeds_of(&self, path: &str) -> Result<Vec<Embed>> {
        Ok(self.metadata_of(path).await?.embeds)
    }

    /// Resolve a wiki-link target as seen from `source_path`
    ///
    /// Returns the vault-relative path of the linked note, or `None`.
    async fn resolve_link(&self, target: &str, source_path: &str) -> Option<String>;
}

/// A directory of markdown notes
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
    notes: Vec<String>,
}

impl FsVault {
    /// Open a vault and index its notes
    ///
    /// Every `*.md` file below `root` is indexed; hidden directories are
    /// skipped.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !tokio::fs::metadata(root).await?.is_dir() {
            return Err(Error::Config(format!(
                "vault root '{}' is not a directory",
                root.display()
            )));
        }
        let root = dunce::canonicalize(root)?;

        let mut notes = Vec::new();
        let mut pending = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with('.') {
                    continue;
                }
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && name.ends_with(C::MARKDOWN_EXTENSION) {
                    if let Some(relative) = relative_path(&root, &path) {
                        notes.push(relative);
                    }
                }
            }
        }
        notes.sort();

        info!("Indexed {} notes in {}", notes.len(), root.display());
        Ok(FsVault { root, notes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Vault-relative paths of all indexed notes, sorted
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Resolve a note reference given by the user
    pub fn resolve(&self, reference: &str) -> ResolvedNote {
        resolve_note(&self.notes, reference)
    }

    fn note_path(&self, path: &str) -> Result<PathBuf> {
        secure_path(&self.root, path)
    }
}

#[async_trait]
impl NoteStore for FsVault {
    async fn read(&self, path: &str) -> Result<String> {
        let file = self.note_path(path)?;
        match tokio::fs::read_to_string(&file).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NoteNotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn frontmatter(&self, path: &str) -> Result<Frontmatter> {
        let content = self.read(path).await?;
        let (frontmatter, _) = split_note(path, &content)?;
        Ok(frontmatter)
    }

    async fn process_frontmatter<F>(&self, path: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut Frontmatter) -> Result<()> + Send,
    {
        let content = self.read(path).await?;
        let (mut frontmatter, body) = split_note(path, &content)?;
        update(&mut frontmatter)?;
        let rendered = render_note(&frontmatter, body)?;

        tokio::fs::write(self.note_path(path)?, rendered).await?;
        debug!("Wrote frontmatter of {}", path);
        Ok(())
    }
}

#[async_trait]
impl MetadataProvider for FsVault {
    async fn metadata_of(&self, path: &str) -> Result<NoteMetadata> {
        let content = self.read(path).await?;
        Ok(NoteMetadata::from_text(&content))
    }

    async fn resolve_link(&self, target: &str, source_path: &str) -> Option<String> {
        resolve_link_target(&self.notes, target, source_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::write(dir.path().join("note.md"), "---\ntitle: x\n---\n# Title\n\n[[Other]]\n").unwrap();
        fs::write(dir.path().join("sub/Other.md"), "---\nurl: https://example.com\n---\nOther").unwrap();
        fs::write(dir.path().join(".obsidian/hidden.md"), "hidden").unwrap();
        fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_open_indexes_markdown_only() {
        let dir = setup();
        let vault = FsVault::open(dir.path()).await.unwrap();
        assert_eq!(vault.notes(), &["note.md".to_string(), "sub/Other.md".to_string()]);
    }

    #[tokio::test]
    async fn test_metadata_offsets_address_raw_text() {
        let dir = setup();
        let vault = FsVault::open(dir.path()).await.unwrap();
        let content = vault.read("note.md").await.unwrap();
        let links = vault.links_of("note.md").await.unwrap();
        assert_eq!(links.len(), 1);
        let position = links[0].position;
        assert_eq!(&content[position.start..position.end], "[[Other]]");
    }

    #[tokio::test]
    async fn test_resolve_link() {
        let dir = setup();
        let vault = FsVault::open(dir.path()).await.unwrap();
        let resolved = vault.resolve_link("Other", "note.md").await;
        assert_eq!(resolved.as_deref(), Some("sub/Other.md"));
        let front = vault.frontmatter("sub/Other.md").await.unwrap();
        assert_eq!(front.url(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_process_frontmatter_keeps_body() {
        let dir = setup();
        let vault = FsVault::open(dir.path()).await.unwrap();
        vault
            .process_frontmatter("note.md", |front| {
                front.insert("dev-article-id", 9);
                Ok(())
            })
            .await
            .unwrap();

        let content = fs::read_to_string(dir.path().join("note.md")).unwrap();
        assert_eq!(content, "---\ntitle: x\ndev-article-id: 9\n---\n# Title\n\n[[Other]]\n");
    }

    #[tokio::test]
    async fn test_process_frontmatter_adds_block() {
        let dir = setup();
        fs::write(dir.path().join("plain.md"), "# Plain\n").unwrap();
        let vault = FsVault::open(dir.path()).await.unwrap();
        vault
            .process_frontmatter("plain.md", |front| {
                front.insert("dev-published", false);
                Ok(())
            })
            .await
            .unwrap();

        let content = fs::read_to_string(dir.path().join("plain.md")).unwrap();
        assert_eq!(content, "---\ndev-published: false\n---\n# Plain\n");
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let dir = setup();
        let vault = FsVault::open(dir.path()).await.unwrap();
        let before = fs::read_to_string(dir.path().join("note.md")).unwrap();
        let result = vault
            .process_frontmatter("note.md", |_| Err(Error::Config("nope".to_string())))
            .await;
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(dir.path().join("note.md")).unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_note_and_escape() {
        let dir = setup();
        let vault = FsVault::open(dir.path()).await.unwrap();
        assert!(matches!(vault.read("missing.md").await, Err(Error::NoteNotFound(_))));
        assert!(matches!(vault.read("../outside.md").await, Err(Error::PathEscapesVault(_))));
    }
}
