//! In-memory host and recording gateway shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use devpub::frontmatter::{render_note, split_note};
use devpub::note_resolver::resolve_link_target;
use devpub::{
    Article, ArticleGateway, ArticleStatus, CreatedArticle, Error, Frontmatter, MetadataProvider,
    NoteMetadata, NoteStore, Result,
};

/// Notes kept as raw text, keyed by vault-relative path
#[derive(Default)]
pub struct MemoryVault {
    notes: Mutex<BTreeMap<String, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.notes
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    pub fn content(&self, path: &str) -> String {
        self.notes.lock().unwrap().get(path).cloned().unwrap_or_default()
    }

    fn paths(&self) -> Vec<String> {
        self.notes.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl NoteStore for MemoryVault {
    async fn read(&self, path: &str) -> Result<String> {
        self.notes
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NoteNotFound(path.to_string()))
    }

    async fn frontmatter(&self, path: &str) -> Result<Frontmatter> {
        let content = self.read(path).await?;
        Ok(split_note(path, &content)?.0)
    }

    async fn process_frontmatter<F>(&self, path: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut Frontmatter) -> Result<()> + Send,
    {
        let content = self.read(path).await?;
        let (mut frontmatter, body) = split_note(path, &content)?;
        update(&mut frontmatter)?;
        let rendered = render_note(&frontmatter, body)?;
        self.insert(path, &rendered);
        Ok(())
    }
}

#[async_trait]
impl MetadataProvider for MemoryVault {
    async fn metadata_of(&self, path: &str) -> Result<NoteMetadata> {
        Ok(NoteMetadata::from_text(&self.read(path).await?))
    }

    async fn resolve_link(&self, target: &str, source_path: &str) -> Option<String> {
        resolve_link_target(&self.paths(), target, source_path)
    }
}

/// How the recording gateway answers status requests
#[derive(Clone)]
pub enum StatusReply {
    Unpublished,
    Published,
    Fail,
}

/// Gateway double that records every call
pub struct RecordingGateway {
    pub created: Mutex<Vec<Article>>,
    pub updated: Mutex<Vec<(u64, Article)>>,
    pub status_requests: Mutex<Vec<u64>>,
    pub fail_create: bool,
    pub status_reply: StatusReply,
    pub delay: Option<Duration>,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        RecordingGateway {
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            status_requests: Mutex::new(Vec::new()),
            fail_create: false,
            status_reply: StatusReply::Published,
            delay: None,
        }
    }
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn updated_count(&self) -> usize {
        self.updated.lock().unwrap().len()
    }
}

pub const CREATED_ID: u64 = 1234;
pub const CREATED_URL: &str = "https://dev.to/author/hello-world";
pub const CANONICAL_URL: &str = "https://example.com/articles/hello-world";
pub const PUBLISHED_URL: &str = "https://dev.to/author/hello-world-published";

#[async_trait]
impl ArticleGateway for RecordingGateway {
    async fn create_article(&self, article: &Article) -> Result<CreatedArticle> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_create {
            return Err(Error::UnexpectedStatus {
                status: 401,
                url: "https://dev.to/api/articles".to_string(),
            });
        }
        self.created.lock().unwrap().push(article.clone());
        Ok(CreatedArticle {
            id: CREATED_ID,
            url: CREATED_URL.to_string(),
            canonical_url: CANONICAL_URL.to_string(),
        })
    }

    async fn update_article(&self, id: u64, article: &Article) -> Result<()> {
        self.updated.lock().unwrap().push((id, article.clone()));
        Ok(())
    }

    async fn article_status(&self, id: u64) -> Result<ArticleStatus> {
        self.status_requests.lock().unwrap().push(id);
        match self.status_reply {
            StatusReply::Unpublished => Ok(ArticleStatus::Unpublished),
            StatusReply::Published => Ok(ArticleStatus::Published {
                url: PUBLISHED_URL.to_string(),
                canonical_url: CANONICAL_URL.to_string(),
                published_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            }),
            StatusReply::Fail => Err(Error::UnexpectedStatus {
                status: 500,
                url: format!("https://dev.to/api/articles/{id}"),
            }),
        }
    }
}
