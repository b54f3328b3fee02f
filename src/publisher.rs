//! Publish orchestration
//!
//! A note is *unpublished* until its frontmatter carries a numeric
//! `dev-article-id`. Publishing an unpublished note creates the remote
//! article and records its identity; publishing it again refreshes the
//! remote status and then updates the article with freshly transformed
//! content. Frontmatter is only written after the remote call it records
//! has succeeded.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::gateway::{ArticleGateway, ArticleStatus};
use crate::transform::Transformer;
use crate::vault::{MetadataProvider, NoteStore};
use crate::{Error, Result};

/// What a publish did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new remote article was created
    Created { id: u64, url: String, title: String },
    /// An existing remote article was updated
    Updated {
        id: u64,
        status: ArticleStatus,
        title: String,
    },
}

impl PublishOutcome {
    pub fn id(&self) -> u64 {
        match self {
            PublishOutcome::Created { id, .. } | PublishOutcome::Updated { id, .. } => *id,
        }
    }
}

/// Publishes notes of one vault through one gateway
pub struct Publisher<V, G> {
    vault: V,
    gateway: G,
    in_flight: Mutex<HashSet<String>>,
}

impl<V, G> Publisher<V, G>
where
    V: NoteStore + MetadataProvider,
    G: ArticleGateway,
{
    pub fn new(vault: V, gateway: G) -> Self {
        Publisher {
            vault,
            gateway,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Create or update the remote article for a note
    ///
    /// Fails with [`Error::PublishInProgress`] if the same note is already
    /// being published through this publisher.
    pub async fn publish(&self, path: &str) -> Result<PublishOutcome> {
        let _guard = InFlight::acquire(&self.in_flight, path)?;

        let frontmatter = self.vault.frontmatter(path).await?;
        match frontmatter.article_id() {
            None => self.create(path).await,
            Some(id) => self.update(path, id).await,
        }
    }

    /// Refresh `dev-published` (and URLs, when published) of a published note
    ///
    /// Returns `None` for notes that were never published.
    pub async fn refresh_status(&self, path: &str) -> Result<Option<ArticleStatus>> {
        let Some(id) = self.vault.frontmatter(path).await?.article_id() else {
            return Ok(None);
        };
        self.record_status(path, id).await.map(Some)
    }

    async fn create(&self, path: &str) -> Result<PublishOutcome> {
        let article = Transformer::new(&self.vault).article_data(path).await?;
        let created = self.gateway.create_article(&article).await?;

        let record = created.clone();
        self.vault
            .process_frontmatter(path, move |frontmatter| {
                frontmatter.set_created(&record);
                Ok(())
            })
            .await?;
        info!("Published {} as article {}", path, created.id);

        Ok(PublishOutcome::Created {
            id: created.id,
            url: created.url,
            title: article.title,
        })
    }

    async fn update(&self, path: &str, id: u64) -> Result<PublishOutcome> {
        let status = self.record_status(path, id).await?;

        let article = Transformer::new(&self.vault).article_data(path).await?;
        self.gateway.update_article(id, &article).await?;
        info!("Updated article {} from {}", id, path);

        Ok(PublishOutcome::Updated {
            id,
            status,
            title: article.title,
        })
    }

    async fn record_status(&self, path: &str, id: u64) -> Result<ArticleStatus> {
        let status = self.gateway.article_status(id).await?;
        let record = status.clone();
        self.vault
            .process_frontmatter(path, move |frontmatter| {
                frontmatter.set_status(&record);
                Ok(())
            })
            .await?;
        Ok(status)
    }
}

/// Marks a note as being published until dropped
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    path: String,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, path: &str) -> Result<Self> {
        let mut notes = set.lock().unwrap_or_else(PoisonError::into_inner);
        if !notes.insert(path.to_string()) {
            return Err(Error::PublishInProgress(path.to_string()));
        }
        Ok(InFlight {
            set,
            path: path.to_string(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut notes = self.set.lock().unwrap_or_else(PoisonError::into_inner);
        notes.remove(&self.path);
    }
}
