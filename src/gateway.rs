//! Remote article gateway
//!
//! Maps a transformed [`Article`] onto the DEV (Forem) articles API and
//! validates what comes back. Transport problems surface as
//! [`Error::Network`] or [`Error::UnexpectedStatus`]; payloads missing
//! required fields surface as [`Error::BadResponse`] (create) or
//! [`Error::UnexpectedResponse`] (status).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants as C;
use crate::{Error, Result};

/// Article payload sent to the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    /// Markdown body
    #[serde(rename = "body_markdown")]
    pub markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

#[derive(Serialize)]
struct ArticleEnvelope<'a> {
    article: &'a Article,
}

/// Identity of a freshly created remote article
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedArticle {
    pub id: u64,
    pub url: String,
    pub canonical_url: String,
}

/// Publication state of a remote article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleStatus {
    /// Draft, or not visible to the public API
    Unpublished,
    Published {
        url: String,
        canonical_url: String,
        published_at: DateTime<Utc>,
    },
}

impl ArticleStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, ArticleStatus::Published { .. })
    }
}

#[derive(Deserialize)]
struct StatusBody {
    url: String,
    canonical_url: String,
    published_at: Option<DateTime<Utc>>,
}

/// Remote operations on articles
#[async_trait]
pub trait ArticleGateway: Send + Sync {
    /// Create a new article
    async fn create_article(&self, article: &Article) -> Result<CreatedArticle>;

    /// Replace the content of an existing article
    async fn update_article(&self, id: u64, article: &Article) -> Result<()>;

    /// Fetch the publication state of an article
    async fn article_status(&self, id: u64) -> Result<ArticleStatus>;
}

/// [`ArticleGateway`] over the DEV HTTP API
pub struct DevGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DevGateway {
    /// Creates a gateway with the default request timeout
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, Duration::from_secs(C::DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a gateway with a custom request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("devpub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Network)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
        })
    }

    fn articles_url(&self) -> String {
        format!("{}/articles", self.base_url)
    }

    fn article_url(&self, id: u64) -> String {
        format!("{}/articles/{}", self.base_url, id)
    }
}

#[async_trait]
impl ArticleGateway for DevGateway {
    async fn create_article(&self, article: &Article) -> Result<CreatedArticle> {
        let url = self.articles_url();
        debug!("POST {} ({} bytes of markdown)", url, article.markdown.len());

        let response = self
            .client
            .post(&url)
            .header(C::API_KEY_HEADER, &self.api_key)
            .json(&ArticleEnvelope { article })
            .send()
            .await?;
        let response = ensure_success(response, &url)?;

        let body = response.text().await?;
        let created: CreatedArticle = serde_json::from_str(&body)
            .map_err(|e| Error::BadResponse(format!("create response: {e}")))?;

        info!("Created article {} at {}", created.id, created.url);
        Ok(created)
    }

    async fn update_article(&self, id: u64, article: &Article) -> Result<()> {
        let url = self.article_url(id);
        debug!("PUT {} ({} bytes of markdown)", url, article.markdown.len());

        let response = self
            .client
            .put(&url)
            .header(C::API_KEY_HEADER, &self.api_key)
            .json(&ArticleEnvelope { article })
            .send()
            .await?;
        ensure_success(response, &url)?;

        info!("Updated article {}", id);
        Ok(())
    }

    async fn article_status(&self, id: u64) -> Result<ArticleStatus> {
        let url = self.article_url(id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(C::API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                info!("Article {} is not published", id);
                Ok(ArticleStatus::Unpublished)
            }
            StatusCode::OK => {
                let body = response.text().await?;
                let parsed: StatusBody = serde_json::from_str(&body)
                    .map_err(|e| Error::UnexpectedResponse(format!("article {id}: {e}")))?;
                let published_at = parsed.published_at.ok_or_else(|| {
                    Error::UnexpectedResponse(format!("article {id} has no published_at"))
                })?;
                info!("Article {} published at {}", id, published_at);
                Ok(ArticleStatus::Published {
                    url: parsed.url,
                    canonical_url: parsed.canonical_url,
                    published_at,
                })
            }
            status => Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url,
            }),
        }
    }
}

fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}
