//! Frontmatter access
//!
//! Notes carry a YAML frontmatter block. This module splits it from the
//! body, renders it back, and exposes a typed getter/setter for every key
//! devpub reads or writes, so callers never poke at the untyped map.

use serde_json::{Map, Value};
use tracing::warn;

use crate::constants as C;
use crate::gateway::{ArticleStatus, CreatedArticle};
use crate::image_map::{ImageMapping, ImageMappingEntry};
use crate::markdown::frontmatter_info;
use crate::{Error, Result};

/// Frontmatter of one note: a JSON-like key/value map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    map: Map<String, Value>,
}

impl From<Map<String, Value>> for Frontmatter {
    fn from(map: Map<String, Value>) -> Self {
        Frontmatter { map }
    }
}

impl Frontmatter {
    /// Create an empty frontmatter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Set a raw value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // === Typed getters ===

    /// Remote article id; only integer values count
    pub fn article_id(&self) -> Option<u64> {
        match self.map.get(C::ARTICLE_ID_KEY)? {
            Value::Number(n) => {
                let id = n.as_u64();
                if id.is_none() {
                    warn!("Ignoring non-integer {}: {}", C::ARTICLE_ID_KEY, n);
                }
                id
            }
            other => {
                warn!("Ignoring {} of unexpected type: {}", C::ARTICLE_ID_KEY, other);
                None
            }
        }
    }

    /// `url` of a linked note (non-empty string only)
    pub fn url(&self) -> Option<&str> {
        self.non_empty_str(C::LINK_URL_KEY)
    }

    /// Remote article URL
    pub fn article_url(&self) -> Option<&str> {
        self.non_empty_str(C::ARTICLE_URL_KEY)
    }

    /// Remote canonical URL
    pub fn canonical_url(&self) -> Option<&str> {
        self.non_empty_str(C::ARTICLE_CANONICAL_URL_KEY)
    }

    /// Last known published flag
    pub fn published(&self) -> Option<bool> {
        self.map.get(C::ARTICLE_PUBLISHED_KEY).and_then(Value::as_bool)
    }

    /// Tags to publish
    ///
    /// Only an array counts; non-string entries are dropped and at most
    /// [`C::MAX_TAGS`] are kept.
    pub fn tags(&self) -> Option<Vec<String>> {
        match self.map.get(C::TAGS_KEY)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .take(C::MAX_TAGS)
                    .map(str::to_string)
                    .collect(),
            ),
            other => {
                warn!("Ignoring {} that is not a list: {}", C::TAGS_KEY, other);
                None
            }
        }
    }

    /// Series name; only string values count
    pub fn series(&self) -> Option<String> {
        match self.map.get(C::SERIES_KEY)? {
            Value::String(s) => Some(s.clone()),
            other => {
                warn!("Ignoring {} that is not a string: {}", C::SERIES_KEY, other);
                None
            }
        }
    }

    /// Whether `$`/`$$` math conversion is enabled (boolean `true` only)
    pub fn mathjax_enabled(&self) -> bool {
        match self.map.get(C::MATHJAX_KEY) {
            None => false,
            Some(Value::Bool(enabled)) => *enabled,
            Some(other) => {
                warn!("Ignoring {} that is not a boolean: {}", C::MATHJAX_KEY, other);
                false
            }
        }
    }

    /// Persisted image mapping; malformed entries are skipped
    pub fn image_map(&self) -> ImageMapping {
        let Some(Value::Array(items)) = self.map.get(C::IMAGE_MAP_KEY) else {
            return ImageMapping::default();
        };
        items
            .iter()
            .filter_map(|item| match serde_json::from_value::<ImageMappingEntry>(item.clone()) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping malformed {} entry {}: {}", C::IMAGE_MAP_KEY, item, e);
                    None
                }
            })
            .collect()
    }

    // === Typed setters ===

    /// Record a freshly created remote article
    pub fn set_created(&mut self, created: &CreatedArticle) {
        self.insert(C::ARTICLE_ID_KEY, created.id);
        self.insert(C::ARTICLE_URL_KEY, created.url.clone());
        self.insert(C::ARTICLE_CANONICAL_URL_KEY, created.canonical_url.clone());
    }

    /// Record the refreshed remote status
    ///
    /// URLs are only overwritten when the article is published.
    pub fn set_status(&mut self, status: &ArticleStatus) {
        match status {
            ArticleStatus::Unpublished => {
                self.insert(C::ARTICLE_PUBLISHED_KEY, false);
            }
            ArticleStatus::Published {
                url,
                canonical_url,
                ..
            } => {
                self.insert(C::ARTICLE_PUBLISHED_KEY, true);
                self.insert(C::ARTICLE_URL_KEY, url.clone());
                self.insert(C::ARTICLE_CANONICAL_URL_KEY, canonical_url.clone());
            }
        }
    }

    /// Persist the image mapping, dropping entries without a URL
    pub fn set_image_map(&mut self, mapping: &ImageMapping) -> Result<()> {
        let value = serde_json::to_value(mapping.without_empty())?;
        self.insert(C::IMAGE_MAP_KEY, value);
        Ok(())
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Split note text into its frontmatter and body
///
/// `path` is only used in error messages.
pub fn split_note<'a>(path: &str, content: &'a str) -> Result<(Frontmatter, &'a str)> {
    let info = frontmatter_info(content);
    if !info.exists {
        return Ok((Frontmatter::new(), content));
    }

    // Check frontmatter size before parsing
    if info.frontmatter.len() > C::MAX_FRONTMATTER_SIZE {
        return Err(Error::Frontmatter {
            path: path.to_string(),
            reason: format!("larger than {} bytes", C::MAX_FRONTMATTER_SIZE),
        });
    }

    let body = &content[info.content_start..];
    if info.frontmatter.trim().is_empty() {
        return Ok((Frontmatter::new(), body));
    }

    match serde_yaml::from_str::<Value>(&info.frontmatter)? {
        Value::Object(map) => Ok((Frontmatter::from(map), body)),
        Value::Null => Ok((Frontmatter::new(), body)),
        _ => Err(Error::Frontmatter {
            path: path.to_string(),
            reason: "not a key/value mapping".to_string(),
        }),
    }
}

/// Render frontmatter and body back into note text
///
/// An empty frontmatter removes the block entirely.
pub fn render_note(frontmatter: &Frontmatter, body: &str) -> Result<String> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(&Value::Object(frontmatter.map.clone()))?;
    Ok(format!("---\n{}\n---\n{}", yaml.trim_end(), body))
}
