//! Constants for devpub
//!
//! Frontmatter keys, remote API defaults, and fixed strings used across
//! the transform pipeline, the gateway and the command line.

// === Frontmatter Keys ===

/// Remote article id, written after the first successful create
pub const ARTICLE_ID_KEY: &str = "dev-article-id";

/// Public URL of the remote article
pub const ARTICLE_URL_KEY: &str = "dev-url";

/// Canonical URL of the remote article
pub const ARTICLE_CANONICAL_URL_KEY: &str = "dev-canonical-url";

/// Whether the remote article is published
pub const ARTICLE_PUBLISHED_KEY: &str = "dev-published";

/// Persisted image embed to public URL mapping
pub const IMAGE_MAP_KEY: &str = "dev-image-map";

/// Tags to send with the article (read-only)
pub const TAGS_KEY: &str = "dev-tags";

/// Series name to send with the article (read-only)
pub const SERIES_KEY: &str = "dev-series";

/// Opt-in flag for `$`/`$$` math conversion (read-only)
pub const MATHJAX_KEY: &str = "dev-enable-mathjax";

/// URL of a linked note, used when resolving wiki-links
pub const LINK_URL_KEY: &str = "url";

// === Article Shape ===

/// Title used when a note has no level-1 heading
pub const MISSING_TITLE: &str = "Heading Missing";

/// Maximum number of tags accepted by the remote API
pub const MAX_TAGS: usize = 4;

// === Remote API ===

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://dev.to/api";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "api-key";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// === Files and Directories ===

/// Default file extension for notes
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "devpub";

/// Settings file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Frontmatter fence marker
pub const FRONTMATTER_FENCE: &str = "---";

// === Environment Variables ===

/// Vault root override
pub const ENV_VAULT: &str = "DEVPUB_VAULT";

/// API key override
pub const ENV_API_KEY: &str = "DEVPUB_API_KEY";

/// API base URL override
pub const ENV_API_URL: &str = "DEVPUB_API_URL";

// === Validation Limits ===

/// Maximum size of frontmatter to parse (prevents DoS on malformed files)
pub const MAX_FRONTMATTER_SIZE: usize = 64 * 1024; // 64KB

// === Messages ===

/// Shown when saving the API key
pub const API_KEY_STORAGE_WARNING: &str = "SECURITY WARNING! The API key is stored unencrypted in your config directory.";

/// Remediation guidance shown when publishing fails
pub const PUBLISH_FAILURE_NOTICE: &str = "Error publishing to DEV. Check that your API key is valid and try again. If the problem persists, please file a bug report.";
