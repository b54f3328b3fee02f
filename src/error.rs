//! Error types for devpub operations.
//!
//! Errors fall into three groups:
//!
//! - **Transport**: the HTTP request failed or the server answered with a
//!   status code the operation does not handle (`Network`, `UnexpectedStatus`)
//! - **Schema validation**: the server answered, but the payload is missing
//!   required fields or has the wrong types (`BadResponse`,
//!   `UnexpectedResponse`)
//! - **Local**: reading or writing notes, frontmatter or settings
//!
//! Unresolvable links and unmapped image embeds are not errors; the
//! transform pipeline degrades them to plain text or leaves them untouched.

use thiserror::Error;

/// The main error type for devpub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request could not be completed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frontmatter YAML could not be parsed or rendered.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Settings file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Frontmatter block is present but unusable (too large, not a mapping).
    #[error("Invalid frontmatter in '{path}': {reason}")]
    Frontmatter {
        /// Note path
        path: String,
        /// What is wrong with the block
        reason: String,
    },

    /// No note matches the reference.
    #[error("Note '{0}' not found")]
    NoteNotFound(String),

    /// More than one note matches the reference.
    #[error("Ambiguous note reference '{reference}': {} candidates found", candidates.len())]
    AmbiguousNote {
        /// The reference as given
        reference: String,
        /// Matching vault-relative paths
        candidates: Vec<String>,
    },

    /// A note path points outside the vault root.
    #[error("Path escapes the vault: {0}")]
    PathEscapesVault(String),

    /// Create response lacks the id or URL fields.
    #[error("Bad response: {0}")]
    BadResponse(String),

    /// Status response is not a published article.
    #[error("Bad data retrieved from server: {0}")]
    UnexpectedResponse(String),

    /// Server answered with a status code the operation does not handle.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// No API key configured.
    #[error("No API key configured. Run `devpub config set-key <KEY>` or set DEVPUB_API_KEY")]
    MissingApiKey,

    /// The note is already being published by this process.
    #[error("A publish of '{0}' is already in progress")]
    PublishInProgress(String),

    /// Settings are invalid or cannot be located.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Error category, used in log records
    pub fn category(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::UnexpectedStatus { .. } => "transport",
            Self::BadResponse(_) | Self::UnexpectedResponse(_) => "validation",
            Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::Frontmatter { .. }
            | Self::NoteNotFound(_)
            | Self::AmbiguousNote { .. }
            | Self::PathEscapesVault(_)
            | Self::PublishInProgress(_) => "local",
            Self::Toml(_) | Self::MissingApiKey | Self::Config(_) => "config",
        }
    }
}

/// Result alias for devpub operations
pub type Result<T> = std::result::Result<T, Error>;
