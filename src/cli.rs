use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// devpub - Publish markdown vault notes as DEV articles
///
/// # Quick Reference
///
/// ```bash
/// devpub config set-key <KEY>              # Store the DEV API key
/// devpub preview "My Post"                 # Print title, tags and body
/// devpub publish "My Post"                 # Create or update the article
/// devpub status "My Post"                  # Refresh published state
/// devpub map-images "My Post"              # Prompt for image URLs
/// devpub map-images "My Post" --set diagram.png=https://cdn.example.com/d.png
/// ```
///
/// ## Note Resolution
///
/// Notes can be referenced by:
/// - Vault-relative path: "posts/My Post.md" or "posts/My Post"
/// - Path suffix: "posts/My Post"
/// - File name: "My Post" (case-insensitive if nothing matches exactly)
///
/// ## Frontmatter
///
/// Read: `dev-tags` (up to 4), `dev-series`, `dev-enable-mathjax`, and `url`
/// of linked notes. Written: `dev-article-id`, `dev-url`,
/// `dev-canonical-url`, `dev-published`, `dev-image-map`.
///
/// ## Environment Variables
///
/// - `DEVPUB_VAULT`: vault root (default: current directory)
/// - `DEVPUB_API_KEY`: API key, overrides the settings file
/// - `DEVPUB_API_URL`: API base URL (default: https://dev.to/api)
#[derive(Parser, Debug)]
#[command(name = "devpub")]
#[command(version)]
#[command(about = "Publish markdown vault notes as DEV articles")]
pub struct Cli {
    /// Vault root directory
    #[arg(long, global = true, env = "DEVPUB_VAULT", value_name = "PATH")]
    pub vault: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the article on first publish, update it afterwards
    #[command(alias = "p")]
    Publish {
        /// Note reference
        note: String,
    },

    /// Print the article exactly as it would be sent
    Preview {
        /// Note reference
        note: String,
    },

    /// Refresh and print the remote publication state
    Status {
        /// Note reference
        note: String,
    },

    /// Edit the image embed to public URL mapping
    MapImages {
        /// Note reference
        note: String,

        /// Set mappings without prompting (NAME=URL, NAME without brackets)
        #[arg(long = "set", value_name = "NAME=URL")]
        set: Vec<String>,
    },

    /// Manage settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Store the API key (unencrypted)
    SetKey {
        /// DEV API key
        key: String,
    },

    /// Show the settings in effect
    Show,
}
