pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod frontmatter;
pub mod gateway;
pub mod image_map;
pub mod markdown;
pub mod note_resolver;
pub mod publisher;
pub mod splice;
pub mod transform;
pub mod util;
pub mod vault;

pub use cli::{Cli, Command, ConfigCommand};
pub use config::Settings;
pub use error::{Error, Result};
pub use frontmatter::Frontmatter;
pub use gateway::{Article, ArticleGateway, ArticleStatus, CreatedArticle, DevGateway};
pub use image_map::{map_images, ImageMapping, ImageMappingDialog, ImageMappingEntry};
pub use markdown::{Embed, Heading, Link, NoteMetadata, Position};
pub use note_resolver::ResolvedNote;
pub use publisher::{PublishOutcome, Publisher};
pub use splice::{apply_splices, ReplaceInstruction};
pub use transform::Transformer;
pub use vault::{FsVault, MetadataProvider, NoteStore};
