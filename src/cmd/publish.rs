//! Publish command

use std::path::Path;

use anyhow::Result;
use devpub::constants as C;
use devpub::{ArticleStatus, DevGateway, PublishOutcome, Publisher, Settings};
use tracing::error;

pub async fn run(vault_flag: Option<&Path>, note: &str) -> Result<()> {
    let settings = Settings::load()?;
    let gateway = DevGateway::new(settings.require_api_key()?, settings.api_base_url.clone())?;

    let vault = super::resolve::open_vault(vault_flag).await?;
    let path = super::resolve::resolve_note(&vault, note)?;
    let publisher = Publisher::new(vault, gateway);

    match publisher.publish(&path).await {
        Ok(PublishOutcome::Created { id, url, title }) => {
            println!("Created \"{}\" (article {})", title, id);
            println!("{}", url);
            Ok(())
        }
        Ok(PublishOutcome::Updated { id, status, title }) => {
            println!("Updated \"{}\" (article {})", title, id);
            match status {
                ArticleStatus::Published { url, .. } => println!("{}", url),
                ArticleStatus::Unpublished => println!("The article is still a draft"),
            }
            Ok(())
        }
        Err(e) => {
            error!(category = e.category(), "Publishing {} failed: {}", path, e);
            eprintln!("{}", C::PUBLISH_FAILURE_NOTICE);
            Err(e.into())
        }
    }
}
