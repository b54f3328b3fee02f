//! Status command

use std::path::Path;

use anyhow::Result;
use devpub::{ArticleStatus, DevGateway, Publisher, Settings};

pub async fn run(vault_flag: Option<&Path>, note: &str) -> Result<()> {
    let settings = Settings::load()?;
    let gateway = DevGateway::new(settings.require_api_key()?, settings.api_base_url.clone())?;

    let vault = super::resolve::open_vault(vault_flag).await?;
    let path = super::resolve::resolve_note(&vault, note)?;
    let publisher = Publisher::new(vault, gateway);

    match publisher.refresh_status(&path).await? {
        None => println!("{}: never published", path),
        Some(ArticleStatus::Unpublished) => println!("{}: draft", path),
        Some(ArticleStatus::Published {
            url, published_at, ..
        }) => {
            println!("{}: published {}", path, published_at.format("%Y-%m-%d %H:%M UTC"));
            println!("{}", url);
        }
    }
    Ok(())
}
