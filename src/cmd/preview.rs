//! Preview command: print the article without sending it

use std::path::Path;

use anyhow::Result;
use devpub::Transformer;

pub async fn run(vault_flag: Option<&Path>, note: &str) -> Result<()> {
    let vault = super::resolve::open_vault(vault_flag).await?;
    let path = super::resolve::resolve_note(&vault, note)?;

    let article = Transformer::new(&vault).article_data(&path).await?;

    println!("title: {}", article.title);
    if let Some(tags) = &article.tags {
        println!("tags: {}", tags.join(", "));
    }
    if let Some(series) = &article.series {
        println!("series: {}", series);
    }
    println!();
    println!("{}", article.markdown);
    Ok(())
}
