//! Image mapping command

use std::io;
use std::path::Path;

use anyhow::{bail, Result};
use devpub::{map_images, Error, ImageMapping, ImageMappingDialog, ImageMappingEntry};
use inquire::{InquireError, Text};

/// Prompts for the URL of each image in turn
struct PromptDialog;

impl ImageMappingDialog for PromptDialog {
    fn show(&self, list: ImageMapping) -> devpub::Result<Option<ImageMapping>> {
        if list.is_empty() {
            println!("The note has no image embeds");
            return Ok(None);
        }

        let mut revised = Vec::with_capacity(list.len());
        for entry in list.entries() {
            let answer = Text::new(&format!("Public URL for {}", entry.image_file))
                .with_initial_value(&entry.public_url)
                .with_help_message("Leave empty to skip, Esc to cancel")
                .prompt();
            match answer {
                Ok(url) => revised.push(ImageMappingEntry::new(entry.image_file.clone(), url.trim())),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(None);
                }
                Err(InquireError::IO(e)) => return Err(Error::Io(e)),
                Err(e) => return Err(Error::Io(io::Error::other(e.to_string()))),
            }
        }
        Ok(Some(revised.into_iter().collect()))
    }
}

/// Applies `NAME=URL` pairs from the command line
struct StaticDialog {
    pairs: Vec<(String, String)>,
}

impl ImageMappingDialog for StaticDialog {
    fn show(&self, list: ImageMapping) -> devpub::Result<Option<ImageMapping>> {
        let mut entries = list.entries().to_vec();
        for (key, url) in &self.pairs {
            match entries.iter_mut().find(|entry| &entry.image_file == key) {
                Some(entry) => entry.public_url = url.clone(),
                None => eprintln!("Warning: the note does not embed {}", key),
            }
        }
        Ok(Some(entries.into_iter().collect()))
    }
}

/// Parse `name=url` into a bracketed mapping key and URL
fn parse_pair(pair: &str) -> Result<(String, String)> {
    let Some((name, url)) = pair.split_once('=') else {
        bail!("Expected NAME=URL, got '{}'", pair);
    };
    let name = name.trim().trim_start_matches("[[").trim_end_matches("]]");
    if name.is_empty() {
        bail!("Missing image name in '{}'", pair);
    }
    Ok((format!("[[{}]]", name), url.trim().to_string()))
}

pub async fn run(vault_flag: Option<&Path>, note: &str, set: Vec<String>) -> Result<()> {
    let vault = super::resolve::open_vault(vault_flag).await?;
    let path = super::resolve::resolve_note(&vault, note)?;

    let persisted = if set.is_empty() {
        map_images(&vault, &path, &PromptDialog).await?
    } else {
        let pairs = set.iter().map(|pair| parse_pair(pair)).collect::<Result<Vec<_>>>()?;
        map_images(&vault, &path, &StaticDialog { pairs }).await?
    };

    match persisted {
        Some(mapping) => {
            println!("Saved {} image mapping(s) to {}", mapping.len(), path);
            for entry in mapping.entries() {
                println!("  {} -> {}", entry.image_file, entry.public_url);
            }
        }
        None => println!("No changes"),
    }
    Ok(())
}
