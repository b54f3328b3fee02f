//! Image embed mapping
//!
//! Embedded images cannot be uploaded through the API, so the author hosts
//! them somewhere and records the public URL per embed. The mapping lives in
//! the `dev-image-map` frontmatter key as a list of
//! `{imageFile: "[[name]]", publicUrl}` objects and is only ever edited
//! through an [`ImageMappingDialog`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::markdown::Embed;
use crate::vault::{MetadataProvider, NoteStore};
use crate::Result;

/// One embed-to-URL pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMappingEntry {
    /// Embed target in bracketed form, e.g. `[[diagram.png]]`
    pub image_file: String,
    /// Where the image is publicly hosted; empty when not mapped yet
    pub public_url: String,
}

impl ImageMappingEntry {
    pub fn new(image_file: impl Into<String>, public_url: impl Into<String>) -> Self {
        ImageMappingEntry {
            image_file: image_file.into(),
            public_url: public_url.into(),
        }
    }
}

/// Ordered list of image mapping entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageMapping(Vec<ImageMappingEntry>);

impl ImageMapping {
    pub fn new(entries: Vec<ImageMappingEntry>) -> Self {
        ImageMapping(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[ImageMappingEntry] {
        &self.0
    }

    /// Public URL for a bracketed image reference, if mapped to a non-empty URL
    pub fn url_for(&self, image_file: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.image_file == image_file)
            .map(|entry| entry.public_url.as_str())
            .filter(|url| !url.trim().is_empty())
    }

    /// Copy of the mapping without entries lacking a URL
    pub fn without_empty(&self) -> ImageMapping {
        self.0
            .iter()
            .filter(|entry| !entry.public_url.trim().is_empty())
            .cloned()
            .collect()
    }
}

impl FromIterator<ImageMappingEntry> for ImageMapping {
    fn from_iter<I: IntoIterator<Item = ImageMappingEntry>>(iter: I) -> Self {
        ImageMapping(iter.into_iter().collect())
    }
}

/// Presents the mapping list to the author
pub trait ImageMappingDialog {
    /// Show `list` for editing
    ///
    /// Returns `None` when the author cancels, otherwise the revised list.
    fn show(&self, list: ImageMapping) -> Result<Option<ImageMapping>>;
}

/// One entry per distinct embed target, in first-seen order
///
/// URLs already present in `existing` are carried over; other entries start
/// with an empty URL.
pub fn mapping_candidates(embeds: &[Embed], existing: &ImageMapping) -> ImageMapping {
    let mut entries: Vec<ImageMappingEntry> = Vec::new();
    for embed in embeds {
        let key = embed.mapping_key();
        if entries.iter().any(|entry| entry.image_file == key) {
            continue;
        }
        let url = existing.url_for(&key).unwrap_or_default().to_string();
        entries.push(ImageMappingEntry::new(key, url));
    }
    ImageMapping(entries)
}

/// Run the mapping dialog for a note and persist the result
///
/// Returns the persisted mapping, or `None` if the dialog was cancelled (in
/// which case the frontmatter is not touched).
pub async fn map_images<V, D>(vault: &V, path: &str, dialog: &D) -> Result<Option<ImageMapping>>
where
    V: NoteStore + MetadataProvider,
    D: ImageMappingDialog + ?Sized,
{
    let embeds = vault.embeds_of(path).await?;
    let existing = vault.frontmatter(path).await?.image_map();
    let candidates = mapping_candidates(&embeds, &existing);

    let Some(revised) = dialog.show(candidates)? else {
        info!("Image mapping for {} cancelled", path);
        return Ok(None);
    };

    let persisted = revised.without_empty();
    let to_store = persisted.clone();
    vault
        .process_frontmatter(path, move |frontmatter| frontmatter.set_image_map(&to_store))
        .await?;
    info!("Stored {} image mapping(s) for {}", persisted.len(), path);
    Ok(Some(persisted))
}
