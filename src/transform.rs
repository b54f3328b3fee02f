//! Markdown transform pipeline
//!
//! Turns a note into the markdown body sent upstream. Every step produces
//! [`ReplaceInstruction`]s against the *raw* note text, using offsets from
//! the [`MetadataProvider`]; the instructions are applied in one splice
//! pass, after which the frontmatter block is stripped and the result
//! trimmed.
//!
//! Links, image embeds and math are collected, sorted by offset and applied
//! after the heading strip.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::constants as C;
use crate::frontmatter::Frontmatter;
use crate::gateway::Article;
use crate::image_map::ImageMapping;
use crate::markdown::{code_ranges, frontmatter_info, Embed, Link, NoteMetadata};
use crate::splice::{apply_splices, find_overlaps, ReplaceInstruction};
use crate::vault::{MetadataProvider, NoteStore};
use crate::Result;

/// Builds article title, body and payload for notes of one vault
pub struct Transformer<'a, V> {
    vault: &'a V,
}

impl<'a, V> Transformer<'a, V>
where
    V: NoteStore + MetadataProvider,
{
    pub fn new(vault: &'a V) -> Self {
        Transformer { vault }
    }

    /// Article title: text of the first level-1 heading
    pub async fn generate_title(&self, path: &str) -> Result<String> {
        let headings = self.vault.headings_of(path).await?;
        Ok(title_of(&NoteMetadata {
            headings,
            ..NoteMetadata::default()
        }))
    }

    /// Article body in DEV-flavoured markdown
    pub async fn generate_markdown(&self, path: &str) -> Result<String> {
        let text = self.vault.read(path).await?;
        let metadata = self.vault.metadata_of(path).await?;
        let frontmatter = self.vault.frontmatter(path).await?;
        self.render(path, &text, &metadata, &frontmatter).await
    }

    /// Complete payload for the remote API
    pub async fn article_data(&self, path: &str) -> Result<Article> {
        let text = self.vault.read(path).await?;
        let metadata = self.vault.metadata_of(path).await?;
        let frontmatter = self.vault.frontmatter(path).await?;

        let markdown = self.render(path, &text, &metadata, &frontmatter).await?;
        Ok(Article {
            title: title_of(&metadata),
            markdown,
            tags: frontmatter.tags(),
            series: frontmatter.series(),
        })
    }

    async fn render(
        &self,
        path: &str,
        text: &str,
        metadata: &NoteMetadata,
        frontmatter: &Frontmatter,
    ) -> Result<String> {
        let link_urls = self.link_urls(path, &metadata.links).await;
        let mut edits: Vec<ReplaceInstruction> = metadata
            .links
            .iter()
            .zip(link_urls)
            .map(|(link, url)| link_instruction(link, url.as_deref()))
            .collect();

        edits.extend(embed_instructions(&metadata.embeds, &frontmatter.image_map()));

        if frontmatter.mathjax_enabled() {
            edits.extend(math_instructions(text));
        }

        // The splice fold walks the text once, so edits must be in text order
        edits.sort_by_key(|x| x.from);

        // The heading strip swallows everything up to the title line
        let strip = heading_instruction(metadata);
        if let Some(strip) = &strip {
            edits.retain(|x| x.from >= strip.to || x.to > strip.to);
        }
        let instructions: Vec<ReplaceInstruction> = strip.into_iter().chain(edits).collect();

        for (i, j) in find_overlaps(&instructions) {
            warn!(
                "Overlapping edits in {}: {}..{} and {}..{}",
                path, instructions[i].from, instructions[i].to, instructions[j].from, instructions[j].to
            );
        }
        debug!("Applying {} edits to {}", instructions.len(), path);

        Ok(strip_frontmatter(&apply_splices(&instructions, text)))
    }

    /// `url` frontmatter value of each link's target note, if any
    async fn link_urls(&self, path: &str, links: &[Link]) -> Vec<Option<String>> {
        join_all(links.iter().map(|link| async move {
            let Some(target) = self.vault.resolve_link(&link.target, path).await else {
                return None;
            };
            match self.vault.frontmatter(&target).await {
                Ok(front) => front.url().map(str::to_string),
                Err(e) => {
                    debug!("Cannot read frontmatter of {}: {}", target, e);
                    None
                }
            }
        }))
        .await
    }
}

/// Title of a note: first level-1 heading text, or a placeholder
pub fn title_of(metadata: &NoteMetadata) -> String {
    metadata
        .first_h1()
        .map(|h| h.text.clone())
        .unwrap_or_else(|| C::MISSING_TITLE.to_string())
}

/// Remove everything from the start of the note through the first H1 line
pub fn heading_instruction(metadata: &NoteMetadata) -> Option<ReplaceInstruction> {
    metadata
        .first_h1()
        .map(|h| ReplaceInstruction::remove(0, h.position.end))
}

/// Markdown link when the target has a URL, bare display text otherwise
pub fn link_instruction(link: &Link, url: Option<&str>) -> ReplaceInstruction {
    let replacement = match url {
        Some(url) => format!("[{}]({})", link.display_text, url),
        None => link.display_text.clone(),
    };
    ReplaceInstruction::new(link.position.start, link.position.end, replacement)
}

/// Image syntax for embeds with a mapped URL; unmapped embeds stay as they are
pub fn embed_instructions(embeds: &[Embed], mapping: &ImageMapping) -> Vec<ReplaceInstruction> {
    embeds
        .iter()
        .filter_map(|embed| {
            let url = mapping.url_for(&embed.mapping_key())?;
            Some(ReplaceInstruction::new(
                embed.position.start,
                embed.position.end,
                format!("![{}]({})", embed.display(), url),
            ))
        })
        .collect()
}

/// Katex tags for `$inline$` and `$$block$$` math
///
/// `\$` is an escaped dollar. Inline math ends at the next unescaped `$`
/// on the same line; block math runs to the next `$$`. Unterminated
/// delimiters, a block holding a lone `$`, math inside code and the
/// frontmatter block are left alone.
pub fn math_instructions(text: &str) -> Vec<ReplaceInstruction> {
    let code = code_ranges(text);
    let in_code = |from: usize, to: usize| code.iter().any(|r| from < r.end && r.start < to);

    let info = frontmatter_info(text);
    let bytes = text.as_bytes();
    let mut instructions = Vec::new();
    let mut i = if info.exists { info.content_start } else { 0 };

    while i < bytes.len() {
        if let Some(range) = code.iter().find(|r| r.contains(&i)) {
            i = range.end;
            continue;
        }
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'$') => {
                let start = i + 2;
                match block_end(bytes, start) {
                    Some((j, lone_dollar)) => {
                        let expr = text[start..j].trim();
                        if !lone_dollar && !expr.is_empty() && !in_code(i, j + 2) {
                            instructions.push(ReplaceInstruction::new(
                                i,
                                j + 2,
                                format!("{{% katex %}}\n{}\n{{% endkatex %}}", expr),
                            ));
                        }
                        i = j + 2;
                    }
                    None => i += 2,
                }
            }
            b'$' => match inline_end(bytes, i + 1) {
                Some(j) if j > i + 1 && !in_code(i, j + 1) => {
                    instructions.push(ReplaceInstruction::new(
                        i,
                        j + 1,
                        format!("{{% katex inline %}}\n {}\n{{% endkatex %}}", &text[i + 1..j]),
                    ));
                    i = j + 1;
                }
                _ => i += 1,
            },
            _ => i += 1,
        }
    }

    instructions
}

/// Offset of the `$$` closing block math opened before `from`
///
/// The flag is set when an unescaped lone `$` comes first; such a block is
/// kept verbatim up to its closer.
fn block_end(bytes: &[u8], from: usize) -> Option<(usize, bool)> {
    let mut lone_dollar = false;
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'$' if bytes.get(j + 1) == Some(&b'$') => return Some((j, lone_dollar)),
            b'$' => {
                lone_dollar = true;
                j += 1;
            }
            _ => j += 1,
        }
    }
    None
}

/// Offset of the `$` closing inline math opened before `from`
fn inline_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return None,
            b'$' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/// Drop a leading frontmatter block and trim
pub fn strip_frontmatter(text: &str) -> String {
    let info = frontmatter_info(text);
    let body = if info.exists { &text[info.content_start..] } else { text };
    body.trim().to_string()
}
