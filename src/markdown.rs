//! Markdown metadata extraction
//!
//! Derives headings, wiki-links, embeds and the frontmatter fence from raw
//! note text. Every descriptor carries the byte range it was found at; the
//! transform pipeline splices the *same* text with those ranges, so these
//! functions must stay byte-exact.

use std::ops::Range;

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;

use crate::constants as C;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n)(#+) ([^\r\n]*)").expect("heading pattern is valid"));

static WIKI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!)?\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").expect("wiki-link pattern is valid")
});

/// Half-open byte range `[start, end)` over a note's raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Position {
    /// Create a position
    pub fn new(start: usize, end: usize) -> Self {
        Position { start, end }
    }
}

/// Represents a markdown heading
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Heading level (number of `#`)
    pub level: usize,
    /// Heading text content
    pub text: String,
    /// Range of the heading line, without the trailing newline
    pub position: Position,
}

/// A `[[target]]` or `[[target|alias]]` wiki-link
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Link target (note name or path)
    pub target: String,
    /// Alias if present, otherwise the target
    pub display_text: String,
    /// The link as it appears in the text
    pub original: String,
    /// Range of the whole `[[...]]` token
    pub position: Position,
}

/// A `![[target]]` or `![[target|display]]` embed
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    /// Embedded file name or path
    pub target: String,
    /// Display text after `|`, if any
    pub display_text: Option<String>,
    /// The embed as it appears in the text
    pub original: String,
    /// Range of the whole `![[...]]` token
    pub position: Position,
}

impl Embed {
    /// Display text, falling back to the target
    pub fn display(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.target)
    }

    /// Key used by the image mapping: `[[target]]`
    pub fn mapping_key(&self) -> String {
        format!("[[{}]]", self.target)
    }
}

/// Structural metadata of one note
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteMetadata {
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub embeds: Vec<Embed>,
}

impl NoteMetadata {
    /// Extract all metadata from note text
    ///
    /// Matches inside a leading frontmatter block are not part of the note
    /// body and are dropped (a YAML `# comment` is not a heading).
    pub fn from_text(content: &str) -> Self {
        let info = frontmatter_info(content);
        let body_start = if info.exists { info.content_start } else { 0 };
        let in_body = |position: &Position| position.start >= body_start;

        NoteMetadata {
            headings: extract_headings(content)
                .into_iter()
                .filter(|h| in_body(&h.position))
                .collect(),
            links: extract_links(content)
                .into_iter()
                .filter(|l| in_body(&l.position))
                .collect(),
            embeds: extract_embeds(content)
                .into_iter()
                .filter(|e| in_body(&e.position))
                .collect(),
        }
    }

    /// First level-1 heading, if any
    pub fn first_h1(&self) -> Option<&Heading> {
        self.headings.iter().find(|h| h.level == 1)
    }
}

/// Extract all headings from note text
pub fn extract_headings(content: &str) -> Vec<Heading> {
    HEADING_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let start = if whole.as_str().starts_with('\n') {
                whole.start() + 1
            } else {
                whole.start()
            };
            Some(Heading {
                level: caps.get(1)?.as_str().len(),
                text: caps.get(2)?.as_str().trim().to_string(),
                position: Position::new(start, whole.end()),
            })
        })
        .collect()
}

/// Extract all wiki-links (not embeds) from note text
pub fn extract_links(content: &str) -> Vec<Link> {
    WIKI_RE
        .captures_iter(content)
        .filter(|caps| caps.get(1).is_none())
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let target = caps.get(2)?.as_str().to_string();
            let display_text = caps
                .get(3)
                .map(|m| m.as_str())
                .filter(|alias| !alias.is_empty())
                .unwrap_or(&target)
                .to_string();
            Some(Link {
                target,
                display_text,
                original: whole.as_str().to_string(),
                position: Position::new(whole.start(), whole.end()),
            })
        })
        .collect()
}

/// Extract all embeds from note text
pub fn extract_embeds(content: &str) -> Vec<Embed> {
    WIKI_RE
        .captures_iter(content)
        .filter(|caps| caps.get(1).is_some())
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Embed {
                target: caps.get(2)?.as_str().to_string(),
                display_text: caps
                    .get(3)
                    .map(|m| m.as_str().to_string())
                    .filter(|text| !text.is_empty()),
                original: whole.as_str().to_string(),
                position: Position::new(whole.start(), whole.end()),
            })
        })
        .collect()
}

/// Location of a leading `---` fenced frontmatter block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrontMatterInfo {
    /// Whether the text starts with a complete fenced block
    pub exists: bool,
    /// Text between the fences
    pub frontmatter: String,
    /// Offset where the frontmatter text starts
    pub from: usize,
    /// Offset of the closing fence
    pub to: usize,
    /// Offset where the body starts (after the closing fence line)
    pub content_start: usize,
}

/// Locate the frontmatter block at the very start of `content`
///
/// The opening and closing fences must be lines consisting of `---`.
pub fn frontmatter_info(content: &str) -> FrontMatterInfo {
    let Some(first_end) = content.find('\n') else {
        return FrontMatterInfo::default();
    };
    if content[..first_end].trim_end() != C::FRONTMATTER_FENCE {
        return FrontMatterInfo::default();
    }

    let from = first_end + 1;
    let mut pos = from;
    while pos <= content.len() {
        let line_end = content[pos..].find('\n').map_or(content.len(), |i| pos + i);
        if content[pos..line_end].trim_end() == C::FRONTMATTER_FENCE {
            return FrontMatterInfo {
                exists: true,
                frontmatter: content[from..pos].to_string(),
                from,
                to: pos,
                content_start: (line_end + 1).min(content.len()),
            };
        }
        if line_end == content.len() {
            break;
        }
        pos = line_end + 1;
    }

    FrontMatterInfo::default()
}

/// Byte ranges of inline code spans and code blocks
pub fn code_ranges(content: &str) -> Vec<Range<usize>> {
    Parser::new(content)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Code(_) | Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}
