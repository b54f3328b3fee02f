//! Note resolution module
//!
//! Resolves note reference strings to vault-relative note paths.
//!
//! Resolution rules (in order):
//! 1. Subpath (`#heading`, `^block`) is ignored for wiki-link targets
//! 2. Exact vault-relative path, with or without `.md` → that note
//! 3. Path suffix (`folder/Note`) → notes whose path ends with it
//! 4. File stem equal to the reference → matching notes, falling back to a
//!    case-insensitive comparison when nothing matches exactly
//!
//! Wiki-links always resolve to a single note: candidates in the linking
//! note's directory win, then the shortest path. CLI references report
//! ambiguity instead.

use crate::constants as C;

/// Resolution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedNote {
    /// Single note found
    Found(String),
    /// Multiple candidates (ambiguous)
    Ambiguous(Vec<String>),
    /// Not found
    NotFound,
}

/// Resolve a wiki-link target as seen from `source_path`
///
/// `notes` holds every vault-relative note path.
pub fn resolve_link_target(notes: &[String], target: &str, source_path: &str) -> Option<String> {
    let target = strip_subpath(target);
    if target.is_empty() {
        return None;
    }

    let mut candidates = match_reference(notes, target);
    if candidates.len() <= 1 {
        return candidates.pop();
    }

    let source_dir = parent_dir(source_path);
    let same_dir: Vec<String> = candidates
        .iter()
        .filter(|path| parent_dir(path) == source_dir)
        .cloned()
        .collect();
    if !same_dir.is_empty() {
        candidates = same_dir;
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.into_iter().next()
}

/// Resolve a note reference given on the command line
pub fn resolve_note(notes: &[String], reference: &str) -> ResolvedNote {
    let mut candidates = match_reference(notes, reference);
    match candidates.len() {
        0 => ResolvedNote::NotFound,
        1 => ResolvedNote::Found(candidates.remove(0)),
        _ => {
            candidates.sort();
            ResolvedNote::Ambiguous(candidates)
        }
    }
}

/// All notes matching `reference`, stopping at the first rule that matches
fn match_reference(notes: &[String], reference: &str) -> Vec<String> {
    let reference = normalize(reference);
    if reference.is_empty() {
        return Vec::new();
    }

    // Rule: exact path
    let with_ext = if reference.ends_with(C::MARKDOWN_EXTENSION) {
        reference.clone()
    } else {
        format!("{}{}", reference, C::MARKDOWN_EXTENSION)
    };
    if let Some(exact) = notes.iter().find(|path| **path == reference || **path == with_ext) {
        return vec![exact.clone()];
    }

    // Rule: path suffix
    if reference.contains('/') {
        let suffix = format!("/{}", with_ext);
        return notes
            .iter()
            .filter(|path| path.ends_with(&suffix))
            .cloned()
            .collect();
    }

    // Rule: file stem, exact case first
    let name = reference
        .strip_suffix(C::MARKDOWN_EXTENSION)
        .unwrap_or(&reference);
    let exact: Vec<String> = notes
        .iter()
        .filter(|path| note_stem(path) == name)
        .cloned()
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let lowered = name.to_lowercase();
    notes
        .iter()
        .filter(|path| note_stem(path).to_lowercase() == lowered)
        .cloned()
        .collect()
}

/// Drop a `#heading` or `^block` subpath from a link target
fn strip_subpath(target: &str) -> &str {
    let end = target.find(['#', '^']).unwrap_or(target.len());
    target[..end].trim()
}

fn normalize(reference: &str) -> String {
    let reference = reference.trim().replace('\\', "/");
    reference.trim_start_matches("./").to_string()
}

fn note_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(C::MARKDOWN_EXTENSION).unwrap_or(name)
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}
