//! Offset splice engine
//!
//! Applies a set of offset-addressed replace instructions to a base text in
//! a single pass. Instructions always address the *original* text, so the
//! transform pipeline can compute them independently from metadata offsets
//! and combine them at the end.
//!
//! Rules:
//! - An instruction strictly contained in another one is discarded; the
//!   outer instruction wins (stripping a heading supersedes a link inside it).
//! - The remaining instructions are folded in their given order.
//! - Partially overlapping instructions are not reconciled; use
//!   [`find_overlaps`] to detect them.

/// A request to replace `from..to` of the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceInstruction {
    /// Start offset (inclusive)
    pub from: usize,
    /// End offset (exclusive)
    pub to: usize,
    /// Text inserted in place of the range
    pub replacement: String,
}

impl ReplaceInstruction {
    /// Create a replace instruction
    pub fn new(from: usize, to: usize, replacement: impl Into<String>) -> Self {
        ReplaceInstruction {
            from,
            to,
            replacement: replacement.into(),
        }
    }

    /// Create an instruction removing `from..to`
    pub fn remove(from: usize, to: usize) -> Self {
        Self::new(from, to, "")
    }

    /// Whether this instruction lies strictly inside `other`
    pub fn is_nested_in(&self, other: &ReplaceInstruction) -> bool {
        self.from > other.from && self.to < other.to
    }

    fn overlaps(&self, other: &ReplaceInstruction) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// Apply replace instructions to `text`
///
/// Offsets are clamped to the text and moved back to the nearest char
/// boundary. An instruction starting before the end of the previous one
/// keeps nothing from the original in between.
pub fn apply_splices(instructions: &[ReplaceInstruction], text: &str) -> String {
    let maximal = instructions
        .iter()
        .filter(|x| !instructions.iter().any(|y| x.is_nested_in(y)));

    let mut pieces: Vec<&str> = Vec::with_capacity(instructions.len() * 2 + 1);
    let mut last_index = 0;

    for instruction in maximal {
        let from = clamp(text, instruction.from);
        let to = clamp(text, instruction.to);
        if from > last_index {
            pieces.push(&text[last_index..from]);
        }
        pieces.push(&instruction.replacement);
        last_index = to;
    }
    pieces.push(&text[clamp(text, last_index)..]);

    pieces.concat()
}

/// Find pairs of instructions that overlap without one being nested in the other
///
/// Returns index pairs `(i, j)` with `i < j`. The splice fold does not define
/// a result for these, so callers should treat a non-empty result as a bug
/// in how instructions were assembled.
pub fn find_overlaps(instructions: &[ReplaceInstruction]) -> Vec<(usize, usize)> {
    let mut overlaps = Vec::new();
    for (i, a) in instructions.iter().enumerate() {
        for (j, b) in instructions.iter().enumerate().skip(i + 1) {
            if a.overlaps(b) && !a.is_nested_in(b) && !b.is_nested_in(a) {
                overlaps.push((i, j));
            }
        }
    }
    overlaps
}

fn clamp(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
