//! Edit compositor: collects per-file replacements and splices them into
//! the frozen source snapshot.
//!
//! All replacement ranges are computed against the same snapshot before any
//! edit is applied, then applied together ordered by ascending start offset,
//! so no edit's byte offsets are invalidated by an earlier edit in the same
//! pass. Overlapping replacements are a rule bug and are rejected rather
//! than resolved.

use crate::types::Replacement;
use thiserror::Error;

/// Errors from composing or applying an edit set.
#[derive(Debug, Error)]
pub enum EditError {
    /// Two replacements claim overlapping byte ranges.
    #[error("overlapping replacements: {first_start}..{first_end} and {second_start}..{second_end}")]
    Overlap {
        /// Start of the earlier replacement.
        first_start: usize,
        /// End of the earlier replacement.
        first_end: usize,
        /// Start of the later replacement.
        second_start: usize,
        /// End of the later replacement.
        second_end: usize,
    },
    /// A replacement range points past the end of the snapshot.
    #[error("replacement {start}..{end} is out of bounds for a {len}-byte file")]
    OutOfBounds {
        /// Start of the replacement.
        start: usize,
        /// End of the replacement.
        end: usize,
        /// Length of the file being edited.
        len: usize,
    },
}

/// The set of replacements collected for one file in one pass.
#[derive(Debug, Default)]
pub struct EditSet {
    replacements: Vec<Replacement>,
}

impl EditSet {
    /// Creates an empty edit set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a replacement to the set.
    pub fn push(&mut self, replacement: Replacement) {
        self.replacements.push(replacement);
    }

    /// Returns true if no replacements were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Returns the number of collected replacements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Applies all replacements to `source`, ordered by ascending start
    /// offset.
    ///
    /// Zero-width insertions may touch a neighboring replacement's boundary;
    /// any shared byte is an overlap.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Overlap`] if two replacements share a byte and
    /// [`EditError::OutOfBounds`] if a range exceeds the snapshot.
    pub fn apply_to(&self, source: &str) -> Result<String, EditError> {
        let mut ordered: Vec<&Replacement> = self.replacements.iter().collect();
        ordered.sort_by_key(|r| (r.span.start, r.span.end));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        let mut prev = None;
        for r in ordered {
            if r.span.end > source.len() {
                return Err(EditError::OutOfBounds {
                    start: r.span.start,
                    end: r.span.end,
                    len: source.len(),
                });
            }
            if r.span.start < cursor {
                let (first_start, first_end) = prev.unwrap_or((0, cursor));
                return Err(EditError::Overlap {
                    first_start,
                    first_end,
                    second_start: r.span.start,
                    second_end: r.span.end,
                });
            }
            out.push_str(&source[cursor..r.span.start]);
            out.push_str(&r.text);
            cursor = r.span.end;
            prev = Some((r.span.start, r.span.end));
        }
        out.push_str(&source[cursor..]);
        Ok(out)
    }
}

/// Normalizes write-back output to end with exactly one trailing newline.
///
/// Corrected files are rewritten as POSIX text files regardless of how the
/// input ended.
#[must_use]
pub fn normalize_trailing_newline(mut text: String) -> String {
    while text.ends_with('\n') {
        text.pop();
    }
    if text.is_empty() {
        text
    } else {
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn applies_in_ascending_order_regardless_of_push_order() {
        let mut edits = EditSet::new();
        edits.push(Replacement::new(Span::new(8, 8), "\n  "));
        edits.push(Replacement::new(Span::new(0, 4), "each"));
        let out = edits.apply_to("test do foo\nend").expect("apply failed");
        assert_eq!(out, "each do \n  foo\nend");
    }

    #[test]
    fn insert_touching_replacement_boundary_is_allowed() {
        let mut edits = EditSet::new();
        edits.push(Replacement::new(Span::new(0, 4), "x"));
        edits.push(Replacement::insert(4, "y"));
        assert_eq!(edits.apply_to("abcdef").expect("apply failed"), "xyef");
    }

    #[test]
    fn overlap_is_rejected() {
        let mut edits = EditSet::new();
        edits.push(Replacement::new(Span::new(0, 5), "x"));
        edits.push(Replacement::new(Span::new(4, 8), "y"));
        assert!(matches!(
            edits.apply_to("abcdefgh"),
            Err(EditError::Overlap { .. })
        ));
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut edits = EditSet::new();
        edits.push(Replacement::new(Span::new(2, 99), "x"));
        assert!(matches!(
            edits.apply_to("abc"),
            Err(EditError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn trailing_newline_is_normalized() {
        assert_eq!(normalize_trailing_newline("a".into()), "a\n");
        assert_eq!(normalize_trailing_newline("a\n\n\n".into()), "a\n");
        assert_eq!(normalize_trailing_newline(String::new()), "");
    }
}
