//! Immutable source snapshot with line/column lookup.

use crate::span::Span;

/// Zero-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based byte column within the line.
    pub col: usize,
}

/// An immutable snapshot of one file's text plus a line-start index.
///
/// All detection and correction runs against a single `SourceFile` per pass;
/// edits produce a new string, never a mutation of the snapshot.
#[derive(Debug, Clone)]
pub struct SourceFile {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Creates a snapshot of the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// Returns the full text of the snapshot.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the text covered by `span`.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.start..span.end.min(self.text.len())]
    }

    /// Returns the zero-based line containing the byte at `offset`.
    ///
    /// Offsets at or past the end of the text map to the last line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Returns the zero-based line/column of the byte at `offset`.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = self.line_of(offset);
        LineCol {
            line,
            col: offset - self.line_starts[line],
        }
    }

    /// Returns the byte offset at which `line` (zero-based) starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Returns the width in bytes of the leading whitespace of `line`.
    #[must_use]
    pub fn line_indent(&self, line: usize) -> usize {
        let start = self.line_start(line);
        self.text[start..]
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count()
    }

    /// Returns the number of lines in the snapshot (at least 1).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_lookup() {
        let src = SourceFile::new("line1\nline2\nline3");
        assert_eq!(src.line_col(0), LineCol { line: 0, col: 0 });
        assert_eq!(src.line_col(6), LineCol { line: 1, col: 0 });
        assert_eq!(src.line_col(8), LineCol { line: 1, col: 2 });
        assert_eq!(src.line_of(16), 2);
    }

    #[test]
    fn line_indent_counts_leading_whitespace() {
        let src = SourceFile::new("a\n    b\n\tc\n");
        assert_eq!(src.line_indent(0), 0);
        assert_eq!(src.line_indent(1), 4);
        assert_eq!(src.line_indent(2), 1);
    }

    #[test]
    fn slice_returns_span_text() {
        let src = SourceFile::new("test do foo\nend");
        assert_eq!(src.slice(Span::new(8, 11)), "foo");
    }

    #[test]
    fn offset_past_end_maps_to_last_line() {
        let src = SourceFile::new("ab\ncd");
        assert_eq!(src.line_of(99), 1);
    }
}
