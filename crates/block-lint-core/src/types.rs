//! Core types for lint offenses and results.

use crate::source::SourceFile;
use crate::span::Span;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint offenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location of an offense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte span of the offending range.
    pub span: Span,
}

impl Location {
    /// Creates a location for `span` inside `source`.
    #[must_use]
    pub fn from_span(file: PathBuf, source: &SourceFile, span: Span) -> Self {
        let pos = source.line_col(span.start);
        Self {
            file,
            line: pos.line + 1,
            column: pos.col + 1,
            span,
        }
    }
}

/// An automatic text edit: replace `span` with `text`.
///
/// Replacements emitted for one file in one pass never overlap; the edit
/// compositor rejects sets that do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Byte range to replace; zero-width for pure insertions.
    pub span: Span,
    /// Replacement text.
    pub text: String,
}

impl Replacement {
    /// Creates a replacement of `span` with `text`.
    #[must_use]
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates a pure insertion at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(Span::empty(offset), text)
    }
}

/// A layout offense found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offense {
    /// Rule code (e.g., "BL001").
    pub code: String,
    /// Rule name (e.g., "multiline-block-layout").
    pub rule: String,
    /// Severity of this offense.
    pub severity: Severity,
    /// Primary location of the offense.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// The edit that fixes this offense, when the rule computed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<Replacement>,
    /// Whether the correction was applied by a fix run.
    #[serde(default)]
    pub corrected: bool,
}

impl Offense {
    /// Creates a new offense without a correction.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            correction: None,
            corrected: false,
        }
    }

    /// Attaches a correction to this offense.
    #[must_use]
    pub fn with_correction(mut self, correction: Replacement) -> Self {
        self.correction = Some(correction);
        self
    }

    /// Formats the offense for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if self.corrected {
            let _ = writeln!(output, "  = corrected");
        } else if self.correction.is_some() {
            let _ = writeln!(output, "  = help: run with --fix to correct automatically");
        }
        output
    }
}

impl std::fmt::Display for Offense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )?;
        if self.corrected {
            write!(f, " [Corrected]")?;
        }
        Ok(())
    }
}

/// Converts an Offense to a miette Diagnostic for rich error display.
#[allow(dead_code)] // Public API for miette integration
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct OffenseDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Offense> for OffenseDiagnostic {
    fn from(o: &Offense) -> Self {
        Self {
            message: format!("[{}] {}", o.code, o.message),
            help: o
                .correction
                .as_ref()
                .map(|_| "run with --fix to correct automatically".to_string()),
            span: SourceSpan::from((o.location.span.start, o.location.span.len())),
            label_message: o.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All offenses found.
    pub offenses: Vec<Offense>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files rewritten by a fix run.
    pub files_corrected: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any uncorrected errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.offenses
            .iter()
            .any(|o| o.severity == Severity::Error && !o.corrected)
    }

    /// Counts offenses by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let errors = self
            .offenses
            .iter()
            .filter(|o| o.severity == Severity::Error)
            .count();
        let warnings = self
            .offenses
            .iter()
            .filter(|o| o.severity == Severity::Warning)
            .count();
        let infos = self
            .offenses
            .iter()
            .filter(|o| o.severity == Severity::Info)
            .count();
        (errors, warnings, infos)
    }

    /// Checks if any offenses meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_offenses_at(&self, severity: Severity) -> bool {
        self.offenses.iter().any(|o| o.severity >= severity)
    }

    /// Checks if any *uncorrected* offenses meet or exceed the threshold.
    ///
    /// This is the exit-code condition: offenses a fix run already applied
    /// should not fail the invocation that fixed them.
    #[must_use]
    pub fn fails_at(&self, severity: Severity) -> bool {
        self.offenses
            .iter()
            .any(|o| !o.corrected && o.severity >= severity)
    }

    /// Adds offenses from another result.
    pub fn extend(&mut self, other: Self) {
        self.offenses.extend(other.offenses);
        self.files_checked += other.files_checked;
        self.files_corrected += other.files_corrected;
    }

    /// Sorts offenses by file, then line, then column.
    pub fn sort(&mut self) {
        self.offenses.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offense(severity: Severity) -> Offense {
        let source = SourceFile::new("test do foo\nend");
        Offense::new(
            "BL001",
            "multiline-block-layout",
            severity,
            Location::from_span(PathBuf::from("script.blk"), &source, Span::new(8, 11)),
            "Block body expression is on the same line as the block start.",
        )
    }

    #[test]
    fn location_is_one_indexed() {
        let o = make_offense(Severity::Error);
        assert_eq!(o.location.line, 1);
        assert_eq!(o.location.column, 9);
    }

    #[test]
    fn display_marks_corrected_offenses() {
        let mut o = make_offense(Severity::Error);
        o.corrected = true;
        assert!(format!("{o}").ends_with("[Corrected]"));
    }

    #[test]
    fn format_mentions_fix_when_correction_present() {
        let o = make_offense(Severity::Error).with_correction(Replacement::insert(8, "\n  "));
        assert!(o.format().contains("--fix"));
    }

    #[test]
    fn corrected_errors_do_not_fail_lint() {
        let mut result = LintResult::new();
        let mut o = make_offense(Severity::Error);
        o.corrected = true;
        result.offenses.push(o);
        assert!(!result.has_errors());
        assert!(result.has_offenses_at(Severity::Error));
    }

    #[test]
    fn sort_orders_by_position() {
        let mut result = LintResult::new();
        let source = SourceFile::new("a\nb\nc\n");
        for offset in [4, 0, 2] {
            result.offenses.push(Offense::new(
                "BL001",
                "multiline-block-layout",
                Severity::Error,
                Location::from_span(
                    PathBuf::from("script.blk"),
                    &source,
                    Span::new(offset, offset + 1),
                ),
                "message",
            ));
        }
        result.sort();
        let lines: Vec<usize> = result.offenses.iter().map(|o| o.location.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }
}
