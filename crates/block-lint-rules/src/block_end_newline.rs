//! Rule to put the closing delimiter of a multiline block on its own line.
//!
//! The companion of `multiline-block-layout`: that rule never touches the
//! closing delimiter, this one touches nothing else. Both correct
//! idempotently against the same frozen snapshot, and their replacement
//! ranges cannot overlap, so a single fix pass settles a construct
//! violating both.

use crate::block_construct::{BlockConstruct, LocateError};
use block_lint_core::syntax::ast::visit_calls;
use block_lint_core::syntax::parser::ParsedFile;
use block_lint_core::{FileContext, Location, Offense, Replacement, Rule, Severity, Span};

/// Rule code for block-end-newline.
pub const CODE: &str = "BL002";

/// Rule name for block-end-newline.
pub const NAME: &str = "block-end-newline";

const MSG: &str = "Block closing delimiter is not on its own line.";

/// Moves the closing delimiter of a multiline block onto its own line.
#[derive(Debug, Clone)]
pub struct BlockEndNewline {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for BlockEndNewline {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEndNewline {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn check_construct(
        &self,
        ctx: &FileContext<'_>,
        construct: &BlockConstruct,
        offenses: &mut Vec<Offense>,
    ) {
        let src = ctx.source;
        let start_line = src.line_of(construct.start_span.start);
        let end_line = src.line_of(construct.end_span.start);

        // Single-physical-line constructs are fine as-is.
        if start_line == end_line {
            return;
        }

        let line_start = src.line_start(end_line);
        let before = &src.text()[line_start..construct.end_span.start];
        if before.trim().is_empty() {
            return;
        }

        // Swallow the horizontal whitespace run directly before the
        // delimiter and land it on a fresh line at the construct's base
        // indentation.
        let trailing_ws = before
            .bytes()
            .rev()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        let indent = src.line_indent(src.line_of(construct.call_span.start));
        let fix = Replacement::new(
            Span::new(construct.end_span.start - trailing_ws, construct.end_span.start),
            format!("\n{}", " ".repeat(indent)),
        );

        offenses.push(
            Offense::new(
                CODE,
                NAME,
                self.severity,
                Location::from_span(ctx.relative_path.clone(), src, construct.end_span),
                MSG,
            )
            .with_correction(fix),
        );
    }
}

impl Rule for BlockEndNewline {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Puts the closing delimiter of a multiline block on its own line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, parsed: &ParsedFile) -> Vec<Offense> {
        let mut offenses = Vec::new();
        visit_calls(&parsed.program, &mut |site| {
            match BlockConstruct::locate(&site, parsed) {
                Ok(construct) => self.check_construct(ctx, &construct, &mut offenses),
                Err(LocateError::NotABlock) => {}
                Err(LocateError::MalformedConstruct { reason }) => {
                    tracing::debug!(
                        "Skipping malformed block in {}: {}",
                        ctx.relative_path.display(),
                        reason
                    );
                }
            }
        });
        offenses
    }
}
