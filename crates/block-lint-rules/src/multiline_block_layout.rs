//! Rule to keep multiline blocks laid out one piece per line region:
//! parameters on the opening-delimiter line, body starting on its own line.
//!
//! # Offenses
//!
//! - Body starting on the opening-delimiter line.
//! - Block parameters off the opening-delimiter line, or spanning multiple
//!   lines internally.
//!
//! Single-physical-line blocks are fine in either delimiter dialect; the
//! rule constrains only genuinely multi-line blocks.
//!
//! # Correction
//!
//! Corrections are computed as one replacement per construct over the
//! frozen snapshot and are idempotent, so this rule composes with
//! `block-end-newline` (which repositions the closing delimiter) in a
//! single fix pass, in either order.
//!
//! # Configuration
//!
//! - `indent_width`: columns per nesting level for a moved body (default: 2)

use crate::block_construct::{BlockConstruct, LocateError};
use block_lint_core::syntax::ast::{visit_calls, CallSite};
use block_lint_core::syntax::parser::ParsedFile;
use block_lint_core::{FileContext, Location, Offense, Replacement, Rule, Severity, Span};

/// Rule code for multiline-block-layout.
pub const CODE: &str = "BL001";

/// Rule name for multiline-block-layout.
pub const NAME: &str = "multiline-block-layout";

const BODY_MSG: &str = "Block body expression is on the same line as the block start.";
const PARAMS_MSG: &str = "Block argument expression is not on the same line as the block start.";

/// Normalizes the layout of multiline block constructs.
#[derive(Debug, Clone)]
pub struct MultilineBlockLayout {
    /// Columns added per nesting level when moving a body to its own line.
    pub indent_width: usize,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MultilineBlockLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl MultilineBlockLayout {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent_width: 2,
            severity: Severity::Warning,
        }
    }

    /// Sets the indentation width for moved body lines.
    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
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
        parsed: &ParsedFile,
        site: &CallSite<'_>,
        construct: &BlockConstruct,
        offenses: &mut Vec<Offense>,
    ) {
        let src = ctx.source;
        let start_line = src.line_of(construct.start_span.start);

        // A fully single-physical-line construct is fine as-is.
        if start_line == src.line_of(construct.end_span.start) {
            return;
        }

        let params_misplaced = construct.params.as_ref().is_some_and(|p| {
            src.line_of(p.span.start) != start_line
                || src.line_of(p.span.end - 1) != src.line_of(p.span.start)
        });
        let body_on_start_line = construct
            .body_span
            .is_some_and(|b| src.line_of(b.start) == start_line);

        if !params_misplaced && !body_on_start_line {
            return;
        }

        // The composite replacement travels on the first offense for the
        // construct so the edit compositor sees exactly one edit per
        // construct.
        let mut correction = self.correction(ctx, parsed, site, construct, params_misplaced);
        if params_misplaced {
            if let Some(params) = &construct.params {
                let mut offense = Offense::new(
                    CODE,
                    NAME,
                    self.severity,
                    Location::from_span(ctx.relative_path.clone(), src, params.span),
                    PARAMS_MSG,
                );
                if let Some(fix) = correction.take() {
                    offense = offense.with_correction(fix);
                }
                offenses.push(offense);
            }
        }
        if body_on_start_line {
            if let Some(body_span) = construct.body_span {
                let mut offense = Offense::new(
                    CODE,
                    NAME,
                    self.severity,
                    Location::from_span(ctx.relative_path.clone(), src, body_span),
                    BODY_MSG,
                );
                if let Some(fix) = correction.take() {
                    offense = offense.with_correction(fix);
                }
                offenses.push(offense);
            }
        }
    }

    /// Computes the single replacement that makes both checks pass.
    fn correction(
        &self,
        ctx: &FileContext<'_>,
        parsed: &ParsedFile,
        site: &CallSite<'_>,
        construct: &BlockConstruct,
        params_misplaced: bool,
    ) -> Option<Replacement> {
        let src = ctx.source;

        if params_misplaced {
            let params = construct.params.as_ref()?;
            let rendered = format!(" {}", params.render(src));

            // Re-apply the body rule against the original coordinates: a
            // body that trailed the parameter list moves onto its own line
            // as part of the same replacement.
            let body_trails_params = construct.body_span.is_some_and(|b| {
                src.line_of(b.start) == src.line_of(params.span.end - 1)
            });
            if body_trails_params {
                let body = construct.body_span?;
                let indent = self.body_indent(ctx, parsed, site, construct);
                return Some(Replacement::new(
                    Span::new(construct.start_span.end, body.start),
                    format!("{rendered}\n{}", " ".repeat(indent)),
                ));
            }
            return Some(Replacement::new(
                Span::new(construct.start_span.end, params.span.end),
                rendered,
            ));
        }

        let body = construct.body_span?;
        let indent = self.body_indent(ctx, parsed, site, construct);
        Some(Replacement::insert(
            body.start,
            format!("\n{}", " ".repeat(indent)),
        ))
    }

    /// Indentation column for a body moved onto its own line.
    fn body_indent(
        &self,
        ctx: &FileContext<'_>,
        parsed: &ParsedFile,
        site: &CallSite<'_>,
        construct: &BlockConstruct,
    ) -> usize {
        let src = ctx.source;
        let start_line = src.line_of(construct.start_span.start);

        // A block whose owning expression is the right-hand side of a
        // same-line assignment keeps the body visually aligned with the
        // delimiter rather than the statement's indentation.
        if let Some(assign_id) = site.assigned_from {
            let assign = parsed.node_span(assign_id);
            if src.line_of(assign.start) == start_line {
                return src.line_col(construct.start_span.start).col
                    + construct.delimiter.open_len();
            }
        }

        let call_line = src.line_of(construct.call_span.start);
        src.line_indent(call_line) + self.indent_width
    }
}

impl Rule for MultilineBlockLayout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Keeps block parameters on the start line and the body on its own lines"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, parsed: &ParsedFile) -> Vec<Offense> {
        let mut offenses = Vec::new();
        visit_calls(&parsed.program, &mut |site| {
            match BlockConstruct::locate(&site, parsed) {
                Ok(construct) => {
                    self.check_construct(ctx, parsed, &site, &construct, &mut offenses);
                }
                Err(LocateError::NotABlock) => {}
                Err(LocateError::MalformedConstruct { reason }) => {
                    // Skipped entirely: no offense, no edit. A failure on
                    // one construct never aborts the rest of the file.
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
