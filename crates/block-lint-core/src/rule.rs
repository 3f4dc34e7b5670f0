//! Rule trait and per-file context for lint rules.

use crate::source::SourceFile;
use crate::syntax::parser::ParsedFile;
use crate::types::{Offense, Severity};
use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Holds the frozen source snapshot rules read positions from. Detection and
/// correction are pure functions over this context; nothing in it is mutated
/// during a pass.
#[derive(Debug)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Path relative to the analysis root.
    pub relative_path: PathBuf,
    /// The source snapshot for this pass.
    pub source: &'a SourceFile,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, source: &'a SourceFile, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        Self {
            path,
            relative_path,
            source,
        }
    }
}

/// A per-file lint rule over the parsed block dialect.
///
/// Implement this trait to create rules that analyze individual files.
/// Rules receive the frozen [`FileContext`] and the [`ParsedFile`] side
/// tables and report offenses, each optionally carrying its correction.
///
/// # Example
///
/// ```ignore
/// use block_lint_core::{FileContext, Offense, Rule, Severity};
/// use block_lint_core::syntax::parser::ParsedFile;
///
/// pub struct NoEmptyBlocks;
///
/// impl Rule for NoEmptyBlocks {
///     fn name(&self) -> &'static str { "no-empty-blocks" }
///     fn code(&self) -> &'static str { "BL900" }
///
///     fn check(&self, ctx: &FileContext, parsed: &ParsedFile) -> Vec<Offense> {
///         // walk parsed.program, push offenses
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "multiline-block-layout").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "BL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for offenses from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Checks a single file and returns any offenses found.
    ///
    /// Corrections attached to the returned offenses must be idempotent:
    /// re-running the rule over the corrected text must report nothing for
    /// the same construct. The analyzer relies on this to compose rules
    /// that move the same delimiters without entering an edit loop.
    fn check(&self, ctx: &FileContext, parsed: &ParsedFile) -> Vec<Offense>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;
    use crate::types::Location;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, ctx: &FileContext, _parsed: &ParsedFile) -> Vec<Offense> {
            vec![Offense::new(
                self.code(),
                self.name(),
                self.default_severity(),
                Location::from_span(
                    ctx.relative_path.clone(),
                    ctx.source,
                    crate::span::Span::new(0, 1),
                ),
                "Test offense",
            )]
        }
    }

    #[test]
    fn rule_trait_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Warning);
    }

    #[test]
    fn relative_path_strips_root() {
        let source = SourceFile::new("foo\n");
        let ctx = FileContext::new(
            Path::new("/proj/scripts/a.blk"),
            &source,
            Path::new("/proj"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("scripts/a.blk"));
        let parsed = parse(source.text()).expect("parse failed");
        assert_eq!(TestRule.check(&ctx, &parsed).len(), 1);
    }
}
