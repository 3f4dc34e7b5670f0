//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::edit::{normalize_trailing_newline, EditError, EditSet};
use crate::rule::{FileContext, Rule, RuleBox};
use crate::source::SourceFile;
use crate::syntax::parser::parse;
use crate::types::{LintResult, Offense};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on fix passes per file. Idempotent corrections converge
/// after one pass; the cap guards against a rule that keeps emitting edits.
const MAX_FIX_PASSES: usize = 10;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error in include/exclude configuration.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Error walking the analysis root.
    #[error("File discovery error: {0}")]
    Walk(#[from] ignore::Error),

    /// A rule emitted conflicting edits for one file.
    #[error("Conflicting edits in {path}: {source}")]
    Edit {
        /// File the edits were computed for.
        path: PathBuf,
        /// The compositor's rejection.
        source: EditError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.clone());

        let mut include_patterns = self.include_patterns;
        if include_patterns.is_empty() {
            include_patterns.extend(config.analyzer.include.clone());
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            include_patterns,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the offenses found.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or on parse errors when
    /// `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        self.run(false)
    }

    /// Analyzes all files, applies corrections, and writes fixed files back.
    ///
    /// Reported offenses are those detected before fixing; offenses whose
    /// constructs were rewritten are flagged `corrected`.
    ///
    /// # Errors
    ///
    /// As [`Self::analyze`], plus IO errors writing corrected files and
    /// [`AnalyzerError::Edit`] when a rule emits conflicting edits.
    pub fn analyze_and_fix(&self) -> Result<LintResult, AnalyzerError> {
        self.run(true)
    }

    fn run(&self, fix: bool) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            match self.process_file(file_path, fix) {
                Ok(outcome) => {
                    result.offenses.extend(outcome.offenses);
                    result.files_checked += 1;
                    if outcome.rewritten {
                        result.files_corrected += 1;
                    }
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} offenses in {} files",
            result.offenses.len(),
            result.files_checked
        );

        Ok(result)
    }

    fn process_file(&self, path: &Path, fix: bool) -> Result<FileOutcome, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let mut source = SourceFile::new(content);
        let mut offenses = self.check_snapshot(path, &source)?;

        if !fix || offenses.iter().all(|o| o.correction.is_none()) {
            return Ok(FileOutcome {
                offenses,
                rewritten: false,
            });
        }

        // Correction loop over successive frozen snapshots. Every range in
        // one pass is computed before any edit of that pass is applied.
        let mut pass = 0;
        let mut pending: Vec<Offense> = offenses.clone();
        loop {
            let mut edits = EditSet::new();
            for offense in &pending {
                if let Some(correction) = &offense.correction {
                    edits.push(correction.clone());
                }
            }
            if edits.is_empty() {
                break;
            }

            let next = edits
                .apply_to(source.text())
                .map_err(|source| AnalyzerError::Edit {
                    path: path.to_path_buf(),
                    source,
                })?;
            source = SourceFile::new(next);

            pass += 1;
            if pass >= MAX_FIX_PASSES {
                warn!(
                    "Fix passes did not converge for {} after {} rounds",
                    path.display(),
                    MAX_FIX_PASSES
                );
                break;
            }
            pending = self.check_snapshot(path, &source)?;
        }

        let clean = pending.is_empty();
        for offense in &mut offenses {
            // A correction-less offense can still be fixed by its
            // construct's composite edit; converging to a clean file is the
            // reliable signal for those.
            offense.corrected = offense.correction.is_some() || clean;
        }

        std::fs::write(path, normalize_trailing_newline(source.text().to_string()))?;
        debug!("Rewrote {}", path.display());

        Ok(FileOutcome {
            offenses,
            rewritten: true,
        })
    }

    /// Parses one snapshot and runs all enabled rules over it.
    fn check_snapshot(
        &self,
        path: &Path,
        source: &SourceFile,
    ) -> Result<Vec<Offense>, AnalyzerError> {
        let parsed = parse(source.text()).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let ctx = FileContext::new(path, source, &self.root);
        let mut offenses = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let mut rule_offenses = rule.check(&ctx, &parsed);
            if let Some(severity) = self.config.rule_severity(rule.name()) {
                for o in &mut rule_offenses {
                    o.severity = severity;
                }
            }
            offenses.extend(rule_offenses);
        }

        Ok(offenses)
    }

    /// Discovers all files to analyze under the root.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut includes = Vec::new();
        for pattern in &self.include_patterns {
            includes.push(glob::Pattern::new(pattern)?);
            // "**/" in the glob crate needs at least the separator, so a
            // bare "**/*.blk" would miss files sitting directly in the
            // root; compile the suffix as a second chance.
            if let Some(suffix) = pattern.strip_prefix("**/") {
                includes.push(glob::Pattern::new(suffix)?);
            }
        }

        let mut files = Vec::new();
        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_global(self.config.analyzer.respect_gitignore)
            .build();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);

            if !includes.iter().any(|p| p.matches_path(relative)) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/generated/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

struct FileOutcome {
    offenses: Vec<Offense>,
    rewritten: bool,
}
