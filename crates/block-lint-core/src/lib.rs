//! # block-lint-core
//!
//! Core framework for layout linting of the block dialect.
//!
//! This crate provides the foundational pieces rules are built from:
//!
//! - the source model: [`SourceFile`] snapshots, [`Span`]s, and the
//!   [`syntax`] lexer/parser with its token and node-span side tables
//! - [`Rule`] trait for per-file rules
//! - [`Offense`] / [`Replacement`] for representing findings and fixes
//! - [`EditSet`] for composing conflict-free per-file edits
//! - [`Analyzer`] for orchestrating lint execution and fix application
//!
//! ## Example
//!
//! ```ignore
//! use block_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./scripts")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod edit;
mod rule;
mod source;
mod span;
mod types;

/// Source model modules for the block dialect.
pub mod syntax;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use edit::{normalize_trailing_newline, EditError, EditSet};
pub use rule::{FileContext, Rule, RuleBox};
pub use source::{LineCol, SourceFile};
pub use span::Span;
pub use types::{LintResult, Location, Offense, OffenseDiagnostic, Replacement, Severity};
