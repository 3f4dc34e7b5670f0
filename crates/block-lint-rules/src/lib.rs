//! # block-lint-rules
//!
//! Built-in layout rules for block-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | BL001 | `multiline-block-layout` | Keeps block parameters on the start line and the body on its own lines |
//! | BL002 | `block-end-newline` | Puts the closing delimiter of a multiline block on its own line |
//!
//! ## Usage
//!
//! ```ignore
//! use block_lint_core::Analyzer;
//! use block_lint_rules::{BlockEndNewline, MultilineBlockLayout};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./scripts")
//!     .rule(MultilineBlockLayout::new())
//!     .rule(BlockEndNewline::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Block locator shared by the layout rules.
pub mod block_construct;
mod block_end_newline;
mod multiline_block_layout;
mod presets;

pub use block_construct::{BlockConstruct, DelimiterKind, LocateError, ParamList, ParamShape};
pub use block_end_newline::BlockEndNewline;
pub use multiline_block_layout::MultilineBlockLayout;
pub use presets::{all_rules, default_rules, rules_from_config};

/// Re-export core types for convenience.
pub use block_lint_core::{Offense, Rule, Severity};
