//! Rule registry and config-driven construction.

use crate::{BlockEndNewline, MultilineBlockLayout};
use block_lint_core::{Config, RuleBox};

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MultilineBlockLayout::new()),
        Box::new(BlockEndNewline::new()),
    ]
}

/// Returns the default rule set.
///
/// Both layout rules ship enabled; disabling happens per rule in
/// configuration.
#[must_use]
pub fn default_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Builds the rule set with options taken from `config`.
///
/// Currently the only rule-specific option is
/// `[rules.multiline-block-layout] indent_width` (default: 2). Enablement
/// and severity overrides are the analyzer's job, not this function's.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let mut layout = MultilineBlockLayout::new();
    if let Some(rule_config) = config.rules.get(crate::multiline_block_layout::NAME) {
        let width = rule_config.get_int("indent_width", 2);
        layout = layout.indent_width(usize::try_from(width).unwrap_or(2));
    }

    vec![Box::new(layout), Box::new(BlockEndNewline::new())]
}
