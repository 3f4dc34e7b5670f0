//! Check command implementation.

use anyhow::{Context, Result};
use block_lint_core::{Analyzer, Config, RuleBox};
use block_lint_rules::rules_from_config;
use std::path::Path;

use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    fix: bool,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    strict: bool,
    source: &crate::config_resolver::ConfigSource,
) -> Result<()> {
    let config = match source {
        crate::config_resolver::ConfigSource::Default => Config::default(),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    let fail_threshold = config.fail_threshold();

    // Build analyzer
    let mut builder = Analyzer::builder()
        .root(path)
        .config(config.clone())
        .fail_on_parse_error(strict);

    // Add exclude patterns
    for pattern in exclude {
        builder = builder.exclude(pattern);
    }

    // Add rules based on filter
    let rules_to_add = if let Some(filter) = rules_filter {
        let rule_names: Vec<&str> = filter.split(',').map(str::trim).collect();
        filter_rules(&rule_names, &config)
    } else {
        rules_from_config(&config)
    };

    for rule in rules_to_add {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = if fix {
        analyzer.analyze_and_fix().context("Fix run failed")?
    } else {
        analyzer.analyze().context("Analysis failed")?
    };

    // Output results
    super::output::print(&result, format)?;

    // Exit with error code when uncorrected offenses reach the threshold
    if result.fails_at(fail_threshold) {
        std::process::exit(1);
    }

    Ok(())
}

/// Maps user-supplied names or codes onto the configured rule set.
fn filter_rules(names: &[&str], config: &Config) -> Vec<RuleBox> {
    let mut wanted = Vec::new();
    for name in names {
        match *name {
            "multiline-block-layout" | "BL001" => wanted.push("BL001"),
            "block-end-newline" | "BL002" => wanted.push("BL002"),
            unknown => tracing::warn!("Unknown rule: {unknown}"),
        }
    }

    if wanted.is_empty() {
        tracing::warn!("No valid rules specified, using defaults");
        return rules_from_config(config);
    }

    rules_from_config(config)
        .into_iter()
        .filter(|r| wanted.contains(&r.code()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_names_and_codes() {
        let config = Config::default();
        let one = filter_rules(&["multiline-block-layout"], &config);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].code(), "BL001");
        assert_eq!(filter_rules(&["BL001", "BL002"], &config).len(), 2);
    }

    #[test]
    fn unknown_filter_falls_back_to_defaults() {
        let config = Config::default();
        assert_eq!(filter_rules(&["no-such-rule"], &config).len(), 2);
    }
}
