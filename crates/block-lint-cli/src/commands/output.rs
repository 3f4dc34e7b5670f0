//! Shared output formatting for lint results.

use anyhow::Result;
use block_lint_core::{LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for offense in &result.offenses {
        let severity_indicator = match offense.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            offense.code,
            offense.rule,
            offense.location.file.display(),
            offense.location.line,
            offense.location.column,
        );
        println!("  {}: {}", severity_indicator, offense.message);
        if offense.corrected {
            println!("  = corrected");
        } else if offense.correction.is_some() {
            println!("  = help: run with --fix to correct automatically");
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    print!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)",
        summary_color, errors, warnings, infos, result.files_checked
    );
    if result.files_corrected > 0 {
        print!(", corrected {} file(s)", result.files_corrected);
    }
    println!("\x1b[0m");
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for offense in &result.offenses {
        println!("{offense}");
    }
}
