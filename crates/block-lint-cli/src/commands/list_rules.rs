//! List rules command implementation.

use block_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  block-lint check --rules multiline-block-layout");
    println!("  block-lint check --rules BL001,BL002");
    println!("\nUse --fix to apply corrections in place:");
    println!("  block-lint check --fix scripts/");
}
