//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# block-lint configuration

# Severity threshold for a failing exit code (default: "warning")
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./scripts"

# Glob patterns selecting files to analyze
include = ["**/*.blk"]

# Glob patterns to exclude from analysis
exclude = [
    "**/generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.multiline-block-layout]
enabled = true
# severity = "error"  # Override default severity
# indent_width = 2    # Columns per nesting level for moved body lines

[rules.block-end-newline]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("block-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created block-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit block-lint.toml to configure rules");
    println!("  2. Run: block-lint check");

    Ok(())
}
