//! End-to-end correction behavior through the analyzer: detection, fix
//! application, write-back, idempotence, and composition of the two layout
//! rules.

use block_lint_core::{Analyzer, Config, LintResult, Severity};
use block_lint_rules::{default_rules, BlockEndNewline, MultilineBlockLayout};
use std::path::Path;

fn write_script(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write failed");
    path
}

fn fix_in_place(dir: &Path, rules_reversed: bool) -> LintResult {
    let mut builder = Analyzer::builder().root(dir);
    if rules_reversed {
        builder = builder.rule(BlockEndNewline::new()).rule(MultilineBlockLayout::new());
    } else {
        for rule in default_rules() {
            builder = builder.rule_box(rule);
        }
    }
    let analyzer = builder.build().expect("build failed");
    analyzer.analyze_and_fix().expect("fix run failed")
}

#[test]
fn corrects_canonical_layouts_on_disk() {
    let cases = [
        ("body.blk", "test do foo\nend", "test do \n  foo\nend\n"),
        (
            "params.blk",
            "test do\n  |x| play_with(x)\nend",
            "test do |x|\n  play_with(x)\nend\n",
        ),
        (
            "multiline_params.blk",
            "test do |x,\n  y| play_with(x, y)\nend",
            "test do |x, y|\n  play_with(x, y)\nend\n",
        ),
        (
            "lambda.blk",
            "x = -> (y) { foo\n  bar\n}",
            "x = -> (y) { \n            foo\n  bar\n}\n",
        ),
        ("empty_body.blk", "test do |x,\n  y|\nend", "test do |x, y|\nend\n"),
    ];

    let dir = tempfile::tempdir().expect("tempdir failed");
    let mut paths = Vec::new();
    for (name, input, _) in &cases {
        paths.push(write_script(dir.path(), name, input));
    }

    let result = fix_in_place(dir.path(), false);
    assert_eq!(result.files_checked, cases.len());
    assert_eq!(result.files_corrected, cases.len());
    assert!(result.offenses.iter().all(|o| o.corrected));

    for ((_, _, expected), path) in cases.iter().zip(&paths) {
        let fixed = std::fs::read_to_string(path).expect("read failed");
        assert_eq!(&fixed, expected, "unexpected correction in {path:?}");
    }

    // Idempotence: a second run over corrected files reports nothing.
    let second = fix_in_place(dir.path(), false);
    assert!(second.offenses.is_empty());
    assert_eq!(second.files_corrected, 0);
}

#[test]
fn both_rules_settle_a_construct_in_one_pass_in_either_order() {
    let input = "test do foo\n  bar end";
    let expected = "test do \n  foo\n  bar\nend\n";

    for reversed in [false, true] {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let path = write_script(dir.path(), "combo.blk", input);

        let result = fix_in_place(dir.path(), reversed);
        assert_eq!(result.files_corrected, 1);
        assert_eq!(
            std::fs::read_to_string(&path).expect("read failed"),
            expected,
            "registration order changed the outcome (reversed = {reversed})"
        );
    }
}

#[test]
fn malformed_construct_does_not_block_its_siblings() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = write_script(
        dir.path(),
        "mixed.blk",
        "bad do broken\n}\ntest do foo\nend",
    );

    let result = fix_in_place(dir.path(), false);
    assert_eq!(result.offenses.len(), 1);

    let fixed = std::fs::read_to_string(&path).expect("read failed");
    assert!(fixed.contains("test do \n  foo\nend"));
    // The malformed construct is left untouched.
    assert!(fixed.starts_with("bad do broken\n}"));
}

#[test]
fn check_without_fix_leaves_files_alone() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let input = "test do foo\nend";
    let path = write_script(dir.path(), "readonly.blk", input);

    let mut builder = Analyzer::builder().root(dir.path());
    for rule in default_rules() {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().expect("build failed");
    let result = analyzer.analyze().expect("analyze failed");

    assert_eq!(result.offenses.len(), 1);
    assert!(!result.offenses[0].corrected);
    assert!(result.offenses[0].correction.is_some());
    assert_eq!(std::fs::read_to_string(&path).expect("read failed"), input);
}

#[test]
fn config_controls_indent_width_and_enablement() {
    let config = Config::parse(
        r#"
[rules.multiline-block-layout]
indent_width = 4

[rules.block-end-newline]
enabled = false
"#,
    )
    .expect("config parse failed");

    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = write_script(dir.path(), "wide.blk", "test do foo\n  bar end");

    let mut builder = Analyzer::builder().root(dir.path()).config(config.clone());
    for rule in block_lint_rules::rules_from_config(&config) {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().expect("build failed");
    let result = analyzer.analyze_and_fix().expect("fix run failed");

    // block-end-newline disabled: only the body offense fires, indented by 4.
    assert_eq!(result.offenses.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&path).expect("read failed"),
        "test do \n    foo\n  bar end\n"
    );
}

#[test]
fn severity_override_applies_to_reported_offenses() {
    let config = Config::parse("[rules.multiline-block-layout]\nseverity = \"error\"\n")
        .expect("config parse failed");

    let dir = tempfile::tempdir().expect("tempdir failed");
    write_script(dir.path(), "sev.blk", "test do foo\nend");

    let mut builder = Analyzer::builder().root(dir.path()).config(config);
    for rule in default_rules() {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().expect("build failed");
    let result = analyzer.analyze().expect("analyze failed");

    assert_eq!(result.offenses.len(), 1);
    assert_eq!(result.offenses[0].severity, Severity::Error);
    assert!(result.fails_at(Severity::Error));
}
