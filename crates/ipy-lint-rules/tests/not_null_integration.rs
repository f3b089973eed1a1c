//! Integration test: the not-null convention end-to-end via Analyzer.
//!
//! Uses the fixture model under `tests/fixtures/` to verify that the full
//! JSON → symbol model → Rule → Analyzer pipeline reports exactly the
//! expected findings.

use ipy_lint_core::{Analyzer, Config, Severity, SymbolModel};
use ipy_lint_rules::{all_rules, NotNullConvention};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn analyze_with(config: Config) -> ipy_lint_core::LintResult {
    let mut builder = Analyzer::builder().root(fixture_root()).config(config);
    for rule in all_rules() {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().expect("analyzer should build");
    analyzer.analyze().expect("analysis should succeed")
}

// ── Happy-path: detects expected violations ──

#[test]
fn reports_only_convention_breaks() {
    let result = analyze_with(Config::default());

    let found: Vec<(&str, Option<&str>, usize)> = result
        .violations
        .iter()
        .map(|v| (v.code.as_str(), v.symbol.as_deref(), v.location.line))
        .collect();
    assert_eq!(
        found,
        vec![
            ("IPY01", Some("s"), 10),
            ("IPY02", Some("s"), 20),
            ("IPY01", Some("name"), 40),
        ],
        "unexpected findings: {:#?}",
        result.violations
    );
    assert_eq!(result.files_checked, 1);
    // Neither the generated binding nor the members of the generated type
    // are handed to the rule.
    assert_eq!(result.methods_checked, 8);
}

#[test]
fn findings_carry_exact_parameter_span_and_message() {
    let result = analyze_with(Config::default());
    let first = &result.violations[0];

    assert_eq!(
        first.location.file,
        PathBuf::from("IronPython.Modules/scenarios.cs")
    );
    assert_eq!((first.location.offset, first.location.length), (240, 8));
    assert_eq!(first.severity, Severity::Warning);
    assert_eq!(first.rule, "missing-not-null");
    insta::assert_snapshot!(
        first.to_string(),
        @"IronPython.Modules/scenarios.cs:10:36: warning [IPY01] Parameter 's' does not have the NotNullAttribute"
    );
}

#[test]
fn default_run_does_not_fail_the_build() {
    let config = Config::default();
    let result = analyze_with(config.clone());
    assert!(result.has_warnings());
    assert!(!result.has_violations_at(config.fail_threshold()));
}

// ── Configuration ──

#[test]
fn disabled_code_is_dropped() {
    let config = Config::parse("[rules.IPY02]\nenabled = false\n").expect("config should parse");
    let result = analyze_with(config);
    assert!(result.violations.iter().all(|v| v.code == "IPY01"));
    assert_eq!(result.violations.len(), 2);
}

#[test]
fn severity_override_by_rule_name() {
    let config = Config::parse("[rules.missing-not-null]\nseverity = \"error\"\n")
        .expect("config should parse");
    let result = analyze_with(config);
    assert_eq!(result.by_severity(Severity::Error).len(), 2);
    assert_eq!(result.by_code("IPY02")[0].severity, Severity::Warning);
    assert!(result.has_errors());
}

#[test]
fn both_codes_disabled_skips_the_rule() {
    let config = Config::parse("[rules.IPY01]\nenabled = false\n[rules.IPY02]\nenabled = false\n")
        .expect("config should parse");
    let result = analyze_with(config);
    assert!(result.violations.is_empty());
    assert_eq!(result.methods_checked, 0);
}

// ── Determinism ──

#[test]
fn in_memory_analysis_is_idempotent() {
    let content = std::fs::read_to_string(fixture_root().join("modules.symbols.json"))
        .expect("fixture should exist");
    let model = SymbolModel::from_json(&content).expect("fixture should parse");
    let analyzer = Analyzer::builder()
        .root(fixture_root())
        .rule(NotNullConvention::new())
        .build()
        .expect("analyzer should build");

    let path = fixture_root().join("modules.symbols.json");
    let first = analyzer.analyze_model(&path, &model);
    let second = analyzer.analyze_model(&path, &model);
    assert_eq!(first.violations, second.violations);
    assert_eq!(first.violations.len(), 3);
}
