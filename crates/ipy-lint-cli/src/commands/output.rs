//! Shared output formatting for lint results.

use anyhow::Result;
use ipy_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is used to find source files for the rich format.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Rich => print_rich(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, _) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{}{}\x1b[0m", summary_color, result.summary());
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_rich(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        match read_source(violation, root) {
            Some(source) => {
                let report = Report::new(ViolationDiagnostic::from(violation)).with_source_code(
                    NamedSource::new(violation.location.file.display().to_string(), source),
                );
                println!("{report:?}");
            }
            None => {
                tracing::debug!(
                    "Source not found for {}, falling back to text",
                    violation.location.file.display()
                );
                println!("{}", violation.format());
            }
        }
    }

    print_summary(result);
}

/// Reads the source a violation points into, relative to `root` first.
fn read_source(violation: &Violation, root: &Path) -> Option<String> {
    let file = &violation.location.file;
    std::fs::read_to_string(root.join(file))
        .or_else(|_| std::fs::read_to_string(file))
        .ok()
}
