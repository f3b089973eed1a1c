//! List rules command implementation.

use ipy_lint_rules::catalog;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<20} {:<8} {:<9} Title",
        "Code", "Name", "Category", "Severity"
    );
    println!("{}", "-".repeat(100));

    for descriptor in catalog() {
        println!(
            "{:<7} {:<20} {:<8} {:<9} {}",
            descriptor.code,
            descriptor.name,
            descriptor.category,
            descriptor.default_severity.to_string(),
            descriptor.title
        );
        println!("{:<47} {}", "", descriptor.description);
    }

    println!("\nUse --rules to report only specific rules, e.g.:");
    println!("  ipy-lint check --rules missing-not-null");
    println!("  ipy-lint check --rules IPY02");
}
