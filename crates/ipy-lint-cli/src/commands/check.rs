//! Check command implementation.

use anyhow::{Context, Result};
use ipy_lint_core::{Analyzer, Config};
use ipy_lint_rules::{all_rules, catalog, find_descriptor};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command beyond the path.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule codes or names to report.
    pub rules_filter: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Fail on malformed symbol models.
    pub strict: bool,
}

/// Runs the check command.
///
/// Without `path`, the `[analyzer] root` of the config is analyzed. A
/// relative root is taken relative to the config file.
///
/// Returns `true` when any violation reaches the configured `fail_on`
/// severity.
pub fn run(path: Option<&Path>, options: CheckOptions, source: &ConfigSource) -> Result<bool> {
    let mut config = match source {
        ConfigSource::Default => Config::default(),
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

    if let Some(filter) = options.rules_filter {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        restrict_to(&mut config, &names);
    }

    let fail_on = config.fail_threshold();

    match path {
        Some(path) => config.analyzer.root = path.to_path_buf(),
        None => {
            if let Some(dir) = source.path().and_then(Path::parent) {
                if config.analyzer.root.is_relative() {
                    config.analyzer.root = dir.join(&config.analyzer.root);
                }
            }
        }
    }

    let mut builder = Analyzer::builder()
        .config(config)
        .fail_on_parse_error(options.strict)
        .excludes(options.exclude);

    for rule in all_rules() {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {:?} with {} rules",
        analyzer.root(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    Ok(result.has_violations_at(fail_on))
}

/// Disables every diagnostic not named in `names`.
fn restrict_to(config: &mut Config, names: &[&str]) {
    for name in names {
        if find_descriptor(name).is_none() {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    for descriptor in catalog() {
        if !names.iter().any(|n| descriptor.matches(n)) {
            tracing::debug!("Filtered out rule: {}", descriptor.code);
            config.disable(descriptor.code);
        }
    }
}
