//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# ipy-lint configuration

# Severity at or above which `ipy-lint check` exits non-zero.
# IPY diagnostics are warnings by default, so the default run never fails.
# fail_on = "warning"

[analyzer]
# Directory holding the symbol model files, relative to this file.
# Used when `ipy-lint check` is run without a path.
# root = "./obj/symbols"

# Symbol model files to analyze
include = ["**/*.symbols.json"]

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/bin/**",
]

# Rule configurations, keyed by code or name.
# Each rule can be enabled/disabled and have its severity overridden.

[rules.IPY01]  # missing-not-null
enabled = true
# severity = "error"

[rules.IPY02]  # redundant-not-null
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("ipy-lint.toml"), force)?;

    println!("Created ipy-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit ipy-lint.toml to configure rules");
    println!("  2. Run: ipy-lint check <dir-with-symbol-models>");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipy_lint_core::Config;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).expect("default config should parse");
        assert_eq!(config.rules.len(), 2);
        assert!(config.unknown_rule_keys(&ipy_lint_rules::catalog()).is_empty());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ipy-lint.toml");
        std::fs::write(&path, "# mine\n").expect("write");

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "# mine\n");

        write_config(&path, true).expect("forced write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG);
    }
}
