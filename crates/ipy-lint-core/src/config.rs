//! Configuration types for ipy-lint.

use crate::rule::RuleDescriptor;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for ipy-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing run (default: "error").
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule code or rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns the severity at or above which a run fails.
    #[must_use]
    pub fn fail_threshold(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }

    /// Returns the configuration entries for a descriptor, most specific first.
    ///
    /// An exact code key wins over a code key in another case, which wins
    /// over the rule name. Ties are broken by key so the order never depends
    /// on map iteration.
    fn rule_configs(&self, descriptor: &RuleDescriptor) -> Vec<&RuleConfig> {
        let mut matching: Vec<(u8, &str, &RuleConfig)> = self
            .rules
            .iter()
            .filter_map(|(key, config)| {
                let rank = if key == descriptor.code {
                    0
                } else if key.eq_ignore_ascii_case(descriptor.code) {
                    1
                } else if key == descriptor.name {
                    2
                } else {
                    return None;
                };
                Some((rank, key.as_str(), config))
            })
            .collect();
        matching.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        matching.into_iter().map(|(_, _, config)| config).collect()
    }

    /// Checks if a diagnostic is enabled.
    #[must_use]
    pub fn is_enabled(&self, descriptor: &RuleDescriptor) -> bool {
        self.rule_configs(descriptor)
            .into_iter()
            .find_map(|c| c.enabled)
            .unwrap_or(descriptor.enabled_by_default)
    }

    /// Returns the effective severity of a diagnostic.
    #[must_use]
    pub fn severity(&self, descriptor: &RuleDescriptor) -> Severity {
        self.rule_configs(descriptor)
            .into_iter()
            .find_map(|c| c.severity)
            .unwrap_or(descriptor.default_severity)
    }

    /// Disables a diagnostic, by code or name.
    pub fn disable(&mut self, key: impl Into<String>) {
        self.rules.entry(key.into()).or_default().enabled = Some(false);
    }

    /// Returns configured rule keys that match none of `known`.
    #[must_use]
    pub fn unknown_rule_keys(&self, known: &[RuleDescriptor]) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .rules
            .keys()
            .filter(|key| !known.iter().any(|d| d.matches(key)))
            .map(String::as_str)
            .collect();
        unknown.sort_unstable();
        unknown
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns selecting symbol model files, relative to the root.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_include() -> Vec<String> {
    vec!["**/*.symbols.json".to_string()]
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this diagnostic is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this diagnostic.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPY01: RuleDescriptor = RuleDescriptor {
        code: "IPY01",
        name: "missing-not-null",
        title: "",
        message_format: "",
        description: "",
        category: "Usage",
        default_severity: Severity::Warning,
        enabled_by_default: true,
    };

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_threshold(), Severity::Error);
        assert_eq!(config.analyzer.include, vec!["**/*.symbols.json"]);
        assert!(config.is_enabled(&IPY01));
        assert_eq!(config.severity(&IPY01), Severity::Warning);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "warning"

[analyzer]
root = "./obj/symbols"
exclude = ["**/generated/**"]

[rules.IPY01]
severity = "error"

[rules.redundant-not-null]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./obj/symbols"));
        assert_eq!(config.analyzer.include, vec!["**/*.symbols.json"]);
        assert_eq!(config.fail_threshold(), Severity::Warning);
        assert!(config.is_enabled(&IPY01));
        assert_eq!(config.severity(&IPY01), Severity::Error);
        assert_eq!(config.rules.len(), 2);
    }

    #[test]
    fn rule_keys_match_by_name() {
        let mut config = Config::default();
        config.disable("missing-not-null");
        assert!(!config.is_enabled(&IPY01));
    }

    #[test]
    fn code_key_takes_precedence_over_name_key() {
        let toml = "[rules.IPY01]\nenabled = false\n[rules.missing-not-null]\nenabled = true\n";
        for _ in 0..50 {
            let config = Config::parse(toml).expect("Failed to parse");
            assert!(!config.is_enabled(&IPY01));
        }
    }

    #[test]
    fn exact_code_key_takes_precedence_over_other_case() {
        let toml = "[rules.ipy01]\nseverity = \"info\"\n[rules.IPY01]\nseverity = \"error\"\n";
        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.severity(&IPY01), Severity::Error);
    }

    #[test]
    fn fields_merge_across_code_and_name_keys() {
        let toml = "[rules.IPY01]\nseverity = \"error\"\n[rules.missing-not-null]\nenabled = false\n";
        let config = Config::parse(toml).expect("Failed to parse");
        assert!(!config.is_enabled(&IPY01));
        assert_eq!(config.severity(&IPY01), Severity::Error);
    }

    #[test]
    fn reports_unknown_rule_keys() {
        let config = Config::parse("[rules.IPY99]\nenabled = false\n[rules.IPY01]\n")
            .expect("Failed to parse");
        assert_eq!(config.unknown_rule_keys(&[IPY01]), vec!["IPY99"]);
    }

    #[test]
    fn invalid_severity_is_a_parse_error() {
        let err = Config::parse("fail_on = \"fatal\"").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
