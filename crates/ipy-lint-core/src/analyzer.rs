//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::{CancellationFlag, SymbolContext};
use crate::rule::{Collector, GeneratedCodeAnalysis, Rule, RuleBox, RuleDescriptor};
use crate::symbols::{MethodRef, ModelError, SymbolModel};
use crate::types::{LintResult, Violation};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error while discovering files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A symbol model could not be loaded.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
    cancellation: Option<CancellationFlag>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern, relative to the root.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on malformed symbol models (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Uses an externally owned cancellation flag.
    #[must_use]
    pub fn cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut include_patterns = self.include_patterns;
        if include_patterns.is_empty() {
            include_patterns.extend(config.analyzer.include.iter().cloned());
        }

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        // Add default excludes if none specified
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(
                ["**/target/**", "**/bin/**"]
                    .into_iter()
                    .map(String::from),
            );
        }

        let known: Vec<RuleDescriptor> = self
            .rules
            .iter()
            .flat_map(|r| r.descriptors().iter().copied())
            .collect();
        for key in config.unknown_rule_keys(&known) {
            warn!("Ignoring configuration for unknown rule: {}", key);
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            include_patterns,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
    cancellation: CancellationFlag,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a handle to this analyzer's cancellation flag.
    #[must_use]
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancellation.clone()
    }

    /// Analyzes all symbol model files under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, if a model cannot be read,
    /// or if a model is malformed and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} symbol model(s) to analyze", files.len());

        for file_path in &files {
            if self.cancellation.is_cancelled() {
                warn!("Analysis cancelled after {} file(s)", result.files_checked);
                break;
            }

            debug!("Loading: {}", file_path.display());
            match SymbolModel::from_file(file_path) {
                Ok(model) => result.extend(self.analyze_model(file_path, &model)),
                Err(ModelError::Parse { path, message }) => {
                    warn!("Skipping malformed symbol model: {}", message);
                    if self.fail_on_parse_error {
                        return Err(ModelError::Parse { path, message }.into());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} methods",
            result.violations.len(),
            result.methods_checked
        );

        Ok(result)
    }

    /// Analyzes one in-memory symbol model.
    ///
    /// `path` identifies the model in logs and in the rule context.
    #[must_use]
    pub fn analyze_model(&self, path: &Path, model: &SymbolModel) -> LintResult {
        let ctx = SymbolContext::new(path, &model.assembly, &self.cancellation);
        let methods: Vec<MethodRef<'_>> = model.methods().collect();
        let collector = Collector::new();
        let mut checked = vec![false; methods.len()];

        for rule in &self.rules {
            if !self.is_rule_enabled(&**rule) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let registration = rule.registration();
            let eligible: Vec<(usize, MethodRef<'_>)> = methods
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, m)| {
                    registration.generated_code == GeneratedCodeAnalysis::Analyze
                        || !m.is_generated()
                })
                .collect();

            debug!(
                "Running {} on {} of {} method(s) in {}",
                rule.name(),
                eligible.len(),
                methods.len(),
                path.display()
            );

            if registration.concurrent {
                eligible
                    .par_iter()
                    .for_each(|(_, method)| rule.check_method(&ctx, *method, &collector));
            } else {
                for (_, method) in &eligible {
                    rule.check_method(&ctx, *method, &collector);
                }
            }

            for (index, _) in eligible {
                checked[index] = true;
            }
        }

        let mut result = LintResult {
            violations: self.apply_config(collector.into_violations()),
            files_checked: 1,
            methods_checked: checked.into_iter().filter(|c| *c).count(),
        };
        result.sort();
        result
    }

    /// A rule runs if any of its diagnostics is enabled.
    fn is_rule_enabled(&self, rule: &dyn Rule) -> bool {
        rule.descriptors()
            .iter()
            .any(|d| self.config.is_enabled(d))
    }

    /// Drops disabled diagnostics and applies severity overrides.
    fn apply_config(&self, violations: Vec<Violation>) -> Vec<Violation> {
        violations
            .into_iter()
            .filter_map(|mut v| {
                let Some(descriptor) = self.descriptor(&v.code) else {
                    return Some(v);
                };
                if !self.config.is_enabled(descriptor) {
                    return None;
                }
                v.severity = self.config.severity(descriptor);
                Some(v)
            })
            .collect()
    }

    /// Looks up a descriptor of any registered rule by code.
    fn descriptor(&self, code: &str) -> Option<&'static RuleDescriptor> {
        self.rules
            .iter()
            .flat_map(|r| r.descriptors().iter())
            .find(|d| d.code == code)
    }

    /// Discovers all symbol model files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        for include in &self.include_patterns {
            let pattern = format!("{}/{}", self.root.display(), include);
            for entry in glob::glob(&pattern)? {
                let path = entry.map_err(|e| AnalyzerError::Io(e.into()))?;

                if self.should_exclude(&path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }

                files.push(path);
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    ///
    /// Patterns are matched against the path relative to the root, so a
    /// root that itself lives under e.g. `bin/` is still analyzed.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = match path.strip_prefix(&self.root) {
            Ok(relative) => format!("/{}", relative.display()),
            Err(_) => path.display().to_string(),
        };

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/target/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{DiagnosticSink, Registration};
    use crate::symbols::{Accessibility, AttributeSymbol, MethodSymbol, TypeSymbol};
    use crate::types::{Location, Severity};

    const EVERY_METHOD: RuleDescriptor = RuleDescriptor {
        code: "TEST01",
        name: "every-method",
        title: "Reports every method",
        message_format: "Method '{0}' visited",
        description: "",
        category: "Usage",
        default_severity: Severity::Warning,
        enabled_by_default: true,
    };

    struct EveryMethod {
        registration: Registration,
    }

    impl Rule for EveryMethod {
        fn name(&self) -> &'static str {
            "every-method"
        }

        fn descriptors(&self) -> &'static [RuleDescriptor] {
            &[EVERY_METHOD]
        }

        fn registration(&self) -> Registration {
            self.registration
        }

        fn check_method(
            &self,
            _ctx: &SymbolContext,
            method: MethodRef<'_>,
            sink: &dyn DiagnosticSink,
        ) {
            let location = method
                .method
                .location
                .clone()
                .unwrap_or_else(|| Location::new("unknown.cs", 0, 0));
            sink.report(
                EVERY_METHOD
                    .violation(location, &[method.method.name.as_str()])
                    .with_symbol(method.method.name.clone()),
            );
        }
    }

    fn method(name: &str, line: usize, file: &str) -> MethodSymbol {
        MethodSymbol {
            name: name.to_string(),
            accessibility: Accessibility::Public,
            attributes: Vec::new(),
            parameters: Vec::new(),
            location: Some(Location::new(file, line, 5)),
            generated: false,
        }
    }

    fn model() -> SymbolModel {
        SymbolModel {
            assembly: "IronPython.Modules".to_string(),
            types: vec![TypeSymbol {
                name: "PythonOS".to_string(),
                attributes: Vec::new(),
                methods: (1..=20)
                    .rev()
                    .map(|i| method(&format!("m{i}"), i, "Modules/os.cs"))
                    .chain(std::iter::once(method("gen", 1, "Modules/os.g.cs")))
                    .collect(),
            }],
        }
    }

    fn analyzer(config: Config, registration: Registration) -> Analyzer {
        Analyzer::builder()
            .root(".")
            .config(config)
            .rule(EveryMethod { registration })
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/target/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
        assert_eq!(analyzer.include_patterns, vec!["**/*.symbols.json"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/target/**")
            .exclude("**/obj/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/target/debug/a.symbols.json")));
        assert!(analyzer.should_exclude(Path::new("/foo/obj/Debug/a.symbols.json")));
        assert!(!analyzer.should_exclude(Path::new("/foo/symbols/a.symbols.json")));
    }

    #[test]
    fn skips_generated_methods_by_default() {
        let result = analyzer(Config::default(), Registration::default())
            .analyze_model(Path::new("m.json"), &model());
        assert_eq!(result.violations.len(), 20);
        assert_eq!(result.methods_checked, 20);
        assert!(result
            .violations
            .iter()
            .all(|v| v.symbol.as_deref() != Some("gen")));
    }

    #[test]
    fn analyzes_generated_methods_when_registered() {
        let registration = Registration {
            generated_code: GeneratedCodeAnalysis::Analyze,
            ..Registration::default()
        };
        let result =
            analyzer(Config::default(), registration).analyze_model(Path::new("m.json"), &model());
        assert_eq!(result.violations.len(), 21);
        assert_eq!(result.methods_checked, 21);
    }

    #[test]
    fn skips_members_of_generated_types() {
        let mut model = model();
        model.types[0].attributes.push(AttributeSymbol::new(
            "GeneratedCodeAttribute",
            "System.CodeDom.Compiler",
        ));
        let result = analyzer(Config::default(), Registration::default())
            .analyze_model(Path::new("m.json"), &model);
        assert!(result.violations.is_empty());
        assert_eq!(result.methods_checked, 0);
    }

    #[test]
    fn concurrent_and_sequential_runs_agree() {
        let concurrent = analyzer(Config::default(), Registration::default())
            .analyze_model(Path::new("m.json"), &model());
        let sequential = analyzer(
            Config::default(),
            Registration {
                concurrent: false,
                ..Registration::default()
            },
        )
        .analyze_model(Path::new("m.json"), &model());

        assert_eq!(concurrent.violations, sequential.violations);
        let lines: Vec<usize> = concurrent
            .violations
            .iter()
            .map(|v| v.location.line)
            .collect();
        assert_eq!(lines, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn severity_override_applies() {
        let config = Config::parse("[rules.TEST01]\nseverity = \"error\"\n").expect("config");
        let result =
            analyzer(config, Registration::default()).analyze_model(Path::new("m.json"), &model());
        assert!(result.violations.iter().all(|v| v.severity == Severity::Error));
    }

    #[test]
    fn disabled_rule_is_not_invoked() {
        let config = Config::parse("[rules.every-method]\nenabled = false\n").expect("config");
        let result =
            analyzer(config, Registration::default()).analyze_model(Path::new("m.json"), &model());
        assert!(result.violations.is_empty());
        assert_eq!(result.methods_checked, 0);
    }

    #[test]
    fn analyze_discovers_models_and_skips_malformed_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json = serde_json::to_string(&model()).expect("serialize");
        std::fs::create_dir_all(dir.path().join("a")).expect("mkdir");
        std::fs::write(dir.path().join("a/os.symbols.json"), json).expect("write");
        std::fs::write(dir.path().join("broken.symbols.json"), "[").expect("write");
        std::fs::write(dir.path().join("unrelated.json"), "[").expect("write");

        let lenient = Analyzer::builder()
            .root(dir.path())
            .rule(EveryMethod {
                registration: Registration::default(),
            })
            .build()
            .expect("Failed to build analyzer");
        let result = lenient.analyze().expect("analysis should succeed");
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 20);

        let strict = Analyzer::builder()
            .root(dir.path())
            .fail_on_parse_error(true)
            .build()
            .expect("Failed to build analyzer");
        assert!(matches!(
            strict.analyze(),
            Err(AnalyzerError::Model(ModelError::Parse { .. }))
        ));
    }

    #[test]
    fn cancelled_analysis_checks_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json = serde_json::to_string(&model()).expect("serialize");
        std::fs::write(dir.path().join("os.symbols.json"), json).expect("write");

        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(EveryMethod {
                registration: Registration::default(),
            })
            .build()
            .expect("Failed to build analyzer");
        analyzer.cancellation().cancel();

        let result = analyzer.analyze().expect("analysis should succeed");
        assert_eq!(result.files_checked, 0);
        assert!(result.violations.is_empty());
    }
}
