//! Rule traits, descriptors, and the diagnostic sink.

use crate::context::SymbolContext;
use crate::symbols::MethodRef;
use crate::types::{Location, Severity, Violation};
use std::sync::Mutex;

/// Static description of one diagnostic a rule can report.
///
/// Descriptors are plain constants; a rule advertises all of its
/// descriptors so hosts can list and configure them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Rule code (e.g., "IPY01").
    pub code: &'static str,
    /// Kebab-case rule name (e.g., "missing-not-null").
    pub name: &'static str,
    /// One-line title.
    pub title: &'static str,
    /// Message template with positional `{0}`, `{1}`, ... placeholders.
    pub message_format: &'static str,
    /// Longer description of what the diagnostic means.
    pub description: &'static str,
    /// Diagnostic category (e.g., "Usage").
    pub category: &'static str,
    /// Severity used when configuration does not override it.
    pub default_severity: Severity,
    /// Whether the diagnostic is reported without explicit opt-in.
    pub enabled_by_default: bool,
}

impl RuleDescriptor {
    /// Substitutes positional arguments into the message template.
    #[must_use]
    pub fn format_message(&self, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(self.message_format.to_string(), |message, (i, arg)| {
                message.replace(&format!("{{{i}}}"), arg)
            })
    }

    /// Creates a violation for this descriptor at `location`.
    #[must_use]
    pub fn violation(&self, location: Location, args: &[&str]) -> Violation {
        Violation::new(
            self.code,
            self.name,
            self.default_severity,
            location,
            self.format_message(args),
        )
    }

    /// Returns true if `key` names this descriptor by code or by name.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.code.eq_ignore_ascii_case(key) || self.name == key
    }
}

/// Whether a rule wants to see methods from generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratedCodeAnalysis {
    /// Skip generated code entirely.
    #[default]
    None,
    /// Analyze generated code and report on it.
    Analyze,
}

/// Kind of symbol a rule is invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolKind {
    /// Invoked once per method declaration.
    #[default]
    Method,
}

/// How a rule asks the analyzer to drive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Generated-code handling.
    pub generated_code: GeneratedCodeAnalysis,
    /// Whether invocations on unrelated symbols may run concurrently.
    pub concurrent: bool,
    /// The symbol kind that triggers an invocation.
    pub symbol_kind: SymbolKind,
}

impl Default for Registration {
    fn default() -> Self {
        Self {
            generated_code: GeneratedCodeAnalysis::None,
            concurrent: true,
            symbol_kind: SymbolKind::Method,
        }
    }
}

/// Receives violations as rules report them.
///
/// Sinks are shared across concurrent rule invocations, so reporting
/// takes `&self`.
pub trait DiagnosticSink: Send + Sync {
    /// Reports one violation.
    fn report(&self, violation: Violation);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Violation) + Send + Sync,
{
    fn report(&self, violation: Violation) {
        self(violation);
    }
}

/// A sink that collects violations in memory.
#[derive(Debug, Default)]
pub struct Collector {
    violations: Mutex<Vec<Violation>>,
}

impl Collector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the collector and returns the reported violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DiagnosticSink for Collector {
    fn report(&self, violation: Violation) {
        self.violations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(violation);
    }
}

/// A per-method lint rule over the symbol model.
///
/// Implementations must be pure functions of the method they are given:
/// no state carried between invocations, one `report` call per finding.
///
/// # Example
///
/// ```ignore
/// use ipy_lint_core::{DiagnosticSink, MethodRef, Rule, RuleDescriptor, SymbolContext};
///
/// pub struct NoEmptyParameterNames;
///
/// impl Rule for NoEmptyParameterNames {
///     fn name(&self) -> &'static str { "no-empty-parameter-names" }
///     fn descriptors(&self) -> &'static [RuleDescriptor] { &[EMPTY_NAME] }
///
///     fn check_method(&self, _ctx: &SymbolContext, method: MethodRef, sink: &dyn DiagnosticSink) {
///         for param in method.parameters().iter().filter(|p| p.name.is_empty()) {
///             sink.report(EMPTY_NAME.violation(param.location.clone(), &[]));
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns every diagnostic this rule can report.
    fn descriptors(&self) -> &'static [RuleDescriptor];

    /// Returns how the analyzer should invoke this rule.
    fn registration(&self) -> Registration {
        Registration::default()
    }

    /// Checks a single method and reports findings to `sink`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the model the method came from
    /// * `method` - The method and its containing type
    /// * `sink` - Receives one violation per finding
    fn check_method(&self, ctx: &SymbolContext, method: MethodRef<'_>, sink: &dyn DiagnosticSink);
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
