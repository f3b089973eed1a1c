//! # ipy-lint-core
//!
//! Core framework for linting IronPython bindings from a host-supplied
//! symbol model.
//!
//! A host front end (a compiler plugin, a metadata reader, a test fixture)
//! describes the types and methods it found as a [`SymbolModel`]. This crate
//! provides:
//!
//! - the read-only [symbol model](symbols) rules inspect
//! - [`Rule`] trait and [`RuleDescriptor`] constants for per-method rules
//! - [`DiagnosticSink`] for reporting findings, with [`Collector`] as the
//!   in-memory sink
//! - [`Analyzer`] for discovering model files and orchestrating rules
//! - [`Violation`] and [`LintResult`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use ipy_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./obj/symbols")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! println!("{}", result.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod types;

/// Symbol model types supplied by the host.
pub mod symbols;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{CancellationFlag, SymbolContext};
pub use rule::{
    Collector, DiagnosticSink, GeneratedCodeAnalysis, Registration, Rule, RuleBox,
    RuleDescriptor, SymbolKind,
};
pub use symbols::{
    Accessibility, AttributeSymbol, MethodRef, MethodSymbol, ModelError, NullableAnnotation,
    ParameterSymbol, SymbolModel, TypeRef, TypeSymbol,
};
pub use types::{LintResult, Location, Severity, Violation, ViolationDiagnostic};
