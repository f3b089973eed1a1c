//! # ipy-lint-rules
//!
//! Built-in lint rules for ipy-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | IPY01 | `missing-not-null` | Non-nullable reference parameters need `NotNullAttribute` |
//! | IPY02 | `redundant-not-null` | Nullable reference parameters must not have `NotNullAttribute` |
//!
//! Both diagnostics come from the [`NotNullConvention`] rule.
//!
//! ## Usage
//!
//! ```ignore
//! use ipy_lint_core::Analyzer;
//! use ipy_lint_rules::NotNullConvention;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./obj/symbols")
//!     .rule(NotNullConvention::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod not_null_convention;

pub use not_null_convention::{
    NotNullConvention, CODE_CONTEXT_MODULE, CODE_CONTEXT_TYPE, MISSING_NOT_NULL,
    NOT_NULL_ATTRIBUTE, NOT_NULL_MODULE, PYTHON_HIDDEN_ATTRIBUTE, PYTHON_TYPE_ATTRIBUTE,
    REDUNDANT_NOT_NULL,
};

/// Re-export core types for convenience.
pub use ipy_lint_core::{Rule, RuleDescriptor, Severity, Violation};

use ipy_lint_core::RuleBox;

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(NotNullConvention::new())]
}

/// Returns every diagnostic advertised by [`all_rules`], in code order.
#[must_use]
pub fn catalog() -> Vec<RuleDescriptor> {
    let mut descriptors: Vec<RuleDescriptor> = all_rules()
        .iter()
        .flat_map(|rule| rule.descriptors().iter().copied())
        .collect();
    descriptors.sort_by_key(|d| d.code);
    descriptors
}

/// Looks up a diagnostic by code (case-insensitive) or name.
#[must_use]
pub fn find_descriptor(key: &str) -> Option<RuleDescriptor> {
    catalog().into_iter().find(|d| d.matches(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_exactly_two_rules() {
        let codes: Vec<&str> = catalog().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["IPY01", "IPY02"]);
    }

    #[test]
    fn catalog_entries_are_usage_warnings() {
        for d in catalog() {
            assert_eq!(d.category, "Usage");
            assert_eq!(d.default_severity, Severity::Warning);
            assert!(d.enabled_by_default);
        }
    }

    #[test]
    fn find_descriptor_by_code_or_name() {
        assert_eq!(find_descriptor("ipy01"), Some(MISSING_NOT_NULL));
        assert_eq!(find_descriptor("redundant-not-null"), Some(REDUNDANT_NOT_NULL));
        assert_eq!(find_descriptor("IPY03"), None);
    }
}
