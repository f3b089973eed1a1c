//! Rule checking that `NotNullAttribute` agrees with nullable annotations.
//!
//! # Rationale
//!
//! IronPython binds Python calls to public methods of types marked with
//! `PythonTypeAttribute`. The binder only rejects `None` for a parameter
//! when it carries `Microsoft.Scripting`'s `NotNullAttribute`, so the
//! attribute has to mirror the C# nullable annotation:
//!
//! - a non-nullable reference parameter without the attribute lets `None`
//!   through (IPY01)
//! - a nullable reference parameter with the attribute rejects `None`
//!   the signature says is fine (IPY02)
//!
//! Methods hidden with `PythonHiddenAttribute`, non-public methods, value
//! types, and the interpreter's `CodeContext` parameter are never checked.
//! Parameters without a nullable context (oblivious) are not checked either.

use ipy_lint_core::symbols::{has_attribute, has_attribute_from};
use ipy_lint_core::{
    Accessibility, DiagnosticSink, MethodRef, NullableAnnotation, ParameterSymbol, Rule,
    RuleDescriptor, Severity, SymbolContext,
};
use tracing::trace;

/// Rule name for the not-null convention.
pub const NAME: &str = "not-null-convention";

/// Attribute marking a type as visible from Python.
pub const PYTHON_TYPE_ATTRIBUTE: &str = "PythonTypeAttribute";

/// Attribute hiding a member from Python.
pub const PYTHON_HIDDEN_ATTRIBUTE: &str = "PythonHiddenAttribute";

/// Attribute telling the binder to reject `None`.
pub const NOT_NULL_ATTRIBUTE: &str = "NotNullAttribute";

/// Module that must define [`NOT_NULL_ATTRIBUTE`].
pub const NOT_NULL_MODULE: &str = "Microsoft.Scripting";

/// Interpreter context type passed implicitly by the binder.
pub const CODE_CONTEXT_TYPE: &str = "CodeContext";

/// Module that must define [`CODE_CONTEXT_TYPE`].
pub const CODE_CONTEXT_MODULE: &str = "IronPython";

/// IPY01: non-nullable reference parameter lacks `NotNullAttribute`.
pub const MISSING_NOT_NULL: RuleDescriptor = RuleDescriptor {
    code: "IPY01",
    name: "missing-not-null",
    title: "Parameter which is marked not nullable does not have the NotNullAttribute",
    message_format: "Parameter '{0}' does not have the NotNullAttribute",
    description: "Non-nullable reference type parameters should have the NotNullAttribute.",
    category: "Usage",
    default_severity: Severity::Warning,
    enabled_by_default: true,
};

/// IPY02: nullable reference parameter carries `NotNullAttribute`.
pub const REDUNDANT_NOT_NULL: RuleDescriptor = RuleDescriptor {
    code: "IPY02",
    name: "redundant-not-null",
    title: "Parameter which is marked nullable has the NotNullAttribute",
    message_format: "Parameter '{0}' should not have the NotNullAttribute",
    description: "Nullable reference type parameters should not have the NotNullAttribute.",
    category: "Usage",
    default_severity: Severity::Warning,
    enabled_by_default: true,
};

const DESCRIPTORS: &[RuleDescriptor] = &[MISSING_NOT_NULL, REDUNDANT_NOT_NULL];

/// Checks `NotNullAttribute` usage on Python-visible method parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNullConvention;

impl NotNullConvention {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns true if the method is part of a Python-visible surface.
    fn applies_to(method: &MethodRef<'_>) -> bool {
        method.accessibility() == Accessibility::Public
            && has_attribute(method.containing_type_attributes(), PYTHON_TYPE_ATTRIBUTE)
            && !has_attribute(method.attributes(), PYTHON_HIDDEN_ATTRIBUTE)
    }

    /// Returns the descriptor violated by `param`, if any.
    fn classify(param: &ParameterSymbol) -> Option<&'static RuleDescriptor> {
        if param.ty.is_value_type || param.ty.is(CODE_CONTEXT_TYPE, CODE_CONTEXT_MODULE) {
            return None;
        }

        let has_not_null =
            has_attribute_from(&param.attributes, NOT_NULL_ATTRIBUTE, NOT_NULL_MODULE);

        match param.nullable_annotation {
            NullableAnnotation::NotAnnotated if !has_not_null => Some(&MISSING_NOT_NULL),
            NullableAnnotation::Annotated if has_not_null => Some(&REDUNDANT_NOT_NULL),
            _ => None,
        }
    }
}

impl Rule for NotNullConvention {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptors(&self) -> &'static [RuleDescriptor] {
        DESCRIPTORS
    }

    fn check_method(
        &self,
        _ctx: &SymbolContext,
        method: MethodRef<'_>,
        sink: &dyn DiagnosticSink,
    ) {
        if !Self::applies_to(&method) {
            trace!("Skipping {}", method.display_name());
            return;
        }

        for param in method.parameters() {
            if let Some(descriptor) = Self::classify(param) {
                sink.report(
                    descriptor
                        .violation(param.location.clone(), &[param.name.as_str()])
                        .with_symbol(param.name.clone()),
                );
            }
        }
    }
}
