//! Read-only symbol model supplied by the host front end.
//!
//! A host (a compiler plugin, a metadata reader, a test fixture) describes
//! the types and methods it discovered as a [`SymbolModel`], usually dumped
//! to a `*.symbols.json` file. Rules only ever read from these types.

use crate::types::Location;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Attribute names that mark a member as tool-generated.
const GENERATED_CODE_ATTRIBUTES: &[&str] =
    &["GeneratedCodeAttribute", "CompilerGeneratedAttribute"];

/// File name suffixes of tool-generated sources.
const GENERATED_FILE_SUFFIXES: &[&str] = &[".g.cs", ".g.i.cs", ".designer.cs", ".generated.cs"];

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Visible everywhere.
    Public,
    /// Visible within the declaring assembly.
    Internal,
    /// Visible to derived types.
    Protected,
    /// Visible to derived types or within the declaring assembly.
    ProtectedInternal,
    /// Visible to derived types within the declaring assembly.
    PrivateProtected,
    /// Visible only to the declaring type.
    Private,
    /// The host could not determine accessibility.
    #[default]
    NotApplicable,
}

/// Nullable reference type annotation of a declaration.
///
/// Kept as a closed three-way enum: `Oblivious` is distinct from both other
/// states and means no nullability check applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullableAnnotation {
    /// Declared without `?` in an enabled nullable context.
    NotAnnotated,
    /// Declared with `?`.
    Annotated,
    /// No nullable context in effect.
    #[default]
    #[serde(alias = "none")]
    Oblivious,
}

/// An attribute applied to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeSymbol {
    /// Simple name of the attribute class (e.g. `NotNullAttribute`).
    pub name: String,
    /// Name of the module defining the attribute class.
    ///
    /// `None` when the host could not resolve the attribute type.
    #[serde(default)]
    pub module: Option<String>,
}

impl AttributeSymbol {
    /// Creates an attribute defined in the given module.
    #[must_use]
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
        }
    }

    /// Creates an attribute whose defining module is unknown.
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
        }
    }

    /// Returns true if the attribute is `name` defined in exactly `module`.
    #[must_use]
    pub fn is(&self, name: &str, module: &str) -> bool {
        self.name == name && self.module.as_deref() == Some(module)
    }
}

/// Returns true if any attribute has the given simple name.
#[must_use]
pub fn has_attribute(attrs: &[AttributeSymbol], name: &str) -> bool {
    attrs.iter().any(|a| a.name == name)
}

/// Returns true if any attribute has the given name and defining module.
///
/// Attributes with an unresolved module never match.
#[must_use]
pub fn has_attribute_from(attrs: &[AttributeSymbol], name: &str, module: &str) -> bool {
    attrs.iter().any(|a| a.is(name, module))
}

/// A reference to a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Simple type name (e.g. `String`, `CodeContext`).
    pub name: String,
    /// Name of the module defining the type.
    #[serde(default)]
    pub module: Option<String>,
    /// Whether the type is a value type (struct, enum, primitive).
    #[serde(default)]
    pub is_value_type: bool,
}

impl TypeRef {
    /// Creates a reference type defined in `module`.
    #[must_use]
    pub fn reference(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
            is_value_type: false,
        }
    }

    /// Creates a value type defined in `module`.
    #[must_use]
    pub fn value(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
            is_value_type: true,
        }
    }

    /// Returns true if this is `name` defined in exactly `module`.
    #[must_use]
    pub fn is(&self, name: &str, module: &str) -> bool {
        self.name == name && self.module.as_deref() == Some(module)
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Nullable annotation of the declared type.
    #[serde(default)]
    pub nullable_annotation: NullableAnnotation,
    /// Attributes applied to the parameter.
    #[serde(default)]
    pub attributes: Vec<AttributeSymbol>,
    /// Location of the parameter declaration.
    pub location: Location,
}

/// A method declared on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    /// Method name.
    pub name: String,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Attributes applied to the method.
    #[serde(default)]
    pub attributes: Vec<AttributeSymbol>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterSymbol>,
    /// Location of the method declaration, if known.
    #[serde(default)]
    pub location: Option<Location>,
    /// Set by hosts that already know the method is tool-generated.
    #[serde(default)]
    pub generated: bool,
}

impl MethodSymbol {
    /// Returns true if the method comes from generated code.
    ///
    /// A method counts as generated when the host flagged it, when it
    /// carries a generated-code attribute, or when its declaring file
    /// follows a generated-source naming convention.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        if self.generated {
            return true;
        }
        if GENERATED_CODE_ATTRIBUTES
            .iter()
            .any(|name| has_attribute(&self.attributes, name))
        {
            return true;
        }
        self.location
            .as_ref()
            .is_some_and(|loc| is_generated_file(&loc.file))
    }
}

/// Detects generated sources by file name.
fn is_generated_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|name| {
            GENERATED_FILE_SUFFIXES
                .iter()
                .any(|suffix| name.ends_with(suffix))
        })
}

/// A type declaration and the methods it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    /// Type name.
    pub name: String,
    /// Attributes applied to the type.
    #[serde(default)]
    pub attributes: Vec<AttributeSymbol>,
    /// Methods declared on the type.
    #[serde(default)]
    pub methods: Vec<MethodSymbol>,
}

impl TypeSymbol {
    /// Iterates over the methods of this type as [`MethodRef`]s.
    pub fn method_refs(&self) -> impl Iterator<Item = MethodRef<'_>> {
        self.methods.iter().map(move |method| MethodRef {
            containing_type: self,
            method,
        })
    }
}

/// A method together with its containing type.
///
/// This is the unit of work handed to rules: everything a rule may read
/// is reachable from it.
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
    /// The type declaring the method.
    pub containing_type: &'a TypeSymbol,
    /// The method itself.
    pub method: &'a MethodSymbol,
}

impl<'a> MethodRef<'a> {
    /// Declared accessibility of the method.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.method.accessibility
    }

    /// Attributes of the containing type.
    #[must_use]
    pub fn containing_type_attributes(&self) -> &'a [AttributeSymbol] {
        &self.containing_type.attributes
    }

    /// Attributes of the method.
    #[must_use]
    pub fn attributes(&self) -> &'a [AttributeSymbol] {
        &self.method.attributes
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &'a [ParameterSymbol] {
        &self.method.parameters
    }

    /// Returns true if the method or its containing type is generated code.
    ///
    /// Every member of a type carrying a generated-code attribute counts as
    /// generated, in addition to the checks of [`MethodSymbol::is_generated`].
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.method.is_generated()
            || GENERATED_CODE_ATTRIBUTES
                .iter()
                .any(|name| has_attribute(&self.containing_type.attributes, name))
    }

    /// Fully qualified display name, `Type.Method`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.containing_type.name, self.method.name)
    }
}

/// All symbols a host reported for one assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolModel {
    /// Name of the assembly the symbols were taken from.
    #[serde(default)]
    pub assembly: String,
    /// Declared types.
    #[serde(default)]
    pub types: Vec<TypeSymbol>,
}

impl SymbolModel {
    /// Parses a symbol model from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a symbol model.
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        serde_json::from_str(content).map_err(|e| ModelError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Loads a symbol model from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ModelError::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    }

    /// Iterates over every method in the model.
    pub fn methods(&self) -> impl Iterator<Item = MethodRef<'_>> {
        self.types.iter().flat_map(TypeSymbol::method_refs)
    }

    /// Number of methods in the model.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }
}

/// Errors loading a symbol model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// IO error reading a model file.
    #[error("Failed to read symbol model {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The content is not a valid symbol model.
    #[error("Invalid symbol model{}: {message}", in_path(.path))]
    Parse {
        /// Path of the offending file, if it came from disk.
        path: Option<PathBuf>,
        /// Parse error message.
        message: String,
    },
}

fn in_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}
