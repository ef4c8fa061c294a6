//! Declaration model consumed by the generators.
//!
//! These types describe an already-parsed method or initializer together with
//! its parameters. They are produced upstream (by a parser and a generic
//! binding resolver) and are immutable once constructed. Every type here is
//! serde-deserializable so the CLI can load a type description from JSON.
//!
//! Attribute vocabularies are closed enums kept in ordered sets; the
//! synthesis branches enumerate specific combinations of them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ============================================================================
// Parameters
// ============================================================================

/// Attribute of a single method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterAttribute {
    /// `T...`
    Variadic,
    /// Passed by reference (`inout`).
    Inout,
    /// Deferred-evaluation producer (`@autoclosure`).
    Autoclosure,
    /// Closure permitted to outlive the call (`@escaping`).
    Escaping,
    /// The parameter type is a closure.
    Closure,
}

/// A single parameter of a [`Method`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParameter {
    /// Internal parameter name.
    pub name: String,
    /// External argument label. `None` means the parameter is unlabeled (`_`).
    #[serde(default)]
    pub argument_label: Option<String>,
    /// Declared type name, exactly as written (e.g. `inout [T]`, `Int...`).
    pub type_name: String,
    #[serde(default)]
    pub attributes: BTreeSet<ParameterAttribute>,
}

impl MethodParameter {
    /// Create a parameter whose argument label equals its name.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        MethodParameter {
            argument_label: Some(name.clone()),
            name,
            type_name: type_name.into(),
            attributes: BTreeSet::new(),
        }
    }

    /// Create an unlabeled (`_ name: T`) parameter.
    pub fn unlabeled(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        MethodParameter {
            name: name.into(),
            argument_label: None,
            type_name: type_name.into(),
            attributes: BTreeSet::new(),
        }
    }

    /// Replace the argument label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.argument_label = Some(label.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: ParameterAttribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn has(&self, attribute: ParameterAttribute) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn is_variadic(&self) -> bool {
        self.has(ParameterAttribute::Variadic)
    }

    /// A closure parameter that must not be retained past the call.
    pub fn is_non_escaping_closure(&self) -> bool {
        self.has(ParameterAttribute::Closure) && !self.has(ParameterAttribute::Escaping)
    }
}

// ============================================================================
// Methods
// ============================================================================

/// Attribute of a [`Method`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodAttribute {
    Throws,
    Rethrows,
    /// `static` member.
    Static,
    /// `class` member.
    Class,
    Required,
    Convenience,
    /// `init?`
    Failable,
    /// `init!`
    UnwrappedFailable,
    Initializer,
}

/// Scope a member is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeScope {
    Instance,
    Static,
    Class,
}

impl TypeScope {
    /// Static and class members are both type-level.
    pub fn is_type_level(self) -> bool {
        matches!(self, TypeScope::Static | TypeScope::Class)
    }
}

/// A generic type parameter declared on a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericType {
    pub name: String,
    /// Inherited types / protocol constraints declared inline.
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl GenericType {
    pub fn new(name: impl Into<String>) -> Self {
        GenericType {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// Declaration form used in a generic parameter list, e.g. `T: Hashable & Codable`.
    pub fn flattened_declaration(&self) -> String {
        if self.constraints.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.constraints.join(" & "))
        }
    }
}

/// A method or initializer of a mockable type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Full selector-style name, e.g. `fetch(id:)` or `init(name:)`.
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<MethodParameter>,
    /// Raw (unspecialized) return type name. Initializers use `Void`.
    #[serde(default = "default_return_type")]
    pub return_type_name: String,
    #[serde(default)]
    pub attributes: BTreeSet<MethodAttribute>,
    #[serde(default)]
    pub generic_types: Vec<GenericType>,
    /// `where` clause requirements, each as written (e.g. `T: Equatable`).
    #[serde(default)]
    pub generic_constraints: Vec<String>,
    /// Declaration attributes copied onto every generated member (e.g. `@objc`).
    #[serde(default)]
    pub declarations: Vec<String>,
}

fn default_return_type() -> String {
    "Void".to_string()
}

impl Method {
    /// Create an instance method with no parameters returning `Void`.
    pub fn new(name: impl Into<String>) -> Self {
        Method {
            name: name.into(),
            parameters: Vec::new(),
            return_type_name: default_return_type(),
            attributes: BTreeSet::new(),
            generic_types: Vec::new(),
            generic_constraints: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Create an initializer with no parameters.
    pub fn initializer(name: impl Into<String>) -> Self {
        Method::new(name).with_attribute(MethodAttribute::Initializer)
    }

    pub fn with_parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, type_name: impl Into<String>) -> Self {
        self.return_type_name = type_name.into();
        self
    }

    pub fn with_attribute(mut self, attribute: MethodAttribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn with_generic_type(mut self, generic_type: GenericType) -> Self {
        self.generic_types.push(generic_type);
        self
    }

    pub fn with_generic_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.generic_constraints.push(constraint.into());
        self
    }

    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    pub fn has(&self, attribute: MethodAttribute) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn is_initializer(&self) -> bool {
        self.has(MethodAttribute::Initializer)
    }

    pub fn is_convenience(&self) -> bool {
        self.has(MethodAttribute::Convenience)
    }

    pub fn type_scope(&self) -> TypeScope {
        if self.has(MethodAttribute::Static) {
            TypeScope::Static
        } else if self.has(MethodAttribute::Class) {
            TypeScope::Class
        } else {
            TypeScope::Instance
        }
    }

    /// Whether any parameter is variadic. At most one is supported.
    pub fn is_variadic(&self) -> bool {
        self.parameters.iter().any(MethodParameter::is_variadic)
    }
}
