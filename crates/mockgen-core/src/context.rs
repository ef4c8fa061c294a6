//! The enclosing type a method is mocked in.
//!
//! Generators never look at generic bindings directly. They go through the
//! [`MockableContext`] trait, which exposes exactly three capabilities:
//! scoped naming of synthesized types, specialization of raw type names, and
//! the kind of the enclosing declaration. [`MockableType`] is the concrete,
//! deserializable implementation used by the CLI.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Kind of the type being mocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Protocol,
    Other,
}

/// Capabilities a generator needs from the enclosing type.
pub trait MockableContext {
    /// Fully qualified name of a synthesized type, e.g. `OuterMock.InnerMock<Int>`.
    fn create_scoped_name(&self, generic_arguments: &[String], suffix: &str) -> String;

    /// Substitute the context's generic parameters inside `type_name`.
    ///
    /// Must be applied exactly once to every raw type name that reaches output.
    fn specialize_type_name(&self, type_name: &str) -> String;

    fn kind(&self) -> TypeKind;

    fn is_class(&self) -> bool {
        self.kind() == TypeKind::Class
    }
}

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// A mockable type description with its resolved generic bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockableType {
    pub name: String,
    pub kind: TypeKind,
    /// Names of enclosing types, outermost first.
    #[serde(default)]
    pub containing_types: Vec<String>,
    /// Generic parameter name -> bound type name.
    #[serde(default)]
    pub generic_bindings: BTreeMap<String, String>,
}

impl MockableType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        MockableType {
            name: name.into(),
            kind,
            containing_types: Vec::new(),
            generic_bindings: BTreeMap::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        MockableType::new(name, TypeKind::Class)
    }

    pub fn protocol(name: impl Into<String>) -> Self {
        MockableType::new(name, TypeKind::Protocol)
    }

    pub fn nested_in(mut self, containing_type: impl Into<String>) -> Self {
        self.containing_types.push(containing_type.into());
        self
    }

    pub fn with_binding(mut self, generic: impl Into<String>, bound: impl Into<String>) -> Self {
        self.generic_bindings.insert(generic.into(), bound.into());
        self
    }
}

impl MockableContext for MockableType {
    fn create_scoped_name(&self, generic_arguments: &[String], suffix: &str) -> String {
        let scoped = self
            .containing_types
            .iter()
            .chain(std::iter::once(&self.name))
            .map(|name| format!("{}{}", name, suffix))
            .collect::<Vec<_>>()
            .join(".");
        if generic_arguments.is_empty() {
            scoped
        } else {
            format!("{}<{}>", scoped, generic_arguments.join(", "))
        }
    }

    fn specialize_type_name(&self, type_name: &str) -> String {
        if self.generic_bindings.is_empty() {
            return type_name.to_string();
        }
        IDENTIFIER
            .replace_all(type_name, |caps: &Captures| {
                let Some(found) = caps.get(0) else {
                    return String::new();
                };
                // `Outer.T` names a member type, not the generic parameter.
                if type_name[..found.start()].ends_with('.') {
                    return found.as_str().to_string();
                }
                match self.generic_bindings.get(found.as_str()) {
                    Some(bound) => bound.clone(),
                    None => found.as_str().to_string(),
                }
            })
            .into_owned()
    }

    fn kind(&self) -> TypeKind {
        self.kind
    }
}
