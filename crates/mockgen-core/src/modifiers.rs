//! Declaration modifiers for generated members.

use crate::context::TypeKind;
use crate::emit::ModifierSet;
use crate::model::{Method, MethodAttribute};

/// Whether the generated member replaces the original one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierMode {
    /// The mock member shadows the real member and may need `override`.
    Mocking,
    /// Stubbing/verification accessors are new members and never override.
    Matching,
}

/// Resolve the modifiers of a generated member for `method`.
///
/// `required` is emitted for required members and for every initializer.
/// `override` is emitted only when mocking a non-required member of a class.
/// `static` is emitted for static and class scoped members.
pub fn resolve(method: &Method, kind: TypeKind, mode: ModifierMode) -> ModifierSet {
    let is_required = method.has(MethodAttribute::Required);
    ModifierSet {
        required: is_required || method.is_initializer(),
        overriding: mode == ModifierMode::Mocking && kind == TypeKind::Class && !is_required,
        is_static: method.type_scope().is_type_level(),
    }
}
