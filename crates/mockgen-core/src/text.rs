//! Text utilities for raw type names and identifiers.
//!
//! Type names arrive as written in the original declaration, including
//! parameter-passing markers (`inout`, `@escaping`, `@autoclosure`) and the
//! variadic `...` suffix. The helpers here rewrite those strings into the
//! forms needed at different positions of a generated declaration.
//!
//! ## Conventions
//!
//! - Helpers never specialize generic names; callers specialize first.
//! - All helpers are total: unrecognized input is returned unchanged.

/// Parameter-passing markers that may prefix a declared parameter type.
const PARAMETER_ATTRIBUTES: &[&str] = &["inout", "@escaping", "@autoclosure", "__owned", "__shared"];

/// Variadic parameter suffix.
pub const VARIADIC_SUFFIX: &str = "...";

// ============================================================================
// Type Names
// ============================================================================

/// Rewrite implicitly-unwrapped optionals (`T!`) as plain optionals (`T?`).
///
/// `T!` is only valid at the top level of a declaration; inside closure
/// types and generic arguments it must be spelled as `T?`.
pub fn remove_implicitly_unwrapped_optionals(type_name: &str) -> String {
    type_name.replace('!', "?")
}

/// Strip parameter-passing markers and the variadic suffix from a type name.
///
/// # Example
///
/// ```
/// use mockgen_core::text::remove_parameter_attributes;
///
/// assert_eq!(remove_parameter_attributes("inout [String]"), "[String]");
/// assert_eq!(remove_parameter_attributes("@escaping () -> Void"), "() -> Void");
/// assert_eq!(remove_parameter_attributes("Int..."), "Int");
/// ```
pub fn remove_parameter_attributes(type_name: &str) -> String {
    let mut rest = type_name.trim();
    'strip: loop {
        for attribute in PARAMETER_ATTRIBUTES {
            if let Some(stripped) = rest.strip_prefix(attribute) {
                if stripped.starts_with(char::is_whitespace) {
                    rest = stripped.trim_start();
                    continue 'strip;
                }
            }
        }
        break;
    }
    variadic_element_type(rest).to_string()
}

/// The element type of a variadic parameter type (`Int...` -> `Int`).
pub fn variadic_element_type(type_name: &str) -> &str {
    let trimmed = type_name.trim_end();
    trimmed.strip_suffix(VARIADIC_SUFFIX).unwrap_or(trimmed)
}

// ============================================================================
// Names
// ============================================================================

/// Base name of a selector-style method name (`fetch(id:)` -> `fetch`).
///
/// Names without a parameter list are returned whole. Failability markers
/// (`init?`, `init!`) are not part of the base name.
pub fn short_name(name: &str) -> &str {
    let base = match name.find('(') {
        Some(index) => &name[..index],
        None => name,
    };
    base.trim_end_matches(['?', '!'])
}

/// Escape an identifier with backticks so keywords can be used as names.
pub fn backticked(name: &str) -> String {
    format!("`{}`", name)
}

// ============================================================================
// Tests
// ============================================================================
