//! Parameter projections.
//!
//! One [`MethodParameter`] appears in generated code in several syntactically
//! different places. Each projection here specializes the raw type name
//! exactly once and then reshapes it for its position.

use crate::context::MockableContext;
use crate::emit::{ArgumentMatcher, CallArgument, ParameterDecl};
use crate::model::{MethodParameter, ParameterAttribute};
use crate::text::{
    backticked, remove_implicitly_unwrapped_optionals, remove_parameter_attributes,
    variadic_element_type,
};

/// Where a declaring-form type is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaringForm {
    /// In a generated parameter list; the declared type is kept as written.
    Parameter,
    /// Inside a function type used to cast stub implementations.
    Closure,
}

/// Declaring form of the parameter type.
///
/// In [`DeclaringForm::Closure`] position, implicitly-unwrapped optionals are
/// not allowed and a variadic `T...` is spelled `[T]`.
pub fn declaring_type<C: MockableContext + ?Sized>(
    parameter: &MethodParameter,
    context: &C,
    form: DeclaringForm,
) -> String {
    let specialized = context.specialize_type_name(&parameter.type_name);
    match form {
        DeclaringForm::Parameter => specialized,
        DeclaringForm::Closure => {
            let type_name = remove_implicitly_unwrapped_optionals(&specialized);
            if parameter.is_variadic() {
                format!("[{}]", variadic_element_type(&type_name))
            } else {
                type_name
            }
        }
    }
}

/// Matching form: the bare value type, with passing markers removed.
pub fn matching_type<C: MockableContext + ?Sized>(parameter: &MethodParameter, context: &C) -> String {
    let type_name = remove_parameter_attributes(&context.specialize_type_name(&parameter.type_name));
    if parameter.is_variadic() {
        format!("[{}]", type_name)
    } else {
        type_name
    }
}

/// Matching form wrapped as a lazily evaluated producer.
pub fn deferred_matching_type<C: MockableContext + ?Sized>(
    parameter: &MethodParameter,
    context: &C,
) -> String {
    format!("@escaping @autoclosure () -> {}", matching_type(parameter, context))
}

/// Token used to forward the parameter at a call site.
pub fn invocation_name(parameter: &MethodParameter) -> String {
    let reference = if parameter.has(ParameterAttribute::Inout) {
        "&"
    } else {
        ""
    };
    let forwarding = if parameter.has(ParameterAttribute::Autoclosure) {
        "()"
    } else {
        ""
    };
    format!("{}{}{}", reference, backticked(&parameter.name), forwarding)
}

/// Generated parameter declaration with the given type.
pub fn parameter_decl(parameter: &MethodParameter, type_name: String) -> ParameterDecl {
    ParameterDecl::new(
        parameter.argument_label.clone(),
        parameter.name.clone(),
        type_name,
    )
}

/// Argument forwarded by label to a designated initializer.
pub fn call_argument(parameter: &MethodParameter) -> CallArgument {
    CallArgument {
        label: parameter.argument_label.clone(),
        name: parameter.name.clone(),
    }
}

/// Matcher recorded by the mock for this parameter.
///
/// Closures that may not escape the call are never captured.
pub fn recorded_matcher<C: MockableContext + ?Sized>(
    parameter: &MethodParameter,
    context: &C,
) -> ArgumentMatcher {
    if parameter.is_non_escaping_closure() {
        ArgumentMatcher::NonEscapingClosure(matching_type(parameter, context))
    } else {
        ArgumentMatcher::Captured(parameter.name.clone())
    }
}
