//! Names and signatures derived from a method.
//!
//! A method is declared four times over in generated code (see
//! [`SynthesisTarget`]). Each declaration shares the base name and generic
//! parameter list but projects its parameters differently. The selector name
//! computed here is the runtime join key between recorded invocations and
//! stubs/verifications, so it is derived in exactly one place.

use crate::context::MockableContext;
use crate::emit::{ClosureType, ContextReceiver, Effects, Failability, ParameterDecl, Signature};
use crate::model::{GenericType, Method, MethodAttribute};
use crate::projector::{self, DeclaringForm};
use crate::text::{self, remove_implicitly_unwrapped_optionals};

/// Base name of the static factory generated for class initializers.
pub const INITIALIZER_PROXY_NAME: &str = "initialize";

/// Return type name that means "no value".
pub const VOID_TYPE: &str = "Void";

/// The distinct declarations generated for one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisTarget {
    /// The overriding mock member.
    Mock,
    /// The stubbing/verification accessor; every parameter is deferred.
    Matcher,
    /// Accessor variant that takes the variadic parameter literally.
    VariadicMatcher,
    /// Static factory that constructs the mock through an initializer.
    InitializerProxy,
}

/// Flattened generic parameter declarations, in order, with specialized constraints.
pub fn generic_parameters<C: MockableContext + ?Sized>(method: &Method, context: &C) -> Vec<String> {
    method
        .generic_types
        .iter()
        .map(|generic| {
            GenericType {
                name: generic.name.clone(),
                constraints: generic
                    .constraints
                    .iter()
                    .map(|constraint| context.specialize_type_name(constraint))
                    .collect(),
            }
            .flattened_declaration()
        })
        .collect()
}

pub fn failability(method: &Method, target: SynthesisTarget) -> Failability {
    if target == SynthesisTarget::InitializerProxy {
        Failability::None
    } else if method.has(MethodAttribute::Failable) {
        Failability::Optional
    } else if method.has(MethodAttribute::UnwrappedFailable) {
        Failability::ForcedUnwrap
    } else {
        Failability::None
    }
}

pub fn effects(method: &Method) -> Effects {
    Effects {
        throws: method.has(MethodAttribute::Throws),
        rethrows: method.has(MethodAttribute::Rethrows),
    }
}

pub fn receiver(method: &Method) -> ContextReceiver {
    if method.type_scope().is_type_level() {
        ContextReceiver::Static
    } else {
        ContextReceiver::Instance
    }
}

/// Decorated signature of `method` for one synthesis target.
pub fn signature<C: MockableContext + ?Sized>(
    method: &Method,
    context: &C,
    target: SynthesisTarget,
) -> Signature {
    let mut parameters: Vec<ParameterDecl> = method
        .parameters
        .iter()
        .map(|parameter| {
            let deferred = match target {
                SynthesisTarget::Matcher => true,
                SynthesisTarget::VariadicMatcher => !parameter.is_variadic(),
                SynthesisTarget::Mock | SynthesisTarget::InitializerProxy => false,
            };
            let type_name = if deferred {
                projector::deferred_matching_type(parameter, context)
            } else {
                projector::declaring_type(parameter, context, DeclaringForm::Parameter)
            };
            projector::parameter_decl(parameter, type_name)
        })
        .collect();

    let base_name = if target == SynthesisTarget::InitializerProxy {
        parameters.push(call_site_parameter("__file", "StaticString", "#file"));
        parameters.push(call_site_parameter("__line", "UInt", "#line"));
        INITIALIZER_PROXY_NAME.to_string()
    } else {
        text::short_name(&method.name).to_string()
    };

    Signature {
        base_name,
        generic_parameters: generic_parameters(method, context),
        failability: failability(method, target),
        parameters,
    }
}

fn call_site_parameter(name: &str, type_name: &str, default_value: &str) -> ParameterDecl {
    ParameterDecl::new(Some(name.to_string()), name, type_name).with_default(default_value)
}

/// Runtime identity of the method: `"<name> -> <specialized return type>"`.
pub fn selector_name<C: MockableContext + ?Sized>(method: &Method, context: &C) -> String {
    format_selector(method, &context.specialize_type_name(&method.return_type_name))
}

fn format_selector(method: &Method, specialized_return_type: &str) -> String {
    format!("{} -> {}", method.name, specialized_return_type)
}

/// Values shared by every artifact of one method.
///
/// Derived once per generator and reused verbatim, so the selector name in
/// the mock body and in every matcher body is the same string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFacts {
    pub selector_name: String,
    /// Specialized return type as declared.
    pub return_type: String,
    /// Return type usable inside function types and generic arguments.
    pub closure_return_type: String,
    pub effects: Effects,
    pub receiver: ContextReceiver,
    /// Call signature of a stub implementation for this method.
    pub implementation_type: ClosureType,
    pub where_clause: Vec<String>,
    pub attributes: Vec<String>,
}

impl SignatureFacts {
    pub fn derive<C: MockableContext + ?Sized>(method: &Method, context: &C) -> Self {
        let return_type = context.specialize_type_name(&method.return_type_name);
        let closure_return_type = remove_implicitly_unwrapped_optionals(&return_type);
        let effects = effects(method);
        let implementation_type = ClosureType {
            parameter_types: method
                .parameters
                .iter()
                .map(|parameter| projector::declaring_type(parameter, context, DeclaringForm::Closure))
                .collect(),
            effects,
            return_type: closure_return_type.clone(),
        };
        SignatureFacts {
            selector_name: format_selector(method, &return_type),
            return_type,
            closure_return_type,
            effects,
            receiver: receiver(method),
            implementation_type,
            where_clause: method
                .generic_constraints
                .iter()
                .map(|requirement| context.specialize_type_name(requirement))
                .collect(),
            attributes: method.declarations.clone(),
        }
    }

    /// Whether a stub's result is forwarded as the method's return value.
    pub fn returns_value(&self) -> bool {
        self.closure_return_type != VOID_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MockableType;
    use crate::model::{GenericType, MethodParameter, ParameterAttribute};

    fn fetch() -> Method {
        Method::new("fetch(id:)")
            .with_parameter(MethodParameter::new("id", "Int"))
            .returning("String")
    }

    mod selectors {
        use super::*;

        #[test]
        fn combines_name_and_return_type() {
            let ctx = MockableType::class("Service");
            assert_eq!(selector_name(&fetch(), &ctx), "fetch(id:) -> String");
        }

        #[test]
        fn return_type_is_specialized() {
            let ctx = MockableType::protocol("Store").with_binding("Value", "Data");
            let method = Method::new("load()").returning("Value?");
            assert_eq!(selector_name(&method, &ctx), "load() -> Data?");
            let facts = SignatureFacts::derive(&method, &ctx);
            assert_eq!(facts.selector_name, selector_name(&method, &ctx));
        }
    }

    mod signatures {
        use super::*;

        #[test]
        fn mock_uses_declared_types() {
            let ctx = MockableType::class("Service");
            let sig = signature(&fetch(), &ctx, SynthesisTarget::Mock);
            assert_eq!(sig.base_name, "fetch");
            assert_eq!(sig.parameters[0].type_name, "Int");
            assert_eq!(sig.failability, Failability::None);
        }

        #[test]
        fn matcher_defers_every_parameter() {
            let ctx = MockableType::class("Service");
            let sig = signature(&fetch(), &ctx, SynthesisTarget::Matcher);
            assert_eq!(
                sig.parameters[0].type_name,
                "@escaping @autoclosure () -> Int"
            );
        }

        #[test]
        fn variadic_matcher_keeps_variadic_literal() {
            let ctx = MockableType::class("Logger");
            let method = Method::new("log(_:tags:)")
                .with_parameter(MethodParameter::unlabeled("message", "String"))
                .with_parameter(
                    MethodParameter::new("tags", "String...").with_attribute(ParameterAttribute::Variadic),
                );
            let sig = signature(&method, &ctx, SynthesisTarget::VariadicMatcher);
            assert_eq!(
                sig.parameters[0].type_name,
                "@escaping @autoclosure () -> String"
            );
            assert_eq!(sig.parameters[1].type_name, "String...");

            let wildcard = signature(&method, &ctx, SynthesisTarget::Matcher);
            assert_eq!(
                wildcard.parameters[1].type_name,
                "@escaping @autoclosure () -> [String]"
            );
        }

        #[test]
        fn failable_initializers() {
            let ctx = MockableType::class("Service");
            let init = Method::initializer("init()").with_attribute(MethodAttribute::Failable);
            assert_eq!(
                signature(&init, &ctx, SynthesisTarget::Mock).failability,
                Failability::Optional
            );
            let init = Method::initializer("init()").with_attribute(MethodAttribute::UnwrappedFailable);
            assert_eq!(
                signature(&init, &ctx, SynthesisTarget::Mock).failability,
                Failability::ForcedUnwrap
            );
            assert_eq!(
                signature(&init, &ctx, SynthesisTarget::InitializerProxy).failability,
                Failability::None
            );
        }

        #[test]
        fn proxy_appends_call_site_parameters() {
            let ctx = MockableType::class("Service");
            let init = Method::initializer("init(name:)").with_parameter(MethodParameter::new("name", "String"));
            let sig = signature(&init, &ctx, SynthesisTarget::InitializerProxy);
            assert_eq!(sig.base_name, INITIALIZER_PROXY_NAME);
            let names: Vec<_> = sig.parameters.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, ["name", "__file", "__line"]);
            assert_eq!(sig.parameters[1].default_value.as_deref(), Some("#file"));
            assert_eq!(sig.parameters[2].default_value.as_deref(), Some("#line"));
        }

        #[test]
        fn generic_parameters_are_flattened() {
            let ctx = MockableType::class("Service");
            let method = Method::new("store(_:)")
                .with_generic_type(GenericType::new("T").with_constraint("Codable"))
                .with_generic_type(GenericType::new("U"))
                .with_parameter(MethodParameter::unlabeled("value", "T"));
            let sig = signature(&method, &ctx, SynthesisTarget::Mock);
            assert_eq!(sig.generic_parameters, ["T: Codable", "U"]);
        }

        #[test]
        fn constraints_and_requirements_are_specialized() {
            let ctx = MockableType::class("Box").with_binding("T", "Int");
            let method = Method::new("put(_:)")
                .with_generic_type(GenericType::new("V").with_constraint("Container<T>"))
                .with_generic_constraint("V.Element == T")
                .with_parameter(MethodParameter::unlabeled("value", "V"));
            let sig = signature(&method, &ctx, SynthesisTarget::Matcher);
            assert_eq!(sig.generic_parameters, ["V: Container<Int>"]);
            let facts = SignatureFacts::derive(&method, &ctx);
            assert_eq!(facts.where_clause, ["V.Element == Int"]);
        }
    }

    mod facts {
        use super::*;

        #[test]
        fn implementation_type_uses_closure_forms() {
            let ctx = MockableType::class("Logger");
            let method = Method::new("log(tags:)")
                .with_parameter(
                    MethodParameter::new("tags", "String...").with_attribute(ParameterAttribute::Variadic),
                )
                .returning("Bool!")
                .with_attribute(MethodAttribute::Throws);
            let facts = SignatureFacts::derive(&method, &ctx);
            assert_eq!(facts.implementation_type.parameter_types, ["[String]"]);
            assert_eq!(facts.implementation_type.return_type, "Bool?");
            assert_eq!(facts.return_type, "Bool!");
            assert!(facts.effects.throws);
            assert!(facts.returns_value());
        }

        #[test]
        fn static_members_route_through_static_mock() {
            let ctx = MockableType::class("Clock");
            let method = Method::new("now()").with_attribute(MethodAttribute::Class);
            let facts = SignatureFacts::derive(&method, &ctx);
            assert_eq!(facts.receiver, ContextReceiver::Static);
            assert!(!facts.returns_value());
        }
    }
}
