//! Body synthesis: assembles complete member requests for one method.
//!
//! Three artifacts exist per method:
//!
//! - **Mock**: the overriding member that records each invocation and, for
//!   regular methods, forwards to a registered stub.
//! - **Matchers**: accessors returning a verification handle. Methods with a
//!   variadic parameter get a second accessor that takes the variadic
//!   literally, since a variadic cannot be a deferred-evaluation parameter.
//! - **Initializer proxy**: a static factory for class initializers.
//!
//! Shapes that have no artifact yield `None` (or an empty list); that is not
//! an error.

use crate::context::{MockableContext, TypeKind};
use crate::emit::{
    ArgumentMatcher, Failability, InvocationArguments, MemberDecl, MemberKind, MockableHandle,
    ModifierSet, Statement, StubResolution,
};
use crate::model::{Method, MethodAttribute};
use crate::modifiers::{self, ModifierMode};
use crate::namer::{self, SignatureFacts, SynthesisTarget};
use crate::projector;

/// Suffix of the synthesized mock type name.
pub const MOCK_TYPE_SUFFIX: &str = "Mock";

/// Nesting depth of members declared directly in the mock type.
const MEMBER_DEPTH: usize = 1;
/// Nesting depth of initializer proxies.
const PROXY_DEPTH: usize = 2;

/// Mock member for `method`, or `None` for convenience initializers.
pub fn mock_member<C: MockableContext + ?Sized>(
    method: &Method,
    context: &C,
    facts: &SignatureFacts,
) -> Option<MemberDecl> {
    // Arguments for the designated initializer cannot be re-derived.
    if method.is_initializer() && method.is_convenience() {
        return None;
    }

    let record = Statement::RecordInvocation {
        selector_name: facts.selector_name.clone(),
        arguments: InvocationArguments::Inline(
            method
                .parameters
                .iter()
                .map(|parameter| projector::recorded_matcher(parameter, context))
                .collect(),
        ),
    };

    let (kind, body) = if method.is_initializer() {
        let mut body = Vec::new();
        if context.kind() == TypeKind::Class {
            body.push(Statement::SuperInit {
                effects: facts.effects,
                arguments: method.parameters.iter().map(projector::call_argument).collect(),
            });
        }
        body.push(Statement::CheckVersion);
        body.push(record);
        body.push(Statement::DidInvoke(facts.receiver));
        (MemberKind::Initializer, body)
    } else {
        let stub = StubResolution {
            receiver: facts.receiver,
            returns_value: facts.returns_value(),
            implementation_type: facts.implementation_type.clone(),
            effects: facts.effects,
            arguments: method.parameters.iter().map(projector::invocation_name).collect(),
        };
        let body = vec![
            record,
            Statement::DidInvoke(facts.receiver),
            Statement::ResolveStub(stub),
        ];
        let kind = MemberKind::Function {
            return_type: facts.return_type.clone(),
        };
        (kind, body)
    };

    Some(MemberDecl {
        mark: Some(method.name.clone()),
        attributes: facts.attributes.clone(),
        modifiers: modifiers::resolve(method, context.kind(), ModifierMode::Mocking),
        kind,
        signature: namer::signature(method, context, SynthesisTarget::Mock),
        effects: facts.effects,
        where_clause: facts.where_clause.clone(),
        body,
        depth: MEMBER_DEPTH,
    })
}

/// Stubbing/verification accessors for `method`.
///
/// Empty for initializers. Two accessors for variadic methods: the default
/// one resolves every parameter indirectly, the second wraps the variadic
/// parameter directly.
pub fn matcher_members<C: MockableContext + ?Sized>(
    method: &Method,
    context: &C,
    facts: &SignatureFacts,
) -> Vec<MemberDecl> {
    if method.is_initializer() {
        return Vec::new();
    }

    let mut members = vec![matcher_member(method, context, facts, SynthesisTarget::Matcher)];
    if method.is_variadic() {
        members.push(matcher_member(
            method,
            context,
            facts,
            SynthesisTarget::VariadicMatcher,
        ));
    }
    members
}

fn matcher_member<C: MockableContext + ?Sized>(
    method: &Method,
    context: &C,
    facts: &SignatureFacts,
    target: SynthesisTarget,
) -> MemberDecl {
    let handle = MockableHandle {
        invocation_type: facts.implementation_type.clone(),
        return_type: facts.closure_return_type.clone(),
    };

    let mut body = Vec::new();
    if method.parameters.is_empty() {
        body.push(Statement::RecordInvocation {
            selector_name: facts.selector_name.clone(),
            arguments: InvocationArguments::Inline(Vec::new()),
        });
    } else {
        let literal_variadics = target == SynthesisTarget::VariadicMatcher;
        let matchers = method
            .parameters
            .iter()
            .map(|parameter| {
                if literal_variadics && parameter.is_variadic() {
                    ArgumentMatcher::Captured(parameter.name.clone())
                } else {
                    ArgumentMatcher::Resolved(parameter.name.clone())
                }
            })
            .collect();
        body.push(Statement::BindArguments(matchers));
        body.push(Statement::RecordInvocation {
            selector_name: facts.selector_name.clone(),
            arguments: InvocationArguments::Bound,
        });
    }
    body.push(Statement::ReturnMockable {
        handle: handle.clone(),
        mock_object: facts.receiver,
    });

    MemberDecl {
        mark: None,
        attributes: facts.attributes.clone(),
        modifiers: modifiers::resolve(method, context.kind(), ModifierMode::Matching),
        kind: MemberKind::Accessor { handle },
        signature: namer::signature(method, context, target),
        effects: Default::default(),
        where_clause: facts.where_clause.clone(),
        body,
        depth: MEMBER_DEPTH,
    }
}

/// Static factory constructing the mock through a designated class initializer.
pub fn initializer_proxy<C: MockableContext + ?Sized>(
    method: &Method,
    context: &C,
    facts: &SignatureFacts,
) -> Option<MemberDecl> {
    if !method.is_initializer() || context.kind() != TypeKind::Class || method.is_convenience() {
        return None;
    }

    let scoped_name = context.create_scoped_name(&[], MOCK_TYPE_SUFFIX);
    let failability = if method.has(MethodAttribute::Failable) {
        Failability::Optional
    } else {
        Failability::None
    };

    let body = vec![
        Statement::ConstructMock {
            type_name: scoped_name.clone(),
            failability,
            effects: facts.effects,
            arguments: method.parameters.iter().map(projector::call_argument).collect(),
        },
        Statement::StampSourceLocation { failability },
        Statement::ReturnMock,
    ];

    Some(MemberDecl {
        mark: None,
        attributes: facts.attributes.clone(),
        modifiers: ModifierSet {
            is_static: true,
            ..Default::default()
        },
        kind: MemberKind::Function {
            return_type: format!("{}{}", scoped_name, failability.suffix()),
        },
        signature: namer::signature(method, context, SynthesisTarget::InitializerProxy),
        effects: facts.effects,
        where_clause: facts.where_clause.clone(),
        body,
        depth: PROXY_DEPTH,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MockableType;
    use crate::emit::{CallArgument, ContextReceiver};
    use crate::model::{MethodParameter, ParameterAttribute};

    fn synthesize_mock(method: &Method, context: &MockableType) -> Option<MemberDecl> {
        let facts = SignatureFacts::derive(method, context);
        mock_member(method, context, &facts)
    }

    fn synthesize_matchers(method: &Method, context: &MockableType) -> Vec<MemberDecl> {
        let facts = SignatureFacts::derive(method, context);
        matcher_members(method, context, &facts)
    }

    fn synthesize_proxy(method: &Method, context: &MockableType) -> Option<MemberDecl> {
        let facts = SignatureFacts::derive(method, context);
        initializer_proxy(method, context, &facts)
    }

    fn selectors(body: &[Statement]) -> Vec<&str> {
        body.iter()
            .filter_map(|statement| match statement {
                Statement::RecordInvocation { selector_name, .. } => Some(selector_name.as_str()),
                _ => None,
            })
            .collect()
    }

    mod mocks {
        use super::*;

        #[test]
        fn regular_method_records_then_resolves_stub() {
            let ctx = MockableType::class("Service");
            let method = Method::new("fetch(id:)")
                .with_parameter(MethodParameter::new("id", "Int"))
                .returning("String");
            let mock = synthesize_mock(&method, &ctx).unwrap();

            assert_eq!(mock.mark.as_deref(), Some("fetch(id:)"));
            assert!(mock.modifiers.overriding);
            assert_eq!(selectors(&mock.body), ["fetch(id:) -> String"]);
            assert_eq!(mock.body[1], Statement::DidInvoke(ContextReceiver::Instance));
            match &mock.body[2] {
                Statement::ResolveStub(stub) => {
                    assert!(stub.returns_value);
                    assert_eq!(stub.arguments, ["`id`"]);
                    assert_eq!(stub.implementation_type.parameter_types, ["Int"]);
                }
                other => panic!("expected stub resolution, got {:?}", other),
            }
        }

        #[test]
        fn non_escaping_closure_is_replaced_by_placeholder() {
            let ctx = MockableType::protocol("Runner");
            let method = Method::new("run(_:)").with_parameter(
                MethodParameter::unlabeled("body", "() -> Void").with_attribute(ParameterAttribute::Closure),
            );
            let mock = synthesize_mock(&method, &ctx).unwrap();
            match &mock.body[0] {
                Statement::RecordInvocation {
                    arguments: InvocationArguments::Inline(matchers),
                    ..
                } => assert_eq!(
                    matchers,
                    &[ArgumentMatcher::NonEscapingClosure("() -> Void".to_string())]
                ),
                other => panic!("expected invocation record, got {:?}", other),
            }
        }

        #[test]
        fn class_initializer_delegates_to_super() {
            let ctx = MockableType::class("Service");
            let method = Method::initializer("init(name:)")
                .with_parameter(MethodParameter::new("name", "String"))
                .with_attribute(MethodAttribute::Throws);
            let mock = synthesize_mock(&method, &ctx).unwrap();
            assert_eq!(mock.kind, MemberKind::Initializer);
            assert_eq!(
                mock.body[0],
                Statement::SuperInit {
                    effects: crate::emit::Effects {
                        throws: true,
                        rethrows: false
                    },
                    arguments: vec![CallArgument {
                        label: Some("name".to_string()),
                        name: "name".to_string()
                    }],
                }
            );
            assert_eq!(mock.body[1], Statement::CheckVersion);
        }

        #[test]
        fn protocol_initializer_only_checks_version() {
            let ctx = MockableType::protocol("Service");
            let mock = synthesize_mock(&Method::initializer("init()"), &ctx).unwrap();
            assert_eq!(mock.body[0], Statement::CheckVersion);
            assert!(!mock
                .body
                .iter()
                .any(|s| matches!(s, Statement::SuperInit { .. })));
        }

        #[test]
        fn convenience_initializer_has_no_mock() {
            let ctx = MockableType::class("Service");
            let method = Method::initializer("init()").with_attribute(MethodAttribute::Convenience);
            assert!(synthesize_mock(&method, &ctx).is_none());
        }
    }

    mod matchers {
        use super::*;

        #[test]
        fn initializers_have_no_matchers() {
            let ctx = MockableType::class("Service");
            assert!(synthesize_matchers(&Method::initializer("init()"), &ctx).is_empty());
        }

        #[test]
        fn parameterless_method_records_inline() {
            let ctx = MockableType::class("Service");
            let matchers = synthesize_matchers(&Method::new("reset()"), &ctx);
            assert_eq!(matchers.len(), 1);
            assert_eq!(
                matchers[0].body[0],
                Statement::RecordInvocation {
                    selector_name: "reset() -> Void".to_string(),
                    arguments: InvocationArguments::Inline(Vec::new()),
                }
            );
            assert!(!matchers[0].modifiers.overriding);
        }

        #[test]
        fn variadic_method_gets_two_matchers() {
            let ctx = MockableType::class("Logger");
            let method = Method::new("log(_:tags:)")
                .with_parameter(MethodParameter::unlabeled("message", "String"))
                .with_parameter(
                    MethodParameter::new("tags", "String...").with_attribute(ParameterAttribute::Variadic),
                );
            let matchers = synthesize_matchers(&method, &ctx);
            assert_eq!(matchers.len(), 2);
            assert_eq!(
                matchers[0].body[0],
                Statement::BindArguments(vec![
                    ArgumentMatcher::Resolved("message".to_string()),
                    ArgumentMatcher::Resolved("tags".to_string()),
                ])
            );
            assert_eq!(
                matchers[1].body[0],
                Statement::BindArguments(vec![
                    ArgumentMatcher::Resolved("message".to_string()),
                    ArgumentMatcher::Captured("tags".to_string()),
                ])
            );
            assert_eq!(matchers[0].body[1..], matchers[1].body[1..]);
        }

        #[test]
        fn static_matcher_uses_static_mock() {
            let ctx = MockableType::class("Clock");
            let method = Method::new("now()")
                .returning("Date")
                .with_attribute(MethodAttribute::Static);
            let matchers = synthesize_matchers(&method, &ctx);
            assert!(matchers[0].modifiers.is_static);
            assert!(matches!(
                matchers[0].body.last(),
                Some(Statement::ReturnMockable {
                    mock_object: ContextReceiver::Static,
                    ..
                })
            ));
        }
    }

    mod proxies {
        use super::*;

        #[test]
        fn only_class_designated_initializers() {
            let class = MockableType::class("Service");
            let protocol = MockableType::protocol("Service");
            let init = Method::initializer("init()");
            assert!(synthesize_proxy(&init, &class).is_some());
            assert!(synthesize_proxy(&init, &protocol).is_none());
            assert!(synthesize_proxy(&Method::new("run()"), &class).is_none());
            let convenience = init.with_attribute(MethodAttribute::Convenience);
            assert!(synthesize_proxy(&convenience, &class).is_none());
        }

        #[test]
        fn failable_proxy_returns_optional_mock() {
            let ctx = MockableType::class("Service").nested_in("App");
            let init = Method::initializer("init?()").with_attribute(MethodAttribute::Failable);
            let proxy = synthesize_proxy(&init, &ctx).unwrap();
            assert_eq!(
                proxy.kind,
                MemberKind::Function {
                    return_type: "AppMock.ServiceMock?".to_string()
                }
            );
            assert_eq!(
                proxy.body[1],
                Statement::StampSourceLocation {
                    failability: Failability::Optional
                }
            );
            assert!(proxy.modifiers.is_static);
            assert!(!proxy.modifiers.required);
        }
    }
}
