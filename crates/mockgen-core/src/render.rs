//! Rendering of emission requests as Swift source text.
//!
//! This is the only module that spells runtime API names. Those names are a
//! fixed contract with the `Mockingbird` runtime library; previously generated
//! mocks break if any of them change.
//!
//! Output uses two-space indentation and carries no trailing newline.

use crate::emit::{
    ArgumentMatcher, CallArgument, ClosureType, ContextReceiver, InvocationArguments,
    MemberDecl, MemberKind, MockableHandle, ModifierSet, ParameterDecl, Signature, Statement,
    StubResolution,
};
use crate::text::backticked;

const INDENT: &str = "  ";

// Runtime contract.
const RUNTIME: &str = "Mockingbird";
const STATIC_MOCK: &str = "staticMock";

// ============================================================================
// Line Writer
// ============================================================================

struct Writer {
    depth: usize,
    lines: Vec<String>,
}

impl Writer {
    fn new(depth: usize) -> Self {
        Writer {
            depth,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, level: usize, text: impl AsRef<str>) {
        let indent = INDENT.repeat(self.depth + level);
        self.lines.push(format!("{}{}", indent, text.as_ref()));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

// ============================================================================
// Members
// ============================================================================

/// Render one member declaration.
pub fn render_member(member: &MemberDecl) -> String {
    let mut out = Writer::new(member.depth);
    if let Some(name) = &member.mark {
        out.line(0, format!("// MARK: Mocked `{}`", name));
        out.blank();
    }
    if !member.attributes.is_empty() {
        out.line(0, member.attributes.join(" "));
    }
    out.line(0, declaration(member));
    for statement in &member.body {
        render_statement(statement, &mut out);
    }
    out.line(0, "}");
    out.finish()
}

/// Render several members separated by blank lines.
pub fn render_members(members: &[MemberDecl]) -> String {
    members
        .iter()
        .map(render_member)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn declaration(member: &MemberDecl) -> String {
    let modifiers = modifiers(&member.modifiers);
    let signature = signature(&member.signature);
    let where_clause = where_clause(&member.where_clause);
    match &member.kind {
        MemberKind::Function { return_type } => format!(
            "public {}func {} {}-> {}{} {{",
            modifiers,
            signature,
            member.effects.markers(),
            return_type,
            where_clause
        ),
        MemberKind::Accessor { handle } => format!(
            "public {}func {} -> {}{} {{",
            modifiers,
            signature,
            mockable_type(handle),
            where_clause
        ),
        MemberKind::Initializer => format!(
            "public {}{} {}{}{{",
            modifiers,
            signature,
            member.effects.markers(),
            where_clause
                .strip_prefix(' ')
                .map(|clause| format!("{} ", clause))
                .unwrap_or_default()
        ),
    }
}

/// `required override static ` in fixed order, each with a trailing space.
pub fn modifiers(set: &ModifierSet) -> String {
    let mut out = String::new();
    if set.required {
        out.push_str("required ");
    }
    if set.overriding {
        out.push_str("override ");
    }
    if set.is_static {
        out.push_str("static ");
    }
    out
}

/// `name?<Generics>(label name: Type, ...)`
pub fn signature(signature: &Signature) -> String {
    let generics = if signature.generic_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", signature.generic_parameters.join(", "))
    };
    let parameters = signature
        .parameters
        .iter()
        .map(parameter)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}{}{}({})",
        signature.base_name,
        signature.failability.suffix(),
        generics,
        parameters
    )
}

fn parameter(parameter: &ParameterDecl) -> String {
    let label = parameter.label.as_deref().unwrap_or("_");
    let mut out = if label != parameter.name {
        format!("{} {}: {}", label, parameter.name, parameter.type_name)
    } else {
        format!("{}: {}", parameter.name, parameter.type_name)
    };
    if let Some(default_value) = &parameter.default_value {
        out.push_str(" = ");
        out.push_str(default_value);
    }
    out
}

fn where_clause(requirements: &[String]) -> String {
    if requirements.is_empty() {
        String::new()
    } else {
        format!(" where {}", requirements.join(", "))
    }
}

/// `(A, B) throws -> R`
pub fn closure_type(closure: &ClosureType) -> String {
    format!(
        "({}) {}-> {}",
        closure.parameter_types.join(", "),
        closure.effects.markers(),
        closure.return_type
    )
}

/// `Mockingbird.Mockable<Mockingbird.MethodDeclaration, (A) -> R, R>`
pub fn mockable_type(handle: &MockableHandle) -> String {
    format!(
        "{}.Mockable<{}.MethodDeclaration, {}, {}>",
        RUNTIME,
        RUNTIME,
        closure_type(&handle.invocation_type),
        handle.return_type
    )
}

// ============================================================================
// Statements
// ============================================================================

fn render_statement(statement: &Statement, out: &mut Writer) {
    match statement {
        Statement::SuperInit { effects, arguments } => {
            out.line(
                1,
                format!("{}super.init({})", effects.try_prefix(), call_arguments(arguments)),
            );
        }
        Statement::CheckVersion => {
            out.line(1, format!("{}.checkVersion(for: self)", RUNTIME));
        }
        Statement::BindArguments(matchers) => {
            out.line(
                1,
                format!(
                    "let arguments: [{}.ArgumentMatcher] = [{}]",
                    RUNTIME,
                    argument_matchers(matchers)
                ),
            );
        }
        Statement::RecordInvocation {
            selector_name,
            arguments,
        } => {
            let arguments = match arguments {
                InvocationArguments::Inline(matchers) => format!("[{}]", argument_matchers(matchers)),
                InvocationArguments::Bound => "arguments".to_string(),
            };
            out.line(
                1,
                format!(
                    "let invocation: {rt}.Invocation = {rt}.Invocation(selectorName: \"{}\", arguments: {})",
                    escape_string_literal(selector_name),
                    arguments,
                    rt = RUNTIME
                ),
            );
        }
        Statement::DidInvoke(receiver) => {
            out.line(
                1,
                format!("{}mockingContext.didInvoke(invocation)", context_prefix(*receiver)),
            );
        }
        Statement::ResolveStub(stub) => render_stub_resolution(stub, out),
        Statement::ReturnMockable {
            handle,
            mock_object,
        } => {
            out.line(
                1,
                format!(
                    "return {}(mock: {}, invocation: invocation)",
                    mockable_type(handle),
                    mock_object_name(*mock_object)
                ),
            );
        }
        Statement::ConstructMock {
            type_name,
            failability,
            effects,
            arguments,
        } => {
            out.line(
                1,
                format!(
                    "let mock: {}{} = {}{}({})",
                    type_name,
                    failability.suffix(),
                    effects.try_prefix(),
                    type_name,
                    call_arguments(arguments)
                ),
            );
        }
        Statement::StampSourceLocation { failability } => {
            out.line(
                1,
                format!(
                    "mock{}.sourceLocation = SourceLocation(__file, __line)",
                    failability.suffix()
                ),
            );
        }
        Statement::ReturnMock => out.line(1, "return mock"),
    }
}

fn render_stub_resolution(stub: &StubResolution, out: &mut Writer) {
    let return_statement = if stub.returns_value { "return " } else { "" };
    // Void stubs are optional: a missing implementation is not a failure.
    let optional = !stub.returns_value;
    let (cast, call_optional) = if stub.returns_value {
        ("as!", "")
    } else {
        ("as?", "?")
    };
    let try_call = stub.effects.try_prefix();

    out.line(
        1,
        format!(
            "let implementation = {}stubbingContext.implementation(for: invocation, optional: {})",
            context_prefix(stub.receiver),
            optional
        ),
    );
    out.line(
        1,
        format!(
            "if let concreteImplementation = implementation as? {} {{",
            closure_type(&stub.implementation_type)
        ),
    );
    out.line(
        2,
        format!(
            "{}{}concreteImplementation({})",
            return_statement,
            try_call,
            stub.arguments.join(", ")
        ),
    );
    out.line(1, "} else {");
    out.line(
        2,
        format!(
            "{}{}(implementation {} () -> {}){}()",
            return_statement,
            try_call,
            cast,
            stub.implementation_type.return_type,
            call_optional
        ),
    );
    out.line(1, "}");
}

// ============================================================================
// Fragments
// ============================================================================

fn argument_matchers(matchers: &[ArgumentMatcher]) -> String {
    matchers
        .iter()
        .map(argument_matcher)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Constructor expression for one argument matcher.
pub fn argument_matcher(matcher: &ArgumentMatcher) -> String {
    match matcher {
        ArgumentMatcher::Captured(name) => {
            format!("{}.ArgumentMatcher({})", RUNTIME, backticked(name))
        }
        ArgumentMatcher::NonEscapingClosure(type_name) => format!(
            "{rt}.ArgumentMatcher({rt}.NonEscapingClosure<{}>())",
            type_name,
            rt = RUNTIME
        ),
        ArgumentMatcher::Resolved(name) => format!("{}.resolve({})", RUNTIME, backticked(name)),
    }
}

fn call_arguments(arguments: &[CallArgument]) -> String {
    arguments
        .iter()
        .map(|argument| match &argument.label {
            Some(label) => format!("{}: {}", label, backticked(&argument.name)),
            None => backticked(&argument.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn context_prefix(receiver: ContextReceiver) -> String {
    match receiver {
        ContextReceiver::Instance => String::new(),
        ContextReceiver::Static => format!("{}.", STATIC_MOCK),
    }
}

fn mock_object_name(receiver: ContextReceiver) -> &'static str {
    match receiver {
        ContextReceiver::Instance => "self",
        ContextReceiver::Static => STATIC_MOCK,
    }
}

fn escape_string_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{Effects, Failability};

    fn sig(base: &str, parameters: Vec<ParameterDecl>) -> Signature {
        Signature {
            base_name: base.to_string(),
            generic_parameters: Vec::new(),
            failability: Failability::None,
            parameters,
        }
    }

    mod fragments {
        use super::*;

        #[test]
        fn parameter_labels() {
            let s = sig(
                "move",
                vec![
                    ParameterDecl::new(Some("to".to_string()), "point", "Point"),
                    ParameterDecl::new(None, "animated", "Bool"),
                    ParameterDecl::new(Some("speed".to_string()), "speed", "Double"),
                ],
            );
            assert_eq!(
                signature(&s),
                "move(to point: Point, _ animated: Bool, speed: Double)"
            );
        }

        #[test]
        fn generics_and_failability() {
            let mut s = sig("init", Vec::new());
            s.generic_parameters = vec!["T: Codable".to_string()];
            s.failability = Failability::Optional;
            assert_eq!(signature(&s), "init?<T: Codable>()");
        }

        #[test]
        fn forced_unwrap_precedes_generics() {
            let mut s = sig("init", vec![ParameterDecl::new(None, "value", "T")]);
            s.generic_parameters = vec!["T".to_string()];
            s.failability = Failability::ForcedUnwrap;
            assert_eq!(signature(&s), "init!<T>(_ value: T)");
        }

        #[test]
        fn defaulted_parameter() {
            let p = ParameterDecl::new(Some("__line".to_string()), "__line", "UInt").with_default("#line");
            assert_eq!(parameter(&p), "__line: UInt = #line");
        }

        #[test]
        fn modifier_order() {
            let set = ModifierSet {
                required: true,
                overriding: true,
                is_static: true,
            };
            assert_eq!(modifiers(&set), "required override static ");
            assert_eq!(modifiers(&ModifierSet::default()), "");
        }

        #[test]
        fn closure_and_handle_types() {
            let closure = ClosureType {
                parameter_types: vec!["Int".to_string(), "[String]".to_string()],
                effects: Effects {
                    throws: true,
                    rethrows: false,
                },
                return_type: "Bool".to_string(),
            };
            assert_eq!(closure_type(&closure), "(Int, [String]) throws -> Bool");
            let handle = MockableHandle {
                invocation_type: closure,
                return_type: "Bool".to_string(),
            };
            assert_eq!(
                mockable_type(&handle),
                "Mockingbird.Mockable<Mockingbird.MethodDeclaration, (Int, [String]) throws -> Bool, Bool>"
            );
        }

        #[test]
        fn matcher_constructors() {
            assert_eq!(
                argument_matcher(&ArgumentMatcher::Captured("id".to_string())),
                "Mockingbird.ArgumentMatcher(`id`)"
            );
            assert_eq!(
                argument_matcher(&ArgumentMatcher::Resolved("id".to_string())),
                "Mockingbird.resolve(`id`)"
            );
            assert_eq!(
                argument_matcher(&ArgumentMatcher::NonEscapingClosure("() -> Void".to_string())),
                "Mockingbird.ArgumentMatcher(Mockingbird.NonEscapingClosure<() -> Void>())"
            );
        }

        #[test]
        fn call_arguments_forward_by_label() {
            let args = vec![
                CallArgument {
                    label: Some("name".to_string()),
                    name: "name".to_string(),
                },
                CallArgument {
                    label: None,
                    name: "value".to_string(),
                },
            ];
            assert_eq!(call_arguments(&args), "name: `name`, `value`");
        }
    }

    mod members {
        use super::*;

        #[test]
        fn initializer_with_where_clause_and_effects() {
            let mut signature = sig("init", vec![ParameterDecl::new(None, "value", "T")]);
            signature.generic_parameters = vec!["T".to_string()];
            let member = MemberDecl {
                mark: None,
                attributes: vec!["@objc".to_string()],
                modifiers: ModifierSet {
                    required: true,
                    ..Default::default()
                },
                kind: MemberKind::Initializer,
                signature,
                effects: Effects {
                    throws: true,
                    rethrows: false,
                },
                where_clause: vec!["T: Equatable".to_string()],
                body: vec![Statement::CheckVersion],
                depth: 1,
            };
            assert_eq!(
                render_member(&member),
                "  @objc\n  public required init<T>(_ value: T) throws where T: Equatable {\n    Mockingbird.checkVersion(for: self)\n  }"
            );
        }

        #[test]
        fn void_stub_resolution_is_optional() {
            let stub = StubResolution {
                receiver: ContextReceiver::Static,
                returns_value: false,
                implementation_type: ClosureType {
                    parameter_types: Vec::new(),
                    effects: Effects::NONE,
                    return_type: "Void".to_string(),
                },
                effects: Effects::NONE,
                arguments: Vec::new(),
            };
            let mut out = Writer::new(0);
            render_stub_resolution(&stub, &mut out);
            assert_eq!(
                out.finish(),
                [
                    "  let implementation = staticMock.stubbingContext.implementation(for: invocation, optional: true)",
                    "  if let concreteImplementation = implementation as? () -> Void {",
                    "    concreteImplementation()",
                    "  } else {",
                    "    (implementation as? () -> Void)?()",
                    "  }",
                ]
                .join("\n")
            );
        }

        #[test]
        fn selector_literals_are_escaped() {
            assert_eq!(escape_string_literal("a\"b"), "a\\\"b");
        }
    }
}
