//! Emission requests: the structured form of a generated member.
//!
//! The projector, namer, modifier resolver and synthesizer decide *what* to
//! emit and record it in these types. Only [`crate::render`] knows how a
//! request is spelled in the target dialect, so the decision logic can be
//! tested on values instead of on text.

use serde::Serialize;

// ============================================================================
// Signatures
// ============================================================================

/// Failability suffix appended to an initializer name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Failability {
    #[default]
    None,
    /// `init?`
    Optional,
    /// `init!`
    ForcedUnwrap,
}

impl Failability {
    pub fn suffix(self) -> &'static str {
        match self {
            Failability::None => "",
            Failability::Optional => "?",
            Failability::ForcedUnwrap => "!",
        }
    }
}

/// Effect markers of a declaration or closure type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Effects {
    pub throws: bool,
    pub rethrows: bool,
}

impl Effects {
    pub const NONE: Effects = Effects {
        throws: false,
        rethrows: false,
    };

    /// `throws ` / `rethrows ` with trailing space, or empty.
    pub fn markers(self) -> String {
        let mut out = String::new();
        if self.throws {
            out.push_str("throws ");
        }
        if self.rethrows {
            out.push_str("rethrows ");
        }
        out
    }

    /// Calls into throwing code are prefixed with `try`.
    pub fn try_prefix(self) -> &'static str {
        if self.throws {
            "try "
        } else {
            ""
        }
    }
}

/// One parameter of a generated declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDecl {
    /// External label; `None` renders as `_`.
    pub label: Option<String>,
    pub name: String,
    pub type_name: String,
    pub default_value: Option<String>,
}

impl ParameterDecl {
    pub fn new(label: Option<String>, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        ParameterDecl {
            label,
            name: name.into(),
            type_name: type_name.into(),
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Name, generic parameter list, failability and parameter list of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub base_name: String,
    /// Flattened generic parameter declarations, e.g. `T: Equatable`.
    pub generic_parameters: Vec<String>,
    pub failability: Failability,
    pub parameters: Vec<ParameterDecl>,
}

/// A function type, e.g. `(Int, String) throws -> Bool`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureType {
    pub parameter_types: Vec<String>,
    pub effects: Effects,
    pub return_type: String,
}

// ============================================================================
// Modifiers
// ============================================================================

/// Modifiers placed between `public` and the declaration keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModifierSet {
    pub required: bool,
    pub overriding: bool,
    pub is_static: bool,
}

// ============================================================================
// Statements
// ============================================================================

/// Which mocking/stubbing context a generated body talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextReceiver {
    /// Instance members use the mock's own contexts.
    Instance,
    /// Static and class members use the shared `staticMock`.
    Static,
}

/// An argument matcher recorded in an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentMatcher {
    /// Wrap the parameter value directly.
    Captured(String),
    /// Placeholder for a closure that cannot be retained; carries the matching type.
    NonEscapingClosure(String),
    /// Resolve a deferred-evaluation parameter into a matcher.
    Resolved(String),
}

/// Argument list of a recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationArguments {
    Inline(Vec<ArgumentMatcher>),
    /// Refer to a previously bound `arguments` list.
    Bound,
}

/// A labeled argument at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallArgument {
    pub label: Option<String>,
    pub name: String,
}

/// Stub lookup and invocation at the end of a mocked method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubResolution {
    pub receiver: ContextReceiver,
    /// Whether the stub's result is returned (the return type is not `Void`).
    pub returns_value: bool,
    pub implementation_type: ClosureType,
    pub effects: Effects,
    /// Forwarding tokens for each parameter.
    pub arguments: Vec<String>,
}

/// Generic arguments of the verification handle returned by a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockableHandle {
    pub invocation_type: ClosureType,
    pub return_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// Delegate to the superclass designated initializer.
    SuperInit {
        effects: Effects,
        arguments: Vec<CallArgument>,
    },
    /// Runtime/generator compatibility check.
    CheckVersion,
    /// Bind the argument matcher list to `arguments`.
    BindArguments(Vec<ArgumentMatcher>),
    RecordInvocation {
        selector_name: String,
        arguments: InvocationArguments,
    },
    DidInvoke(ContextReceiver),
    ResolveStub(StubResolution),
    ReturnMockable {
        handle: MockableHandle,
        mock_object: ContextReceiver,
    },
    /// Construct the mock type inside an initializer proxy.
    ConstructMock {
        type_name: String,
        failability: Failability,
        effects: Effects,
        arguments: Vec<CallArgument>,
    },
    /// Record the proxy's call site on the constructed mock.
    StampSourceLocation { failability: Failability },
    ReturnMock,
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Function { return_type: String },
    Initializer,
    /// Function returning a verification handle.
    Accessor { handle: MockableHandle },
}

/// A complete generated member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDecl {
    /// Method name shown in a `// MARK:` header, if any.
    pub mark: Option<String>,
    /// Declaration attributes (e.g. `@objc`) printed before the declaration.
    pub attributes: Vec<String>,
    pub modifiers: ModifierSet,
    pub kind: MemberKind,
    pub signature: Signature,
    pub effects: Effects,
    pub where_clause: Vec<String>,
    pub body: Vec<Statement>,
    /// Nesting depth of the declaration line.
    pub depth: usize,
}
