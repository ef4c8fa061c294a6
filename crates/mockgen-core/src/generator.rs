//! Per-method generator.
//!
//! A [`MethodGenerator`] is a transient projection of one `(method, context)`
//! pair. Every derived value is computed at most once and cached in a
//! [`OnceCell`]; since each value is a pure function of the inputs, caching
//! only saves work and never changes output.
//!
//! Generators for different methods share nothing and may be built on
//! separate threads by the caller.
//!
//! # Example
//!
//! ```
//! use mockgen_core::context::MockableType;
//! use mockgen_core::generator::MethodGenerator;
//! use mockgen_core::model::{Method, MethodParameter};
//!
//! let context = MockableType::class("Service");
//! let method = Method::new("fetch(id:)")
//!     .with_parameter(MethodParameter::new("id", "Int"))
//!     .returning("String");
//!
//! let generator = MethodGenerator::new(&method, &context);
//! assert_eq!(generator.selector_name(), "fetch(id:) -> String");
//! assert!(generator.generate().contains("public override func fetch(id: Int) -> String {"));
//! ```

use std::cell::OnceCell;

use tracing::debug;

use crate::context::MockableContext;
use crate::emit::MemberDecl;
use crate::model::Method;
use crate::namer::SignatureFacts;
use crate::render;
use crate::synthesizer;

/// Separator between artifacts of one method.
pub const ARTIFACT_SEPARATOR: &str = "\n\n";

pub struct MethodGenerator<'a, C: MockableContext + ?Sized> {
    method: &'a Method,
    context: &'a C,
    facts: OnceCell<SignatureFacts>,
    mock: OnceCell<Option<MemberDecl>>,
    matchers: OnceCell<Vec<MemberDecl>>,
    initializer_proxy: OnceCell<Option<MemberDecl>>,
    generated_mock: OnceCell<String>,
    generated_matchers: OnceCell<String>,
    generated_initializer_proxy: OnceCell<String>,
}

impl<'a, C: MockableContext + ?Sized> MethodGenerator<'a, C> {
    pub fn new(method: &'a Method, context: &'a C) -> Self {
        MethodGenerator {
            method,
            context,
            facts: OnceCell::new(),
            mock: OnceCell::new(),
            matchers: OnceCell::new(),
            initializer_proxy: OnceCell::new(),
            generated_mock: OnceCell::new(),
            generated_matchers: OnceCell::new(),
            generated_initializer_proxy: OnceCell::new(),
        }
    }

    pub fn method(&self) -> &'a Method {
        self.method
    }

    /// Values shared by all artifacts, including the selector name.
    pub fn facts(&self) -> &SignatureFacts {
        self.facts
            .get_or_init(|| SignatureFacts::derive(self.method, self.context))
    }

    /// Runtime identity of the method.
    pub fn selector_name(&self) -> &str {
        &self.facts().selector_name
    }

    // ------------------------------------------------------------------------
    // Emission requests
    // ------------------------------------------------------------------------

    pub fn mock_request(&self) -> Option<&MemberDecl> {
        self.mock
            .get_or_init(|| {
                let mock = synthesizer::mock_member(self.method, self.context, self.facts());
                if mock.is_none() {
                    debug!(method = %self.method.name, "skipping mock for convenience initializer");
                }
                mock
            })
            .as_ref()
    }

    pub fn matcher_requests(&self) -> &[MemberDecl] {
        self.matchers.get_or_init(|| {
            let matchers = synthesizer::matcher_members(self.method, self.context, self.facts());
            debug!(
                method = %self.method.name,
                count = matchers.len(),
                "synthesized matchers"
            );
            matchers
        })
    }

    pub fn initializer_proxy_request(&self) -> Option<&MemberDecl> {
        self.initializer_proxy
            .get_or_init(|| synthesizer::initializer_proxy(self.method, self.context, self.facts()))
            .as_ref()
    }

    // ------------------------------------------------------------------------
    // Rendered artifacts
    // ------------------------------------------------------------------------

    /// Mock member text; empty for convenience initializers.
    pub fn generated_mock(&self) -> &str {
        self.generated_mock
            .get_or_init(|| self.mock_request().map(render::render_member).unwrap_or_default())
    }

    /// Matcher text (both matchers for variadic methods); empty for initializers.
    pub fn generated_matchers(&self) -> &str {
        self.generated_matchers
            .get_or_init(|| render::render_members(self.matcher_requests()))
    }

    /// Initializer proxy text; empty unless this is a designated class initializer.
    ///
    /// Proxies are static members of the mock type and are emitted by the
    /// caller alongside the type, not by [`generate`](Self::generate).
    pub fn generate_class_initializer_proxy(&self) -> &str {
        self.generated_initializer_proxy.get_or_init(|| {
            self.initializer_proxy_request()
                .map(render::render_member)
                .unwrap_or_default()
        })
    }

    /// All non-empty method artifacts joined by a blank line.
    pub fn generate(&self) -> String {
        [self.generated_mock(), self.generated_matchers()]
            .into_iter()
            .filter(|artifact| !artifact.is_empty())
            .collect::<Vec<_>>()
            .join(ARTIFACT_SEPARATOR)
    }
}

// ============================================================================
// Tests
// ============================================================================
