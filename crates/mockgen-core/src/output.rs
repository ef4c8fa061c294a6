//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (methods in input order)
//! 3. **Nullable vs absent:** Explicit `null` for "no artifact of this shape"
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::context::MockableContext;
use crate::error::{MockgenError, OutputErrorCode};
use crate::generator::MethodGenerator;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Generate Response
// ============================================================================

/// Artifacts generated for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodArtifacts {
    /// Method name as declared.
    pub name: String,
    /// Runtime selector identity.
    pub selector: String,
    /// Mock member; `null` for convenience initializers.
    pub mock: Option<String>,
    /// Stubbing/verification accessors; empty for initializers.
    pub matchers: Vec<String>,
    /// Static factory; `null` unless a designated class initializer.
    pub initializer_proxy: Option<String>,
}

impl MethodArtifacts {
    /// Collect the rendered artifacts of a generator.
    pub fn from_generator<C: MockableContext + ?Sized>(generator: &MethodGenerator<'_, C>) -> Self {
        MethodArtifacts {
            name: generator.method().name.clone(),
            selector: generator.selector_name().to_string(),
            mock: non_empty(generator.generated_mock()),
            matchers: generator
                .matcher_requests()
                .iter()
                .map(crate::render::render_member)
                .collect(),
            initializer_proxy: non_empty(generator.generate_class_initializer_proxy()),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Counts of generated artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub methods: usize,
    pub mocks: usize,
    pub matchers: usize,
    pub initializer_proxies: usize,
}

impl Summary {
    pub fn from_methods(methods: &[MethodArtifacts]) -> Self {
        let mut summary = Summary::default();
        for method in methods {
            summary.methods += 1;
            summary.mocks += usize::from(method.mock.is_some());
            summary.matchers += method.matchers.len();
            summary.initializer_proxies += usize::from(method.initializer_proxy.is_some());
        }
        summary
    }
}

/// Response for `mockgen generate --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    /// Name of the mocked type.
    pub type_name: String,
    /// Scoped name of the synthesized mock type.
    pub mock_type_name: String,
    pub methods: Vec<MethodArtifacts>,
    pub summary: Summary,
}

impl GenerateResponse {
    pub fn new(
        type_name: impl Into<String>,
        mock_type_name: impl Into<String>,
        methods: Vec<MethodArtifacts>,
    ) -> Self {
        let summary = Summary::from_methods(&methods);
        GenerateResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            type_name: type_name.into(),
            mock_type_name: mock_type_name.into(),
            methods,
            summary,
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn from_error(err: &MockgenError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();
        let details = match err {
            MockgenError::InvalidArguments { details, .. } => details.clone(),
            MockgenError::InvalidModel { line, column, .. } => {
                Some(serde_json::json!({ "line": line, "column": column }))
            }
            MockgenError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            MockgenError::Io(_) | MockgenError::InternalError { .. } => None,
        };
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &MockgenError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
