//! CLI front door.
//!
//! Loads a JSON type description and drives one [`MethodGenerator`] per
//! method:
//! - `render_type_body` - concatenated type body fragments (text format)
//! - `build_response` - per-method artifacts (JSON format)
//!
//! ## Input Format
//!
//! ```json
//! {
//!   "type": { "name": "Service", "kind": "class" },
//!   "methods": [{ "name": "fetch(id:)", "parameters": [{ "name": "id", "type_name": "Int" }] }]
//! }
//! ```
//!
//! ## Error Handling
//!
//! All functions return `Result<T, MockgenError>`. Synthesis itself cannot
//! fail, so errors only come from reading and decoding the description.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use mockgen_core::context::{MockableContext, MockableType};
use mockgen_core::error::MockgenError;
use mockgen_core::generator::MethodGenerator;
use mockgen_core::model::Method;
use mockgen_core::output::{GenerateResponse, MethodArtifacts};
use mockgen_core::synthesizer::MOCK_TYPE_SUFFIX;

/// Input argument that selects standard input.
pub const STDIN_INPUT: &str = "-";

const FRAGMENT_SEPARATOR: &str = "\n\n";

// ============================================================================
// Type Description
// ============================================================================

/// A mockable type and the methods to synthesize for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    #[serde(rename = "type")]
    pub mockable_type: MockableType,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl TypeDescription {
    /// Decode and validate a description.
    pub fn from_json(json: &str) -> Result<Self, MockgenError> {
        let description: TypeDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    fn validate(&self) -> Result<(), MockgenError> {
        if self.mockable_type.name.trim().is_empty() {
            return Err(MockgenError::invalid_args("type name must not be empty"));
        }
        if let Some(index) = self.methods.iter().position(|m| m.name.trim().is_empty()) {
            return Err(MockgenError::invalid_args_with_details(
                "method name must not be empty",
                serde_json::json!({ "method_index": index }),
            ));
        }
        Ok(())
    }

    fn generators(&self) -> impl Iterator<Item = MethodGenerator<'_, MockableType>> {
        self.methods
            .iter()
            .map(|method| MethodGenerator::new(method, &self.mockable_type))
    }
}

/// Load a description from a file path, or from stdin when `input` is `-`.
pub fn load_description(input: &str) -> Result<TypeDescription, MockgenError> {
    let json = if input == STDIN_INPUT {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        read_input_file(Path::new(input))?
    };
    TypeDescription::from_json(&json)
}

fn read_input_file(path: &Path) -> Result<String, MockgenError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => MockgenError::file_not_found(path.display().to_string()),
        _ => MockgenError::Io(err),
    })
}

// ============================================================================
// Generation
// ============================================================================

/// Options for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Append initializer proxies after the method artifacts.
    pub include_proxies: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            include_proxies: true,
        }
    }
}

/// Render the type body: every method's artifacts in input order, then the
/// initializer proxies.
pub fn render_type_body(description: &TypeDescription, options: GenerateOptions) -> String {
    info!(
        type_name = %description.mockable_type.name,
        methods = description.methods.len(),
        "rendering type body"
    );
    let generators: Vec<_> = description.generators().collect();

    let mut fragments: Vec<String> = generators
        .iter()
        .map(MethodGenerator::generate)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    if options.include_proxies {
        fragments.extend(
            generators
                .iter()
                .map(|generator| generator.generate_class_initializer_proxy())
                .filter(|proxy| !proxy.is_empty())
                .map(str::to_string),
        );
    }

    fragments.join(FRAGMENT_SEPARATOR)
}

/// Collect per-method artifacts into a JSON response.
pub fn build_response(description: &TypeDescription) -> GenerateResponse {
    info!(
        type_name = %description.mockable_type.name,
        methods = description.methods.len(),
        "building generate response"
    );
    let methods = description
        .generators()
        .map(|generator| MethodArtifacts::from_generator(&generator))
        .collect();
    GenerateResponse::new(
        description.mockable_type.name.clone(),
        description
            .mockable_type
            .create_scoped_name(&[], MOCK_TYPE_SUFFIX),
        methods,
    )
}

// ============================================================================
// Tests
// ============================================================================
