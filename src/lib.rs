//! Mockgen: declaration synthesis for Swift test doubles
//!
//! Turns a structural description of a mockable type's methods into the
//! source text of mock members, stubbing/verification accessors and static
//! initializer proxies.

// Engine - re-exported from mockgen-core
pub use mockgen_core::context;
pub use mockgen_core::emit;
pub use mockgen_core::error;
pub use mockgen_core::generator;
pub use mockgen_core::model;
pub use mockgen_core::modifiers;
pub use mockgen_core::namer;
pub use mockgen_core::output;
pub use mockgen_core::projector;
pub use mockgen_core::render;
pub use mockgen_core::synthesizer;
pub use mockgen_core::text;

// Front door
pub mod cli;
