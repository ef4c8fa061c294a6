//! Core synthesis engine for mockgen.
//!
//! This crate turns one resolved method declaration into the source of the
//! test-double members built from it:
//! - Parameter projections (declaring, matching and invocation forms)
//! - Names, signatures and the runtime selector identity
//! - Declaration modifiers for mocks and matchers
//! - Body synthesis into structured emission requests
//! - Rendering of emission requests as source text
//! - Per-method generators with memoized artifacts
//!
//! The core does not parse, resolve generics or write files. It consumes a
//! fully resolved [`model::Method`] and a [`context::MockableContext`] and
//! produces text fragments.

pub mod context;
pub mod emit;
pub mod error;
pub mod generator;
pub mod model;
pub mod modifiers;
pub mod namer;
pub mod output;
pub mod projector;
pub mod render;
pub mod synthesizer;
pub mod text;
