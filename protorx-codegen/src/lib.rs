//! Schema traversal and binding model for the protorx gRPC binding generator.
//!
//! This crate is target-language agnostic. It walks resolved schema roots,
//! builds one [`model::ServiceModel`] per service and generator kind, and
//! hands those to an [`Emitter`] for rendering.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`model`] - Services, methods, streaming shapes and codec tables
//! - [`walk`] - Depth-first traversal with per-generator visited sets
//! - [`collect`] - Namespaces and root-level types for import preambles

pub mod builder;
pub mod collect;
mod diagnostic;
mod emitter;
mod generation;
pub mod model;
pub mod walk;

pub use collect::GlobalRegistry;
pub use diagnostic::{Diagnostic, Severity};
pub use emitter::Emitter;
pub use generation::{GeneratedOutput, Generation, GenerationStats, UnresolvedPolicy};
