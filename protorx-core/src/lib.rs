//! Core utilities and types for the protorx binding generator.
//!
//! This crate provides the name forms every emitter derives from
//! schema entities, and the output plumbing used to write generated files.

mod file;
mod names;

// File operations
pub use file::{File, OutputSink, WriteResult};
// Name forms
pub use names::{ROOT_ANCHOR, interface_name, leaf_name, qualified_name, rpc_path};
