//! TypeScript emitter for the protorx gRPC binding generator.
//!
//! Renders the binding model of `protorx-codegen` as TypeScript for the node
//! [`grpc`](https://www.npmjs.com/package/grpc) runtime, with streaming calls
//! exposed as [rxjs](https://rxjs.dev/) observables.
//!
//! ```ignore
//! use protorx_codegen::Generation;
//! use protorx_codegen_typescript::TypeScriptEmitter;
//!
//! let roots = protorx_schema::Loader::new().load_all(&paths)?;
//! let output = Generation::new(&roots).run(&TypeScriptEmitter::new());
//! ```
//!
//! # Generated Output
//!
//! - bindings: one `<Service>Client` class per service, extending `grpc.Client`,
//!   then one abstract `<Service>Server` class per service
//! - manifest: `export default [...]`, one entry per service listing every
//!   method's RPC path, message types and stream flags

mod client;
mod code_file;
mod codecs;
mod emitter;
mod meta;
mod server;

pub mod ast;

pub use code_file::{CodeFile, RawCode};
pub use emitter::{DEFAULT_INCLUDE, DEFAULT_OBSERVABLE, DEFAULT_TRANSPORT, TypeScriptEmitter};
pub use protorx_codegen::Emitter;

use protorx_codegen::model::SkippedMethod;

/// Placeholder left in a class for a method excluded by unresolved types.
fn skipped_comment(skipped: &SkippedMethod) -> String {
    format!(
        "{}: skipped, unresolved type {}",
        skipped.name,
        skipped.unresolved.join(", ")
    )
}
