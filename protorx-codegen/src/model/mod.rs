//! Language-agnostic binding model.
//!
//! Traversal produces one [`ServiceModel`] per visited service; emitters only
//! ever see this model, never the reflection tree.
//! - [`MethodShape`] - The four streaming shapes
//! - [`CodecTable`] - Deduplicated serializer/deserializer bindings
//! - [`ServiceModel`], [`MethodModel`] - What gets rendered

mod codec;
mod service;
mod shape;

pub use codec::{Codec, CodecKind, CodecTable};
pub use service::{GeneratorKind, MessageRef, MethodModel, ServiceModel, SkippedMethod};
pub use shape::MethodShape;
