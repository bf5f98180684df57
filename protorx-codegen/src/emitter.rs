//! Target-language rendering seam.

use crate::{collect::GlobalRegistry, model::ServiceModel};

/// Trait for target-language binding emitters.
///
/// Implement this trait to render the binding model in a new language.
/// [`Generation`](crate::Generation) decides which services are rendered and
/// in what order; an emitter only decides what the text looks like.
///
/// Every rendered chunk ends with a newline.
pub trait Emitter {
    /// Language identifier (e.g. "typescript").
    fn language(&self) -> &'static str;

    /// Import preamble of the bindings file.
    fn bindings_header(&self, registry: &GlobalRegistry) -> String;

    /// Client stub for one service.
    fn client(&self, service: &ServiceModel) -> String;

    /// Abstract server base for one service.
    fn server(&self, service: &ServiceModel) -> String;

    /// Import preamble of the manifest file.
    fn meta_header(&self, registry: &GlobalRegistry) -> String;

    /// Manifest entries for all services, in traversal order.
    fn meta_body(&self, services: &[ServiceModel]) -> String;
}
