//! Metadata manifest rendering.

use protorx_codegen::{
    builder::{CodeFragment, Renderable},
    model::{MethodModel, ServiceModel},
};

use crate::ast::{JsArray, JsObject};

/// `export default [ ... ];` with one entry per service.
pub(crate) struct Manifest<'a> {
    services: &'a [ServiceModel],
}

impl<'a> Manifest<'a> {
    pub(crate) fn new(services: &'a [ServiceModel]) -> Self {
        Self { services }
    }
}

impl Renderable for Manifest<'_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let entries = self
            .services
            .iter()
            .fold(JsArray::new(), |arr, service| arr.object(entry(service)));

        if entries.is_empty() {
            return vec![CodeFragment::line("export default [];")];
        }
        vec![CodeFragment::block(
            "export default [",
            entries.element_fragments(),
            Some("];".to_string()),
        )]
    }
}

fn entry(service: &ServiceModel) -> JsObject {
    let methods = service
        .methods
        .iter()
        .fold(JsArray::new(), |arr, method| arr.object(method_entry(method)));
    JsObject::new()
        .string("service", service.qualified_name())
        .array("methods", methods)
}

fn method_entry(method: &MethodModel) -> JsObject {
    JsObject::new()
        .string("name", &method.rpc_path)
        .raw("reqType", method.request.qualified())
        .raw("resType", method.response.qualified())
        .raw("reqStream", method.shape.request_stream().to_string())
        .raw("resStream", method.shape.response_stream().to_string())
}
