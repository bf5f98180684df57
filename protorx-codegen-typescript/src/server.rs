//! Abstract server base rendering.

use protorx_codegen::{
    builder::CodeFragment,
    model::{MethodModel, MethodShape, ServiceModel},
};

use crate::{
    ast::{ArrowFn, Class, JsObject, Method, Param},
    code_file::CodeFile,
    codecs, skipped_comment,
};

/// Name of the generated server class.
pub fn class_name(service: &ServiceModel) -> String {
    format!("{}Server", service.name)
}

pub(crate) fn server_file(service: &ServiceModel) -> CodeFile {
    CodeFile::new().add(server_class(service))
}

fn server_class(service: &ServiceModel) -> Class {
    let mut class = Class::new(class_name(service)).abstract_();
    for field in codecs::fields(&service.codecs) {
        class = class.field(field);
    }

    class = class.blank().method(attach_to_server(service));

    for method in &service.methods {
        class = class.blank().method(abstract_method(method));
    }
    for skipped in &service.skipped {
        class = class.blank().comment(skipped_comment(skipped));
    }
    class
}

/// Registration of the unary methods with a transport server.
fn attach_to_server(service: &ServiceModel) -> Method {
    let mut descriptors = JsObject::new();
    let mut handlers = JsObject::new();

    for method in &service.methods {
        let key = format!("\"{}\"", method.rpc_path);
        match method.shape {
            MethodShape::Unary => {
                descriptors = descriptors.object(&key, descriptor(service, method));
                handlers = handlers.arrow_fn(&key, unary_handler(method));
            }
            shape @ (MethodShape::ServerStreaming
            | MethodShape::ClientStreaming
            | MethodShape::Bidirectional) => {
                let note = format!("{}: {} registration is not supported", method.name, shape);
                descriptors = descriptors.comment(&note);
                handlers = handlers.comment(note);
            }
        }
    }

    Method::new("attachToServer")
        .param(Param::new("server", "grpc.Server"))
        .body_fragment(CodeFragment::sequence(vec![
            CodeFragment::line("server.addService({"),
            CodeFragment::indent(descriptors.properties_to_fragments()),
            CodeFragment::line("}, {"),
            CodeFragment::indent(handlers.properties_to_fragments()),
            CodeFragment::line("});"),
        ]))
}

fn descriptor(service: &ServiceModel, method: &MethodModel) -> JsObject {
    let (req, res) = (&method.request, &method.response);
    JsObject::new()
        .string("path", &method.rpc_path)
        .raw("requestStream", method.shape.request_stream().to_string())
        .raw("responseStream", method.shape.response_stream().to_string())
        .raw("requestSerialize", codecs::serializer(&service.codecs, req))
        .raw("requestDeserialize", codecs::deserializer(&service.codecs, req))
        .raw("responseSerialize", codecs::serializer(&service.codecs, res))
        .raw("responseDeserialize", codecs::deserializer(&service.codecs, res))
}

fn unary_handler(method: &MethodModel) -> ArrowFn {
    ArrowFn::new(format!(
        "call: grpc.ServerUnaryCall<{}>, callback: grpc.sendUnaryData<{}>",
        method.request.interface(),
        method.response.interface()
    ))
    .body_line(format!(
        "this.{}(call.request, call.metadata).then(res => callback(null, res), error => callback(error, null));",
        method.name
    ))
}

/// The method implementers provide, mirroring the client signature.
fn abstract_method(method: &MethodModel) -> Method {
    let request = method.request.interface();
    let request = if method.shape.request_stream() {
        format!("Observable<{}>", request)
    } else {
        request
    };
    let response = method.response.interface();
    let returns = if method.shape.response_stream() {
        format!("Observable<{}>", response)
    } else {
        format!("Promise<{}>", response)
    };

    Method::new(&method.name)
        .abstract_()
        .param(Param::new("req", request))
        .param(Param::new("meta", "grpc.Metadata"))
        .returns(returns)
}
