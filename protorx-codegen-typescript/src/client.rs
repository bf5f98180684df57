//! Client stub rendering.

use protorx_codegen::{
    builder::CodeFragment,
    model::{MethodModel, MethodShape, ServiceModel},
};

use crate::{
    ast::{Class, JsObject, Method, Param},
    code_file::{CodeFile, RawCode},
    codecs, skipped_comment,
};

/// Name of the generated client class.
pub fn class_name(service: &ServiceModel) -> String {
    format!("{}Client", service.name)
}

/// The client class followed by its method table markers.
pub(crate) fn client_file(service: &ServiceModel) -> CodeFile {
    let name = class_name(service);
    let markers = RawCode::lines([
        format!("(<any>{}.prototype).$method_definitions = {{}};", name),
        format!("(<any>{}.prototype).$method_names = {{}};", name),
    ]);
    CodeFile::new().add(client_class(service)).add(markers)
}

fn client_class(service: &ServiceModel) -> Class {
    let mut class = Class::new(class_name(service)).extends("grpc.Client");
    for field in codecs::fields(&service.codecs) {
        class = class.field(field);
    }

    class = class.blank().method(
        Method::new("constructor")
            .param(Param::new("endpoint", "string"))
            .param(Param::new("security", "grpc.ChannelCredentials").optional())
            .body_line("super(endpoint, security || grpc.credentials.createInsecure());"),
    );

    for method in &service.methods {
        class = class.blank().method(client_method(service, method));
    }
    for skipped in &service.skipped {
        class = class.blank().comment(skipped_comment(skipped));
    }
    class
}

fn client_method(service: &ServiceModel, method: &MethodModel) -> Method {
    let shape = method.shape;
    let request = if shape.request_stream() {
        format!("Observable<{}>", method.request.interface())
    } else {
        method.request.interface()
    };
    let response = method.response.qualified();
    let returns = if shape.response_stream() {
        format!("Observable<{}>", response)
    } else {
        format!("Promise<{}>", response)
    };

    let target = call_target(service, method);
    let body = match shape {
        MethodShape::Unary => CodeFragment::block(
            format!("return new Promise<{}>((resolve, reject) => {{", response),
            vec![CodeFragment::line(format!(
                "this.makeUnaryRequest({}, req, {}, {});",
                target, METADATA, SETTLE
            ))],
            Some("});".to_string()),
        ),
        MethodShape::ServerStreaming => CodeFragment::block(
            format!("return new Observable<{}>(subscriber => {{", response),
            [
                vec![CodeFragment::line(format!(
                    "const call = this.makeServerStreamRequest({}, req, {});",
                    target, METADATA
                ))],
                forward_events(response),
                vec![CodeFragment::line("return () => call.cancel();")],
            ]
            .concat(),
            Some("});".to_string()),
        ),
        MethodShape::ClientStreaming => CodeFragment::block(
            format!("return new Promise<{}>((resolve, reject) => {{", response),
            vec![
                CodeFragment::line(format!(
                    "const call = this.makeClientStreamRequest({}, {}, {});",
                    target, METADATA, SETTLE
                )),
                write_input("req.subscribe({", "});", &method.request.interface()),
            ],
            Some("});".to_string()),
        ),
        MethodShape::Bidirectional => CodeFragment::block(
            format!("return new Observable<{}>(subscriber => {{", response),
            [
                vec![CodeFragment::line(format!(
                    "const call = this.makeBidiStreamRequest({}, {});",
                    target, METADATA
                ))],
                forward_events(response),
                vec![
                    write_input(
                        "const input = req.subscribe({",
                        "});",
                        &method.request.interface(),
                    ),
                    CodeFragment::block(
                        "return () => {",
                        vec![
                            CodeFragment::line("input.unsubscribe();"),
                            CodeFragment::line("call.cancel();"),
                        ],
                        Some("};".to_string()),
                    ),
                ],
            ]
            .concat(),
            Some("});".to_string()),
        ),
    };

    Method::new(&method.name)
        .param(Param::new("req", request))
        .param(Param::new("meta", "grpc.Metadata").optional())
        .returns(returns)
        .body_fragment(body)
}

/// Metadata and call options passed to every transport call.
const METADATA: &str = "meta || new grpc.Metadata(), {}";

/// Callback settling the surrounding promise.
const SETTLE: &str = "(error, res) => error ? reject(error) : resolve(res)";

/// Path and the two codec references of a transport call.
fn call_target(service: &ServiceModel, method: &MethodModel) -> String {
    format!(
        "\"{}\", {}, {}",
        method.rpc_path,
        codecs::serializer(&service.codecs, &method.request),
        codecs::deserializer(&service.codecs, &method.response)
    )
}

/// Forward the call's stream events onto the subscriber.
fn forward_events(response: &str) -> Vec<CodeFragment> {
    vec![
        CodeFragment::line(format!(
            "call.on(\"data\", (res: {}) => subscriber.next(res));",
            response
        )),
        CodeFragment::line("call.on(\"error\", (error: Error) => subscriber.error(error));"),
        CodeFragment::line("call.on(\"end\", () => subscriber.complete());"),
    ]
}

/// Subscribe to the request observable, writing into the call.
fn write_input(header: &str, close: &str, request: &str) -> CodeFragment {
    let observer = JsObject::new()
        .raw("next", format!("(message: {}) => call.write(message)", request))
        .raw("error", "(error: Error) => call.destroy(error)")
        .raw("complete", "() => call.end()");
    CodeFragment::block(
        header,
        observer.properties_to_fragments(),
        Some(close.to_string()),
    )
}
