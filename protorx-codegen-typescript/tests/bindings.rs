//! End-to-end rendering of schemas loaded from `.proto` sources.

use std::path::PathBuf;

use protorx_codegen::{GeneratedOutput, Generation, UnresolvedPolicy, builder::Indent};
use protorx_codegen_typescript::TypeScriptEmitter;
use protorx_schema::Loader;
use tempfile::TempDir;

/// Write `(name, source)` pairs into a temp dir and load the first `entries` of them.
fn load(files: &[(&str, &str)], entries: &[&str]) -> (TempDir, Vec<protorx_schema::Root>) {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        std::fs::write(dir.path().join(name), source).unwrap();
    }
    let paths: Vec<PathBuf> = entries.iter().map(|e| dir.path().join(e)).collect();
    let roots = Loader::new().load_all(&paths).unwrap();
    (dir, roots)
}

fn generate(files: &[(&str, &str)]) -> GeneratedOutput {
    let (_dir, roots) = load(files, &[files[0].0]);
    Generation::new(&roots).run(&TypeScriptEmitter::new())
}

const GREETER: &str = r#"
syntax = "proto3";

message HelloRequest {
  string name = 1;
}

message HelloResponse {
  string message = 1;
}

service Greeter {
  rpc SayHello (HelloRequest) returns (HelloResponse);
}
"#;

const WATCHER: &str = r#"
syntax = "proto3";
package foo.bar;

message WatchRequest { string key = 1; }
message WatchEvent { bytes value = 1; }

service Svc {
  rpc Watch (WatchRequest) returns (stream WatchEvent) {}
}
"#;

const SHAPES: &str = r#"
syntax = "proto3";
package shapes;

message Req {}
message Res {}

service Shapes {
  rpc Unary (Req) returns (Res);
  rpc ServerStream (Req) returns (stream Res);
  rpc ClientStream (stream Req) returns (Res);
  rpc Bidi (stream Req) returns (stream Res);
}
"#;

#[test]
fn test_greeter_bindings() {
    let output = generate(&[("greeter.proto", GREETER)]);

    let expected = r#"import * as grpc from "grpc";
import { Observable } from "rxjs";
import { HelloRequest, IHelloRequest, HelloResponse, IHelloResponse } from "../apis/proto";

export class GreeterClient extends grpc.Client {
  private serializeHelloRequest = (message: IHelloRequest) => <Buffer>HelloRequest.encode(message).finish();
  private deserializeHelloResponse = (buffer: Buffer) => HelloResponse.decode(<Uint8Array>buffer);

  constructor(endpoint: string, security?: grpc.ChannelCredentials) {
    super(endpoint, security || grpc.credentials.createInsecure());
  }

  SayHello(req: IHelloRequest, meta?: grpc.Metadata): Promise<HelloResponse> {
    return new Promise<HelloResponse>((resolve, reject) => {
      this.makeUnaryRequest("/Greeter/SayHello", this.serializeHelloRequest, this.deserializeHelloResponse, req, meta || new grpc.Metadata(), {}, (error, res) => error ? reject(error) : resolve(res));
    });
  }
}

(<any>GreeterClient.prototype).$method_definitions = {};
(<any>GreeterClient.prototype).$method_names = {};

export abstract class GreeterServer {
  private serializeHelloRequest = (message: IHelloRequest) => <Buffer>HelloRequest.encode(message).finish();
  private serializeHelloResponse = (message: IHelloResponse) => <Buffer>HelloResponse.encode(message).finish();
  private deserializeHelloRequest = (buffer: Buffer) => HelloRequest.decode(<Uint8Array>buffer);
  private deserializeHelloResponse = (buffer: Buffer) => HelloResponse.decode(<Uint8Array>buffer);

  attachToServer(server: grpc.Server) {
    server.addService({
      "/Greeter/SayHello": {
        path: "/Greeter/SayHello",
        requestStream: false,
        responseStream: false,
        requestSerialize: this.serializeHelloRequest,
        requestDeserialize: this.deserializeHelloRequest,
        responseSerialize: this.serializeHelloResponse,
        responseDeserialize: this.deserializeHelloResponse,
      },
    }, {
      "/Greeter/SayHello": (call: grpc.ServerUnaryCall<IHelloRequest>, callback: grpc.sendUnaryData<IHelloResponse>) => {
        this.SayHello(call.request, call.metadata).then(res => callback(null, res), error => callback(error, null));
      },
    });
  }

  abstract SayHello(req: IHelloRequest, meta: grpc.Metadata): Promise<IHelloResponse>;
}
"#;
    assert_eq!(output.bindings, expected);
}

#[test]
fn test_greeter_manifest() {
    let output = generate(&[("greeter.proto", GREETER)]);

    insta::assert_snapshot!(output.meta, @r#"
    import { HelloRequest, HelloResponse } from "../apis/proto";

    export default [
      {
        service: "Greeter",
        methods: [
          {
            name: "/Greeter/SayHello",
            reqType: HelloRequest,
            resType: HelloResponse,
            reqStream: false,
            resStream: false,
          },
        ],
      },
    ];
    "#);
}

#[test]
fn test_server_streaming_in_package() {
    let output = generate(&[("watch.proto", WATCHER)]);
    let bindings = &output.bindings;

    assert!(bindings.contains("import { foo } from \"../apis/proto\";\n"));
    assert!(bindings.contains(
        "  Watch(req: foo.bar.IWatchRequest, meta?: grpc.Metadata): Observable<foo.bar.WatchEvent> {\n\
         \x20   return new Observable<foo.bar.WatchEvent>(subscriber => {\n\
         \x20     const call = this.makeServerStreamRequest(\"/foo.bar.Svc/Watch\", this.serializeWatchRequest, this.deserializeWatchEvent, req, meta || new grpc.Metadata(), {});\n\
         \x20     call.on(\"data\", (res: foo.bar.WatchEvent) => subscriber.next(res));\n\
         \x20     call.on(\"error\", (error: Error) => subscriber.error(error));\n\
         \x20     call.on(\"end\", () => subscriber.complete());\n\
         \x20     return () => call.cancel();\n\
         \x20   });\n\
         \x20 }\n"
    ));
    assert!(bindings.contains(
        "  abstract Watch(req: foo.bar.IWatchRequest, meta: grpc.Metadata): Observable<foo.bar.IWatchEvent>;\n"
    ));

    // streaming registration is an explicit placeholder in both tables
    assert_eq!(
        bindings
            .matches("// Watch: server streaming registration is not supported")
            .count(),
        2
    );
    assert!(!bindings.contains("\"/foo.bar.Svc/Watch\": {"));

    assert!(output.meta.contains("service: \"foo.bar.Svc\","));
    assert!(output.meta.contains("name: \"/foo.bar.Svc/Watch\","));
    assert!(output.meta.contains("resType: foo.bar.WatchEvent,"));
    assert!(output.meta.contains("resStream: true,"));
}

#[test]
fn test_client_streaming_and_bidi_wiring() {
    let output = generate(&[("shapes.proto", SHAPES)]);
    let bindings = &output.bindings;

    assert!(bindings.contains(
        "  ClientStream(req: Observable<shapes.IReq>, meta?: grpc.Metadata): Promise<shapes.Res> {\n\
         \x20   return new Promise<shapes.Res>((resolve, reject) => {\n\
         \x20     const call = this.makeClientStreamRequest(\"/shapes.Shapes/ClientStream\", this.serializeReq, this.deserializeRes, meta || new grpc.Metadata(), {}, (error, res) => error ? reject(error) : resolve(res));\n\
         \x20     req.subscribe({\n\
         \x20       next: (message: shapes.IReq) => call.write(message),\n\
         \x20       error: (error: Error) => call.destroy(error),\n\
         \x20       complete: () => call.end(),\n\
         \x20     });\n\
         \x20   });\n\
         \x20 }\n"
    ));
    assert!(bindings.contains(
        "  Bidi(req: Observable<shapes.IReq>, meta?: grpc.Metadata): Observable<shapes.Res> {\n"
    ));
    assert!(bindings.contains(
        "      const call = this.makeBidiStreamRequest(\"/shapes.Shapes/Bidi\", this.serializeReq, this.deserializeRes, meta || new grpc.Metadata(), {});\n"
    ));
    assert!(bindings.contains(
        "      return () => {\n        input.unsubscribe();\n        call.cancel();\n      };\n"
    ));
    assert!(bindings.contains(
        "  abstract ClientStream(req: Observable<shapes.IReq>, meta: grpc.Metadata): Promise<shapes.IRes>;\n"
    ));
    assert!(bindings.contains(
        "  abstract Bidi(req: Observable<shapes.IReq>, meta: grpc.Metadata): Observable<shapes.IRes>;\n"
    ));

    // one codec per type however many methods share it
    assert_eq!(bindings.matches("private serializeReq = ").count(), 2);
    assert_eq!(bindings.matches("private deserializeRes = ").count(), 2);
    assert_eq!(bindings.matches("private serializeRes = ").count(), 1);
}

#[test]
fn test_manifest_lists_every_shape() {
    let output = generate(&[("shapes.proto", SHAPES)]);
    let flags: Vec<_> = output
        .meta
        .lines()
        .filter(|l| l.contains("Stream: "))
        .map(str::trim)
        .collect();
    assert_eq!(
        flags,
        [
            "reqStream: false,",
            "resStream: false,",
            "reqStream: false,",
            "resStream: true,",
            "reqStream: true,",
            "resStream: false,",
            "reqStream: true,",
            "resStream: true,",
        ]
    );
}

#[test]
fn test_shared_import_is_emitted_once_across_roots() {
    let common = r#"
        syntax = "proto3";
        package common;
        message Ping {}
        service Health { rpc Check (Ping) returns (Ping); }
    "#;
    let a = r#"
        syntax = "proto3";
        package a;
        import "common.proto";
        service A { rpc Call (common.Ping) returns (common.Ping); }
    "#;
    let b = r#"
        syntax = "proto3";
        package b;
        import "common.proto";
        service B { rpc Call (.common.Ping) returns (.common.Ping); }
    "#;
    let (_dir, roots) = load(
        &[("common.proto", common), ("a.proto", a), ("b.proto", b)],
        &["a.proto", "b.proto"],
    );
    let output = Generation::new(&roots).run(&TypeScriptEmitter::new());

    assert_eq!(output.bindings.matches("class HealthClient").count(), 1);
    assert_eq!(output.bindings.matches("class HealthServer").count(), 1);
    assert_eq!(output.meta.matches("service: \"common.Health\"").count(), 1);
    assert_eq!(output.stats.clients, 3);
    assert!(
        output
            .bindings
            .contains("import { common, a, b } from \"../apis/proto\";\n")
    );
}

#[test]
fn test_message_holding_nested_types_is_imported() {
    let source = r#"
        syntax = "proto3";
        message Outer {
          message Inner {}
        }
        message Res {}
        service Svc {
          rpc Call (Outer.Inner) returns (Res);
          rpc Echo (Outer) returns (Outer);
        }
    "#;
    let output = generate(&[("nested.proto", source)]);

    assert!(
        output
            .bindings
            .contains("import { Outer, Res, IRes, IOuter } from \"../apis/proto\";\n")
    );
    assert!(output.bindings.contains("(message: Outer.IInner)"));
    assert!(
        output
            .meta
            .starts_with("import { Outer, Res } from \"../apis/proto\";\n")
    );
    assert!(output.meta.contains("reqType: Outer.Inner,"));
}

#[test]
fn test_same_leaf_name_in_package_and_root_gets_distinct_codecs() {
    let root_level = r#"
        syntax = "proto3";
        message Msg {}
    "#;
    let packaged = r#"
        syntax = "proto3";
        package a;
        import "root.proto";
        message Msg {}
        service S {
          rpc One (a.Msg) returns (a.Msg);
          rpc Two (.Msg) returns (.Msg);
        }
    "#;
    let (_dir, roots) = load(&[("a.proto", packaged), ("root.proto", root_level)], &["a.proto"]);
    let output = Generation::new(&roots).run(&TypeScriptEmitter::new());

    let client = output.bindings.split("export abstract class").next().unwrap();
    assert_eq!(client.matches("private serializeMsg =").count(), 1);
    assert_eq!(client.matches("private serializeMsg_2 =").count(), 1);
    assert!(client.contains("\"/a.S/One\", this.serializeMsg, this.deserializeMsg,"));
    assert!(client.contains("\"/a.S/Two\", this.serializeMsg_2, this.deserializeMsg_2,"));
}

#[test]
fn test_unresolved_method_with_comment_policy() {
    let source = r#"
        syntax = "proto3";
        package pkg;
        message Req {}
        service Svc {
          rpc Good (Req) returns (Req);
          rpc Bad (Missing) returns (Req);
        }
    "#;
    let (_dir, roots) = load(&[("svc.proto", source)], &["svc.proto"]);

    let silent = Generation::new(&roots).run(&TypeScriptEmitter::new());
    assert!(silent.bindings.contains("  Good(req: pkg.IReq"));
    assert!(!silent.bindings.contains("Bad"));
    assert!(!silent.meta.contains("Bad"));

    let commented = Generation::new(&roots)
        .unresolved(UnresolvedPolicy::Comment)
        .run(&TypeScriptEmitter::new());
    assert_eq!(
        commented
            .bindings
            .matches("  // Bad: skipped, unresolved type Missing\n")
            .count(),
        2
    );
    assert!(!commented.meta.contains("Bad"));
    assert_eq!(commented.diagnostics.len(), 1);
}

#[test]
fn test_custom_modules_and_tab_indent() {
    let (_dir, roots) = load(&[("greeter.proto", GREETER)], &["greeter.proto"]);
    let emitter = TypeScriptEmitter::new()
        .transport("@grpc/grpc-js")
        .observable("rxjs/internal/Observable")
        .include("./proto")
        .with_indent(Indent::Tab);
    let output = Generation::new(&roots).run(&emitter);

    assert!(
        output
            .bindings
            .starts_with("import * as grpc from \"@grpc/grpc-js\";\nimport { Observable } from \"rxjs/internal/Observable\";\n")
    );
    assert!(output.bindings.contains("} from \"./proto\";\n"));
    assert!(output.bindings.contains("\n\tconstructor(endpoint: string"));
    assert!(output.meta.starts_with("import { HelloRequest, HelloResponse } from \"./proto\";\n"));
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let (_dir, roots) = load(&[("shapes.proto", SHAPES)], &["shapes.proto"]);
    let emitter = TypeScriptEmitter::new();
    let first = Generation::new(&roots).run(&emitter);
    let second = Generation::new(&roots).run(&emitter);
    assert_eq!(first.bindings, second.bindings);
    assert_eq!(first.meta, second.meta);
}

#[test]
fn test_empty_schema_renders_headers_only() {
    let output = generate(&[("empty.proto", "syntax = \"proto3\";\n")]);
    assert_eq!(
        output.bindings,
        "import * as grpc from \"grpc\";\nimport { Observable } from \"rxjs\";\n"
    );
    assert_eq!(output.meta, "export default [];\n");
}
