use protorx_codegen::{
    Emitter, Generation, GlobalRegistry, Severity, UnresolvedPolicy,
    model::{MethodShape, ServiceModel},
};
use protorx_schema::{MessageType, Node, Root, Service};

/// Renders one line per service so traversal order is easy to assert on.
struct LineEmitter;

impl LineEmitter {
    fn methods(service: &ServiceModel) -> String {
        let mut parts: Vec<String> = service
            .methods
            .iter()
            .map(|m| format!("{}:{}", m.name, m.shape))
            .collect();
        parts.extend(service.skipped.iter().map(|s| format!("!{}", s.name)));
        parts.join(",")
    }
}

impl Emitter for LineEmitter {
    fn language(&self) -> &'static str {
        "lines"
    }

    fn bindings_header(&self, registry: &GlobalRegistry) -> String {
        let namespaces: Vec<_> = registry.namespaces.iter().map(String::as_str).collect();
        format!("header {}\n", namespaces.join(" "))
    }

    fn client(&self, service: &ServiceModel) -> String {
        format!(
            "client {} [{}] codecs={}\n",
            service.qualified_name(),
            Self::methods(service),
            service.codecs.len()
        )
    }

    fn server(&self, service: &ServiceModel) -> String {
        format!(
            "server {} [{}] codecs={}\n",
            service.qualified_name(),
            Self::methods(service),
            service.codecs.len()
        )
    }

    fn meta_header(&self, _registry: &GlobalRegistry) -> String {
        "meta\n".to_string()
    }

    fn meta_body(&self, services: &[ServiceModel]) -> String {
        services
            .iter()
            .map(|s| format!("entry {}\n", s.qualified_name()))
            .collect()
    }
}

fn root(package: &[&str], service: &str, methods: &[(&str, &str, &str, bool, bool)]) -> Root {
    let mut root = Root::new();
    let (nested, full) = root.define_namespace(package).unwrap();
    for name in ["Req", "Res"] {
        nested.insert(name.into(), Node::Type(MessageType::new(name, &full)));
    }
    let mut svc = Service::new(service, &full);
    for (name, req, res, req_stream, res_stream) in methods {
        svc.add_method(*name, *req, *req_stream, *res, *res_stream);
    }
    nested.insert(service.into(), Node::Service(svc));
    root.resolve_all();
    root
}

#[test]
fn test_generators_run_in_order_over_all_roots() {
    let roots = [
        root(&["a"], "First", &[("Call", "Req", "Res", false, false)]),
        root(&["b"], "Second", &[("Watch", "Req", "Res", false, true)]),
    ];
    let output = Generation::new(&roots).run(&LineEmitter);

    assert_eq!(
        output.bindings,
        "header a b\n\
         \n\
         client a.First [Call:unary] codecs=2\n\
         \n\
         client b.Second [Watch:server streaming] codecs=2\n\
         \n\
         server a.First [Call:unary] codecs=4\n\
         \n\
         server b.Second [Watch:server streaming] codecs=4\n"
    );
    assert_eq!(output.meta, "meta\n\nentry a.First\nentry b.Second\n");
    assert_eq!(output.stats.clients, 2);
    assert_eq!(output.stats.servers, 2);
    assert_eq!(output.stats.meta_entries, 2);
}

#[test]
fn test_service_shared_by_roots_is_emitted_once() {
    let shared = root(&["shared"], "Svc", &[("Call", "Req", "Res", false, false)]);
    let roots = [shared.clone(), shared];
    let output = Generation::new(&roots).run(&LineEmitter);

    assert_eq!(output.bindings.matches("client shared.Svc").count(), 1);
    assert_eq!(output.bindings.matches("server shared.Svc").count(), 1);
    assert_eq!(output.meta.matches("entry shared.Svc").count(), 1);
}

#[test]
fn test_output_is_identical_across_runs() {
    let roots = [root(
        &["pkg"],
        "Svc",
        &[
            ("A", "Req", "Res", false, false),
            ("B", "Req", "Res", true, true),
        ],
    )];
    let first = Generation::new(&roots).run(&LineEmitter);
    let second = Generation::new(&roots).run(&LineEmitter);
    assert_eq!(first.bindings, second.bindings);
    assert_eq!(first.meta, second.meta);
}

#[test]
fn test_unresolved_method_is_excluded_silently_by_default() {
    let roots = [root(
        &["pkg"],
        "Svc",
        &[
            ("Good", "Req", "Res", false, false),
            ("Bad", "Missing", "Res", false, false),
        ],
    )];
    let output = Generation::new(&roots).run(&LineEmitter);

    assert!(output.bindings.contains("client pkg.Svc [Good:unary]"));
    assert!(!output.bindings.contains("Bad"));
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Info);
    assert!(!output.diagnostics.iter().any(|d| d.severity.is_warning()));
    assert_eq!(output.stats.skipped_methods, 1);
}

#[test]
fn test_warn_policy_records_one_diagnostic_per_method() {
    let roots = [root(
        &["pkg"],
        "Svc",
        &[("Bad", "Missing", "AlsoMissing", false, false)],
    )];
    let output = Generation::new(&roots)
        .unresolved(UnresolvedPolicy::Warn)
        .run(&LineEmitter);

    assert_eq!(output.diagnostics.len(), 1);
    let diag = &output.diagnostics[0];
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.location.as_deref(), Some("pkg.Svc.Bad"));
    assert_eq!(
        diag.message,
        "method skipped, unresolved type `Missing`, `AlsoMissing`"
    );
    assert!(!output.bindings.contains("!Bad"));
}

#[test]
fn test_comment_policy_keeps_skipped_methods_for_emitters() {
    let roots = [root(
        &["pkg"],
        "Svc",
        &[
            ("Bad", "Missing", "Res", false, false),
            ("Good", "Req", "Res", true, false),
        ],
    )];
    let output = Generation::new(&roots)
        .unresolved(UnresolvedPolicy::Comment)
        .run(&LineEmitter);

    assert!(
        output
            .bindings
            .contains("client pkg.Svc [Good:client streaming,!Bad]")
    );
    assert!(
        output
            .bindings
            .contains("server pkg.Svc [Good:client streaming,!Bad]")
    );
    assert_eq!(output.diagnostics.len(), 1);
}

#[test]
fn test_every_shape_reaches_the_emitter() {
    let methods: Vec<_> = MethodShape::ALL
        .iter()
        .map(|shape| {
            (
                shape.as_str(),
                "Req",
                "Res",
                shape.request_stream(),
                shape.response_stream(),
            )
        })
        .collect();
    let roots = [root(&["pkg"], "Svc", &methods)];
    let output = Generation::new(&roots).run(&LineEmitter);

    for shape in MethodShape::ALL {
        assert!(output.bindings.contains(&format!("{}:{}", shape.as_str(), shape)));
    }
}
