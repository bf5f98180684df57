use protorx_core::{interface_name, qualified_name, rpc_path};
use protorx_schema::{Method, Service, TypeRef};

use super::{CodecTable, MethodShape};

/// The generator a traversal runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Client,
    Server,
    Meta,
}

impl GeneratorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorKind::Client => "client",
            GeneratorKind::Server => "server",
            GeneratorKind::Meta => "meta",
        }
    }
}

/// A resolved message type as seen by emitters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub name: String,
    pub full_name: String,
}

impl MessageRef {
    pub fn new(full_name: impl Into<String>) -> Self {
        TypeRef::new(full_name).into()
    }

    /// Namespaced name usable in emitted code (`foo.bar.Msg`).
    pub fn qualified(&self) -> &str {
        qualified_name(&self.full_name)
    }

    /// Name of the plain-data interface (`foo.bar.IMsg`).
    pub fn interface(&self) -> String {
        interface_name(&self.full_name)
    }

    pub fn is_root_level(&self) -> bool {
        self.full_name.rfind('.') == Some(0)
    }
}

impl From<&TypeRef> for MessageRef {
    fn from(t: &TypeRef) -> Self {
        Self {
            name: t.name.clone(),
            full_name: t.full_name.clone(),
        }
    }
}

impl From<TypeRef> for MessageRef {
    fn from(t: TypeRef) -> Self {
        Self {
            name: t.name,
            full_name: t.full_name,
        }
    }
}

/// A fully resolved method ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    pub name: String,
    pub full_name: String,
    /// Wire-level routing key, e.g. `/foo.bar.Svc/Watch`.
    pub rpc_path: String,
    pub shape: MethodShape,
    pub request: MessageRef,
    pub response: MessageRef,
}

impl MethodModel {
    /// Build the model of a method, or `None` if a type is unresolved.
    pub fn from_method(method: &Method) -> Option<Self> {
        let (request, response) = method.resolved()?;
        Some(Self {
            name: method.name.clone(),
            full_name: method.full_name.clone(),
            rpc_path: rpc_path(&method.full_name),
            shape: MethodShape::from_flags(method.request_stream, method.response_stream),
            request: request.into(),
            response: response.into(),
        })
    }
}

/// A method left out of the output because a type did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMethod {
    pub name: String,
    pub full_name: String,
    /// Type names, as written in the schema, that failed to resolve.
    pub unresolved: Vec<String>,
}

impl SkippedMethod {
    fn from_method(method: &Method) -> Self {
        let mut unresolved = Vec::new();
        if method.resolved_request.is_none() {
            unresolved.push(method.request_type.clone());
        }
        if method.resolved_response.is_none() {
            unresolved.push(method.response_type.clone());
        }
        Self {
            name: method.name.clone(),
            full_name: method.full_name.clone(),
            unresolved,
        }
    }
}

/// Everything an emitter needs to render one service.
#[derive(Debug, Clone)]
pub struct ServiceModel {
    pub name: String,
    pub full_name: String,
    /// Fully resolved methods in declaration order.
    pub methods: Vec<MethodModel>,
    /// Methods excluded because of unresolved types, in declaration order.
    pub skipped: Vec<SkippedMethod>,
    pub codecs: CodecTable,
}

impl ServiceModel {
    /// Build the model of `service` with the codec bindings `kind` needs.
    pub fn from_service(service: &Service, kind: GeneratorKind) -> Self {
        let mut methods = Vec::new();
        let mut skipped = Vec::new();
        for method in &service.methods {
            match MethodModel::from_method(method) {
                Some(model) => methods.push(model),
                None => skipped.push(SkippedMethod::from_method(method)),
            }
        }

        let codecs = CodecTable::bind(&methods, kind);
        Self {
            name: service.name.clone(),
            full_name: service.full_name.clone(),
            methods,
            skipped,
            codecs,
        }
    }

    /// Namespaced service name (`foo.bar.Svc`).
    pub fn qualified_name(&self) -> &str {
        qualified_name(&self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(service: &mut Service) {
        for method in &mut service.methods {
            if method.request_type != "Missing" {
                method.resolved_request = Some(TypeRef::new(format!(".pkg.{}", method.request_type)));
            }
            if method.response_type != "Missing" {
                method.resolved_response =
                    Some(TypeRef::new(format!(".pkg.{}", method.response_type)));
            }
        }
    }

    #[test]
    fn test_message_ref_names() {
        let m = MessageRef::new(".foo.bar.Msg");
        assert_eq!(m.name, "Msg");
        assert_eq!(m.qualified(), "foo.bar.Msg");
        assert_eq!(m.interface(), "foo.bar.IMsg");
        assert!(!m.is_root_level());
        assert!(MessageRef::new(".Msg").is_root_level());
    }

    #[test]
    fn test_service_model_splits_skipped_methods() {
        let mut service = Service::new("Svc", ".pkg");
        service.add_method("Good", "Req", false, "Res", true);
        service.add_method("Bad", "Missing", false, "Res", false);
        service.add_method("AlsoGood", "Req", true, "Res", true);
        resolved(&mut service);

        let model = ServiceModel::from_service(&service, GeneratorKind::Client);
        let names: Vec<_> = model.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Good", "AlsoGood"]);
        assert_eq!(model.skipped.len(), 1);
        assert_eq!(model.skipped[0].full_name, ".pkg.Svc.Bad");
        assert_eq!(model.skipped[0].unresolved, ["Missing"]);
        assert_eq!(model.qualified_name(), "pkg.Svc");
    }

    #[test]
    fn test_method_model_shape_and_path() {
        let mut service = Service::new("Svc", ".pkg");
        service.add_method("Watch", "Req", false, "Res", true);
        resolved(&mut service);

        let model = MethodModel::from_method(&service.methods[0]).unwrap();
        assert_eq!(model.rpc_path, "/pkg.Svc/Watch");
        assert_eq!(model.shape, MethodShape::ServerStreaming);
        assert_eq!(model.request.qualified(), "pkg.Req");
    }
}
