//! Loading schema files into reflection roots.

use std::path::{Path, PathBuf};

use crate::{
    Error, Result,
    error::SourceContext,
    json,
    proto::{self, Decl},
    reflect::{EnumType, MessageType, Nested, Node, Root, Service},
};

/// Imports under this prefix may be missing from disk; they only carry
/// well-known types the generator never references by declaration.
const WELL_KNOWN_PREFIX: &str = "google/protobuf/";

/// Loads schema files, one [`Root`] per entry file.
///
/// `.json` files are read as protobuf JSON descriptors, everything else as
/// `.proto` source. Imports of `.proto` files are merged into the importing root.
///
/// # Example
///
/// ```ignore
/// let mut root = Loader::new().include_dir("protos").load("protos/greeter.proto")?;
/// root.resolve_all();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    include_dirs: Vec<PathBuf>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory searched for imports after the importing file's directory.
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Add several import directories.
    pub fn include_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.include_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Load one entry file (and its imports) into a fresh root.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Root> {
        let mut root = Root::new();
        self.load_into(&mut root, path.as_ref())?;
        Ok(root)
    }

    /// Load and resolve every entry file, each into its own root.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<Root>> {
        paths
            .iter()
            .map(|path| {
                let mut root = self.load(path)?;
                let unresolved = root.resolve_all();
                tracing::debug!(
                    file = %path.display(),
                    unresolved,
                    "resolved schema root"
                );
                Ok(root)
            })
            .collect()
    }

    fn load_into(&self, root: &mut Root, path: &Path) -> Result<()> {
        if root.has_file(path) {
            return Ok(());
        }
        root.add_file(path);

        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        tracing::info!(file = %path.display(), "loading schema");

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            return json::load_into(root, &content, path);
        }

        let ctx = SourceContext::new(content, path.display().to_string());
        let file = proto::parse(&ctx)?;

        for import in &file.imports {
            match self.find_import(path, &import.path) {
                Some(found) => self.load_into(root, &found)?,
                None if import.path.starts_with(WELL_KNOWN_PREFIX) => {
                    tracing::debug!(import = %import.path, "skipping well-known import");
                }
                None => return Err(ctx.import_not_found(&import.path, import.span)),
            }
        }

        let package: Vec<&str> = file.package.iter().map(String::as_str).collect();
        let (nested, full_name) = root
            .define_namespace(&package)
            .map_err(|dup| Error::duplicate_name(dup.0, path))?;
        insert_decls(nested, &full_name, file.decls, path)
    }

    fn find_import(&self, importer: &Path, import: &str) -> Option<PathBuf> {
        let base = importer.parent().unwrap_or_else(|| Path::new(""));
        std::iter::once(base)
            .chain(self.include_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(import))
            .find(|candidate| candidate.is_file())
    }
}

/// Load a single schema file with default settings.
pub fn load(path: impl AsRef<Path>) -> Result<Root> {
    Loader::new().load(path)
}

fn insert_decls(nested: &mut Nested, parent: &str, decls: Vec<Decl>, path: &Path) -> Result<()> {
    for decl in decls {
        let node = match decl {
            Decl::Message {
                name,
                nested: children,
            } => {
                let mut message = MessageType::new(name, parent);
                let full_name = message.full_name.clone();
                insert_decls(&mut message.nested, &full_name, children, path)?;
                Node::Type(message)
            }
            Decl::Enum { name } => Node::Enum(EnumType::new(name, parent)),
            Decl::Service { name, methods } => {
                let mut service = Service::new(name, parent);
                for rpc in methods {
                    service.add_method(
                        rpc.name,
                        rpc.request_type,
                        rpc.request_stream,
                        rpc.response_type,
                        rpc.response_stream,
                    );
                }
                Node::Service(service)
            }
        };

        if let Some(existing) = nested.get(node.name()) {
            return Err(Error::duplicate_name(existing.full_name(), path));
        }
        nested.insert(node.name().to_string(), node);
    }
    Ok(())
}
