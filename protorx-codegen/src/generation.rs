//! Generation driver: walks every root once per generator and composes output.

use std::{fmt, str::FromStr};

use indexmap::IndexSet;
use protorx_schema::Root;
use serde::Deserialize;

use crate::{
    Emitter,
    collect::GlobalRegistry,
    diagnostic::Diagnostic,
    model::{GeneratorKind, ServiceModel},
    walk::{Visited, walk},
};

/// What happens to methods whose request or response type did not resolve.
///
/// The method is left out of every generated file in all cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Leave the method out, logging at debug level. The diagnostic is info.
    #[default]
    Skip,
    /// Log a warning. The diagnostic is a warning.
    Warn,
    /// Like `Warn`, and leave a placeholder comment in the client and server.
    Comment,
}

impl UnresolvedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnresolvedPolicy::Skip => "skip",
            UnresolvedPolicy::Warn => "warn",
            UnresolvedPolicy::Comment => "comment",
        }
    }
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UnresolvedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(UnresolvedPolicy::Skip),
            "warn" => Ok(UnresolvedPolicy::Warn),
            "comment" => Ok(UnresolvedPolicy::Comment),
            _ => Err(format!(
                "unknown policy '{}', expected 'skip', 'warn' or 'comment'",
                s
            )),
        }
    }
}

/// Service counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub clients: usize,
    pub servers: usize,
    pub meta_entries: usize,
    /// Distinct methods left out because of unresolved types.
    pub skipped_methods: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Client and server bindings.
    pub bindings: String,
    /// Metadata manifest.
    pub meta: String,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: GenerationStats,
}

/// A generation run over a set of resolved schema roots.
///
/// # Example
///
/// ```ignore
/// let output = Generation::new(&roots)
///     .unresolved(UnresolvedPolicy::Warn)
///     .run(&TypeScriptEmitter::new());
/// print!("{}", output.bindings);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Generation<'a> {
    roots: &'a [Root],
    unresolved: UnresolvedPolicy,
}

impl<'a> Generation<'a> {
    pub fn new(roots: &'a [Root]) -> Self {
        Self {
            roots,
            unresolved: UnresolvedPolicy::default(),
        }
    }

    pub fn unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    /// Run the client, server and meta generators, in that order, over every root.
    pub fn run(&self, emitter: &dyn Emitter) -> GeneratedOutput {
        let registry = GlobalRegistry::collect(self.roots);
        let mut run = RunState::new(self.unresolved);

        let clients = run.models(self.roots, GeneratorKind::Client);
        let servers = run.models(self.roots, GeneratorKind::Server);
        let meta = run.models(self.roots, GeneratorKind::Meta);

        let mut bindings = emitter.bindings_header(&registry);
        for service in &clients {
            append_section(&mut bindings, &emitter.client(service));
        }
        for service in &servers {
            append_section(&mut bindings, &emitter.server(service));
        }

        let mut meta_text = emitter.meta_header(&registry);
        append_section(&mut meta_text, &emitter.meta_body(&meta));

        tracing::debug!(
            language = emitter.language(),
            clients = clients.len(),
            servers = servers.len(),
            meta = meta.len(),
            "generation finished"
        );

        GeneratedOutput {
            bindings,
            meta: meta_text,
            diagnostics: run.diagnostics,
            stats: GenerationStats {
                clients: clients.len(),
                servers: servers.len(),
                meta_entries: meta.len(),
                skipped_methods: run.reported.len(),
            },
        }
    }
}

/// Append `section`, separated from earlier text by a blank line.
fn append_section(out: &mut String, section: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(section);
}

struct RunState {
    policy: UnresolvedPolicy,
    diagnostics: Vec<Diagnostic>,
    /// Skipped methods already reported by an earlier generator.
    reported: IndexSet<String>,
}

impl RunState {
    fn new(policy: UnresolvedPolicy) -> Self {
        Self {
            policy,
            diagnostics: Vec::new(),
            reported: IndexSet::new(),
        }
    }

    fn models(&mut self, roots: &[Root], kind: GeneratorKind) -> Vec<ServiceModel> {
        let mut visited = Visited::new(kind);
        let mut models = Vec::new();
        for root in roots {
            walk(root, &mut visited, |service| {
                tracing::debug!(
                    generator = kind.as_str(),
                    service = %service.full_name,
                    "emitting service"
                );
                let mut model = ServiceModel::from_service(service, kind);
                self.report_skipped(&model);
                if self.policy != UnresolvedPolicy::Comment {
                    model.skipped.clear();
                }
                models.push(model);
            });
        }
        models
    }

    fn report_skipped(&mut self, model: &ServiceModel) {
        for skipped in &model.skipped {
            if !self.reported.insert(skipped.full_name.clone()) {
                continue;
            }
            let location = protorx_core::qualified_name(&skipped.full_name);
            let message = format!(
                "method skipped, unresolved type `{}`",
                skipped.unresolved.join("`, `")
            );
            let diagnostic = match self.policy {
                UnresolvedPolicy::Skip => {
                    tracing::debug!(method = location, "skipping method with unresolved types");
                    Diagnostic::info(message)
                }
                UnresolvedPolicy::Warn | UnresolvedPolicy::Comment => {
                    tracing::warn!(method = location, "skipping method with unresolved types");
                    Diagnostic::warning(message)
                }
            };
            self.diagnostics.push(diagnostic.at(location));
        }
    }
}
