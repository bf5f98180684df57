//! Generate operation - bindings and manifest from loaded schemas.

use eyre::{Context, Result};
use protorx_codegen::{Generation, GenerationStats};
use protorx_core::OutputSink;
use protorx_schema::Root;

use crate::{
    config::Settings,
    reports::{GenerateReport, GenerationResult, PreviewFile, WrittenFile},
};

/// Label of the manifest in previews when no manifest path is set.
const MANIFEST_LABEL: &str = "manifest";

/// Options for the generate operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// Renders bindings and manifest, then writes them to their sinks or, on a
/// dry run, hands them back for preview.
pub fn generate(roots: &[Root], settings: &Settings, opts: GenerateOptions) -> Result<GenerateReport> {
    let emitter = settings.emitter();
    let output = Generation::new(roots)
        .unresolved(settings.unresolved)
        .run(&emitter);

    let warnings = output
        .diagnostics
        .iter()
        .filter(|d| d.severity.is_warning())
        .map(|d| match &d.location {
            Some(loc) => format!("{} (at {})", d.message, loc),
            None => d.message.clone(),
        })
        .collect();

    let bindings = OutputSink::from_path(settings.out.as_deref());
    let result = if opts.dry_run {
        let meta_label = settings
            .meta_out
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| MANIFEST_LABEL.to_string());
        GenerationResult::Preview(vec![
            PreviewFile {
                path: bindings.describe(),
                content: output.bindings,
            },
            PreviewFile {
                path: meta_label,
                content: output.meta,
            },
        ])
    } else {
        let mut files = Vec::new();
        let status = bindings
            .emit(&output.bindings)
            .wrap_err("Failed to write bindings")?;
        files.push(WrittenFile {
            path: bindings.describe(),
            status,
            summary: bindings_summary(&output.stats),
        });

        if let Some(meta_out) = &settings.meta_out {
            let sink = OutputSink::File(meta_out.clone());
            let status = sink
                .emit(&output.meta)
                .wrap_err("Failed to write manifest")?;
            files.push(WrittenFile {
                path: sink.describe(),
                status,
                summary: count(output.stats.meta_entries, "service"),
            });
        }
        GenerationResult::Written(files)
    };

    Ok(GenerateReport {
        warnings,
        stats: output.stats,
        result,
    })
}

fn bindings_summary(stats: &GenerationStats) -> String {
    let mut summary = format!(
        "{}, {}",
        count(stats.clients, "client"),
        count(stats.servers, "server")
    );
    if stats.skipped_methods > 0 {
        summary.push_str(&format!(
            ", {} skipped",
            count(stats.skipped_methods, "method")
        ));
    }
    summary
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}
