//! Generate command report data structures.

use protorx_codegen::GenerationStats;
use protorx_core::WriteResult;

use super::output::{Output, Report};

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Warning messages from the run.
    pub warnings: Vec<String>,
    pub stats: GenerationStats,
    /// Files written or previewed.
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Outputs were written to their sinks.
    Written(Vec<WrittenFile>),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// An output that was written.
#[derive(Debug)]
pub struct WrittenFile {
    pub path: String,
    pub status: WriteResult,
    /// What the file holds, e.g. "2 clients, 2 servers".
    pub summary: String,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        match &self.result {
            GenerationResult::Written(files) => {
                for file in files {
                    let verb = match file.status {
                        WriteResult::Written => "Wrote",
                        WriteResult::Unchanged => "Unchanged",
                    };
                    out.status(verb, &format!("{} ({})", file.path, file.summary));
                }
            }
            GenerationResult::Preview(files) => {
                for file in files {
                    out.divider(&file.path);
                    out.preformatted(&file.content);
                }
                out.divider("Summary");
                out.preformatted(&format!(
                    "{} services, nothing written",
                    self.stats.meta_entries
                ));
            }
        }
    }
}
