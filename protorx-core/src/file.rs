use std::{
    io::Write,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already had the exact content, left untouched
    Unchanged,
}

/// A generated file
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Write the file, skipping the write when the content on disk is identical.
    ///
    /// Generation is deterministic, so re-running over unchanged schemas
    /// keeps modification times stable for downstream build tools.
    pub fn write(&self) -> Result<WriteResult> {
        if std::fs::read_to_string(&self.path).is_ok_and(|existing| existing == self.content) {
            return Ok(WriteResult::Unchanged);
        }
        write_file(&self.path, &self.content)
            .wrap_err_with(|| format!("failed to write '{}'", self.path.display()))?;
        Ok(WriteResult::Written)
    }
}

/// Destination of a rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Standard output, locked for the duration of the write.
    Stdout,
    /// A file on disk; parent directories are created on demand.
    File(PathBuf),
}

impl OutputSink {
    /// Pick a sink from an optional path, defaulting to stdout.
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::File(p.to_path_buf()),
            None => Self::Stdout,
        }
    }

    /// Write the whole content and flush before returning.
    pub fn emit(&self, content: &str) -> Result<WriteResult> {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(content.as_bytes())
                    .wrap_err("failed to write to stdout")?;
                out.flush().wrap_err("failed to flush stdout")?;
                Ok(WriteResult::Written)
            }
            Self::File(path) => File::new(path, content).write(),
        }
    }

    /// Human readable name for reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "<stdout>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}
