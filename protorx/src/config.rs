//! `protorx.toml` loading and merging with command-line values.

use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use protorx_codegen::{UnresolvedPolicy, builder::Indent};
use protorx_codegen_typescript::{
    DEFAULT_INCLUDE, DEFAULT_OBSERVABLE, DEFAULT_TRANSPORT, TypeScriptEmitter,
};
use serde::Deserialize;
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "protorx.toml";

pub type Result<T> = std::result::Result<T, Box<ConfigError>>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(protorx::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(protorx::config::parse))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported indent width {width}")]
    #[diagnostic(
        code(protorx::config::indent),
        help("use 2, 4 or 8 spaces, or \"tab\"")
    )]
    Indent { width: u8 },

    #[error("no schema files given")]
    #[diagnostic(
        code(protorx::usage),
        help("pass schema paths as arguments or list them under `schemas` in protorx.toml")
    )]
    NoSchemas,
}

/// Indentation as written in the config file: a space count or `"tab"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IndentSetting {
    Spaces(u8),
    Keyword(IndentKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentKeyword {
    Tab,
}

impl TryFrom<IndentSetting> for Indent {
    type Error = Box<ConfigError>;

    fn try_from(setting: IndentSetting) -> Result<Self> {
        match setting {
            IndentSetting::Spaces(width @ (2 | 4 | 8)) => Ok(Indent::Spaces(width)),
            IndentSetting::Spaces(width) => Err(Box::new(ConfigError::Indent { width })),
            IndentSetting::Keyword(IndentKeyword::Tab) => Ok(Indent::Tab),
        }
    }
}

/// `[typescript]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeScriptConfig {
    pub transport: Option<String>,
    pub observable: Option<String>,
    pub indent: Option<IndentSetting>,
}

/// Contents of a `protorx.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub include: Option<String>,
    pub out: Option<PathBuf>,
    pub meta_out: Option<PathBuf>,
    #[serde(default)]
    pub schemas: Vec<PathBuf>,
    #[serde(default)]
    pub proto_paths: Vec<PathBuf>,
    pub unresolved: Option<UnresolvedPolicy>,
    #[serde(default)]
    pub typescript: TypeScriptConfig,
}

impl Config {
    /// Load the explicit config file, or `protorx.toml` when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::open(path),
            None if Path::new(DEFAULT_CONFIG).is_file() => Self::open(DEFAULT_CONFIG),
            None => Ok(Self::default()),
        }
    }

    /// Read a config file; relative paths inside it are taken from its directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            Box::new(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let config = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(file = %path.display(), "loaded config");
        Ok(config.rebase(path.parent().unwrap_or_else(|| Path::new(""))))
    }

    pub fn parse(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| {
            Box::new(ConfigError::Parse {
                filename: filename.to_string(),
                src: NamedSource::new(filename, content.to_string()),
                span: source.span().map(SourceSpan::from),
                source,
            })
        })
    }

    fn rebase(mut self, dir: &Path) -> Self {
        self.out = self.out.map(|p| dir.join(p));
        self.meta_out = self.meta_out.map(|p| dir.join(p));
        self.schemas = self.schemas.iter().map(|p| dir.join(p)).collect();
        self.proto_paths = self.proto_paths.iter().map(|p| dir.join(p)).collect();
        self
    }

    /// Apply command-line values on top of the file values.
    pub fn merge(self, overrides: Overrides) -> Result<Settings> {
        let schemas = if overrides.schemas.is_empty() {
            self.schemas
        } else {
            overrides.schemas
        };
        if schemas.is_empty() {
            return Err(Box::new(ConfigError::NoSchemas));
        }

        let mut proto_paths = overrides.proto_paths;
        proto_paths.extend(self.proto_paths);

        let indent = match self.typescript.indent {
            Some(setting) => Indent::try_from(setting)?,
            None => Indent::TYPESCRIPT,
        };

        Ok(Settings {
            schemas,
            proto_paths,
            include: overrides
                .include
                .or(self.include)
                .unwrap_or_else(|| DEFAULT_INCLUDE.to_string()),
            out: overrides.out.or(self.out),
            meta_out: overrides.meta_out.or(self.meta_out),
            unresolved: overrides.unresolved.or(self.unresolved).unwrap_or_default(),
            transport: self
                .typescript
                .transport
                .unwrap_or_else(|| DEFAULT_TRANSPORT.to_string()),
            observable: self
                .typescript
                .observable
                .unwrap_or_else(|| DEFAULT_OBSERVABLE.to_string()),
            indent,
        })
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub schemas: Vec<PathBuf>,
    pub proto_paths: Vec<PathBuf>,
    pub include: Option<String>,
    pub out: Option<PathBuf>,
    pub meta_out: Option<PathBuf>,
    pub unresolved: Option<UnresolvedPolicy>,
}

/// Effective settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub schemas: Vec<PathBuf>,
    /// Extra import search directories, command line first.
    pub proto_paths: Vec<PathBuf>,
    pub include: String,
    /// Bindings file; stdout when unset.
    pub out: Option<PathBuf>,
    /// Manifest file; not written when unset.
    pub meta_out: Option<PathBuf>,
    pub unresolved: UnresolvedPolicy,
    pub transport: String,
    pub observable: String,
    pub indent: Indent,
}

impl Settings {
    pub fn emitter(&self) -> TypeScriptEmitter {
        TypeScriptEmitter::new()
            .transport(&self.transport)
            .observable(&self.observable)
            .include(&self.include)
            .with_indent(self.indent)
    }
}
