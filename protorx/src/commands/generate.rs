use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use protorx_codegen::UnresolvedPolicy;
use protorx_schema::Loader;

use super::UnwrapOrExit;
use crate::{
    config::{Config, Overrides},
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Schema files (.proto or JSON descriptors); replaces `schemas` from the config
    pub schemas: Vec<PathBuf>,

    /// Path to the config file (defaults to ./protorx.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Module path of the generated message types [default: ../apis/proto]
    #[arg(short, long)]
    pub include: Option<String>,

    /// Bindings file (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Manifest file (not written when omitted)
    #[arg(short, long)]
    pub meta_out: Option<PathBuf>,

    /// Extra directory to search for imports (repeatable)
    #[arg(short = 'I', long = "proto-path")]
    pub proto_paths: Vec<PathBuf>,

    /// What to do with methods whose types do not resolve: skip, warn or comment
    #[arg(long)]
    pub unresolved: Option<UnresolvedPolicy>,

    /// Print both outputs instead of writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Load schemas and write bindings
    pub fn run(&self) -> Result<()> {
        let config = Config::discover(self.config.as_deref()).unwrap_or_exit();
        let settings = config.merge(self.overrides()).unwrap_or_exit();

        let roots = Loader::new()
            .include_dirs(settings.proto_paths.clone())
            .load_all(&settings.schemas)
            .unwrap_or_exit();

        let report = ops::generate(
            &roots,
            &settings,
            GenerateOptions {
                dry_run: self.dry_run,
            },
        )?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            schemas: self.schemas.clone(),
            proto_paths: self.proto_paths.clone(),
            include: self.include.clone(),
            out: self.out.clone(),
            meta_out: self.meta_out.clone(),
            unresolved: self.unresolved,
        }
    }
}
