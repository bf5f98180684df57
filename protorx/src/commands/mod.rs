mod generate;

use clap::Parser;
use eyre::Result;
use generate::GenerateCommand;

use crate::telemetry;

/// Extension trait for exiting on schema and config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T, E> UnwrapOrExit<T> for std::result::Result<T, Box<E>>
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "protorx")]
#[command(version)]
#[command(about = "Generate rxjs gRPC bindings for TypeScript from protobuf schemas")]
pub(crate) struct Cli {
    #[command(flatten)]
    generate: GenerateCommand,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        telemetry::init(self.verbose);
        self.generate.run()
    }
}
