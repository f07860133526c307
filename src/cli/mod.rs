//! Command-line interface

pub mod output;

use crate::{
    execution::{ArtifactUploader, StepEngine},
    runner::CommandRunner,
};
use clap::{error::ErrorKind, Parser};
use output::Reporter;
use std::ffi::OsString;
use std::io::Write;

/// CoreDNS CI component: clone, then build, test or release
///
/// Both inputs are normally supplied by the orchestrator as environment
/// variables.
#[derive(Debug, Parser, Clone)]
#[command(name = "coredns-ci")]
#[command(version)]
#[command(about = "CI step that clones CoreDNS and runs build, test or release", long_about = None)]
pub struct Cli {
    /// Whitespace-separated key=value tokens: coredns=<uri> action=<build|test|release> release=<domain/namespace/repository/tag>
    #[arg(long, env = "CO_DATA", hide_env_values = true, value_parser = clap::value_parser!(OsString))]
    pub data: Option<OsString>,

    /// Go workspace the repository is cloned into
    #[arg(long, env = "GOPATH", value_parser = clap::value_parser!(OsString))]
    pub gopath: Option<OsString>,
}

impl Cli {
    /// Parse CLI arguments from environment, leaving error handling to the caller
    pub fn try_from_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// `CO_DATA`, with invalid UTF-8 replaced rather than rejected
    pub fn data_lossy(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|data| data.to_string_lossy().into_owned())
    }

    pub fn gopath_lossy(&self) -> Option<String> {
        self.gopath
            .as_ref()
            .map(|gopath| gopath.to_string_lossy().into_owned())
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

/// Whether a parse "error" is really `--help` or `--version` output
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

/// Report an argument or environment error as a failed step
pub fn report_usage_error<O: Write, E: Write>(
    err: &clap::Error,
    reporter: &mut Reporter<O, E>,
) -> i32 {
    let rendered = err.to_string();
    let message = rendered.lines().next().unwrap_or_default();
    reporter.fail(format_args!("Invalid arguments: {}", message))
}

/// Run the step and report its outcome, returning the process exit code
///
/// Nothing here exits the process; the caller owns that decision.
pub async fn run_step<R, U, O, E>(
    data: Option<&str>,
    engine: &StepEngine<R, U>,
    reporter: &mut Reporter<O, E>,
) -> i32
where
    R: CommandRunner,
    U: ArtifactUploader,
    O: Write,
    E: Write,
{
    let data = match data.filter(|data| !data.is_empty()) {
        Some(data) => data,
        None => return reporter.missing_data(),
    };

    let result = engine.execute(data, reporter).await;
    reporter.finish(&result)
}
