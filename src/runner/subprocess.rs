//! Subprocess runner backed by `tokio::process`

use crate::runner::{CommandError, CommandOutput, CommandRunner, CommandSpec, OutputMode};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands as child processes
///
/// Streamed commands inherit stdout/stderr so `git` and `make` output reaches
/// the orchestrator's log as it is produced.
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!("Spawning {} (cwd: {:?})", spec, spec.current_dir);

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let spawn_error = |source| CommandError::Spawn {
            program: spec.program.clone(),
            source,
        };

        let output = match spec.output {
            OutputMode::Stream => {
                let status = command
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await
                    .map_err(spawn_error)?;
                CommandOutput {
                    code: status.code(),
                    ..Default::default()
                }
            }
            OutputMode::Capture => {
                let output = command.output().await.map_err(spawn_error)?;
                CommandOutput {
                    code: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                }
            }
        };

        if !output.success() {
            warn!("{} exited with code {:?}", spec, output.code);
        }

        Ok(output)
    }
}
