//! Test doubles for the command runner and the uploader

#![allow(dead_code)]

use async_trait::async_trait;
use coredns_ci::cli::{self, output::Reporter};
use coredns_ci::execution::{ArtifactUploader, StepEngine, WorkspaceLayout, ARTIFACT_NAME};
use coredns_ci::runner::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use coredns_ci::StepError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Fake `git`/`make` that records every call
///
/// Exit codes are looked up by argv prefix (`"git clone"`, `"make coredns"`),
/// defaulting to 0. A successful `make coredns` writes a fake binary into the
/// working directory, the way the real target does.
#[derive(Clone, Default)]
pub struct FakeRunner {
    exit_codes: Arc<HashMap<String, i32>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(command: &str, code: i32) -> Self {
        let mut exit_codes = HashMap::new();
        exit_codes.insert(command.to_string(), code);
        Self {
            exit_codes: Arc::new(exit_codes),
            ..Default::default()
        }
    }

    /// Calls so far, rendered as `program arg...`
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|spec| spec.to_string())
            .collect()
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());

        let rendered = spec.to_string();
        let code = self
            .exit_codes
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0);

        if code == 0 && spec.program == "make" && spec.args == ["coredns"] {
            if let Some(dir) = &spec.current_dir {
                std::fs::write(dir.join(ARTIFACT_NAME), b"fake coredns binary").unwrap();
            }
        }

        Ok(CommandOutput {
            code: Some(code),
            ..Default::default()
        })
    }
}

/// Uploader returning a fixed status and keeping what it was sent
#[derive(Clone)]
pub struct FakeUploader {
    status: u16,
    uploads: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl FakeUploader {
    pub fn returning(status: u16) -> Self {
        Self {
            status,
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactUploader for FakeUploader {
    async fn put(&self, url: &str, mut artifact: File) -> Result<u16, StepError> {
        let mut body = Vec::new();
        artifact
            .read_to_end(&mut body)
            .await
            .map_err(|e| StepError::Upload(e.to_string()))?;
        self.uploads.lock().unwrap().push((url.to_string(), body));
        Ok(self.status)
    }
}

/// Captured result of one step run
#[derive(Debug)]
pub struct StepRun {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: String,
}

impl StepRun {
    pub fn last_line(&self) -> &str {
        self.stdout.last().map(String::as_str).unwrap_or_default()
    }
}

/// Run a step end to end with captured output
pub async fn run_step_with<U: ArtifactUploader>(
    data: Option<&str>,
    engine: &StepEngine<FakeRunner, U>,
) -> StepRun {
    let mut reporter = Reporter::new(Vec::new(), Vec::new());
    let exit_code = cli::run_step(data, engine, &mut reporter).await;
    let (out, err) = reporter.into_inner();

    StepRun {
        exit_code,
        stdout: String::from_utf8_lossy(&out)
            .lines()
            .map(str::to_string)
            .collect(),
        stderr: String::from_utf8_lossy(&err).to_string(),
    }
}

pub fn engine_in(
    gopath: &std::path::Path,
    runner: FakeRunner,
    uploader: FakeUploader,
) -> StepEngine<FakeRunner, FakeUploader> {
    StepEngine::new(runner, uploader, WorkspaceLayout::new(gopath))
}
