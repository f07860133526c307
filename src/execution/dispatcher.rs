//! Action dispatcher - runs build, test or release in the cloned repository

use crate::{
    core::{Action, ReleaseTarget, StepConfig, StepError},
    execution::upload::{check_upload_status, ArtifactUploader},
    runner::{CommandRunner, CommandSpec},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the binary `make coredns` produces at the repository root
pub const ARTIFACT_NAME: &str = "coredns";

/// Make target that builds the binary
const BUILD_TARGET: &str = "coredns";

/// Make target that runs the test suite
const TEST_TARGET: &str = "test";

/// What a successful dispatch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Built,
    Tested,
    Released { uri: String },
}

/// Runs one action against an already-cloned repository
pub struct ActionDispatcher<'a, R, U> {
    runner: &'a R,
    uploader: &'a U,
    repository_dir: &'a Path,
    upload_scheme: &'a str,
}

impl<'a, R: CommandRunner, U: ArtifactUploader> ActionDispatcher<'a, R, U> {
    pub fn new(
        runner: &'a R,
        uploader: &'a U,
        repository_dir: &'a Path,
        upload_scheme: &'a str,
    ) -> Self {
        Self {
            runner,
            uploader,
            repository_dir,
            upload_scheme,
        }
    }

    /// Resolve the configured action and run it
    pub async fn dispatch(&self, config: &StepConfig) -> Result<DispatchOutcome, StepError> {
        let requested = config.action.as_deref().unwrap_or_default();
        let action: Action = requested.parse().map_err(StepError::UnknownAction)?;

        info!("Dispatching action: {}", action);
        match action {
            Action::Build => self.build().await.map(|_| DispatchOutcome::Built),
            Action::Test => self.test().await.map(|_| DispatchOutcome::Tested),
            Action::Release => {
                let target = config.release_target()?;
                self.release(&target)
                    .await
                    .map(|uri| DispatchOutcome::Released { uri })
            }
        }
    }

    /// `make coredns`
    pub async fn build(&self) -> Result<(), StepError> {
        self.runner
            .run_checked(&self.make(BUILD_TARGET))
            .await
            .map(|_| ())
            .map_err(StepError::Build)
    }

    /// `make test`
    pub async fn test(&self) -> Result<(), StepError> {
        self.runner
            .run_checked(&self.make(TEST_TARGET))
            .await
            .map(|_| ())
            .map_err(StepError::Test)
    }

    /// Build, then upload the binary to `target`
    ///
    /// Returns the artifact URI on success.
    pub async fn release(&self, target: &ReleaseTarget) -> Result<String, StepError> {
        self.build().await?;

        let path = self.artifact_path();
        let artifact = tokio::fs::File::open(&path)
            .await
            .map_err(|source| StepError::ArtifactOpen {
                path: path.clone(),
                source,
            })?;

        let uri = target.artifact_uri(self.upload_scheme, ARTIFACT_NAME);
        info!("Uploading {} to {}", path.display(), uri);

        let status = self.uploader.put(&uri, artifact).await?;
        check_upload_status(status)?;

        debug!("Artifact published: {}", uri);
        Ok(uri)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.repository_dir.join(ARTIFACT_NAME)
    }

    fn make(&self, target: &str) -> CommandSpec {
        CommandSpec::new("make")
            .arg(target)
            .current_dir(self.repository_dir)
    }
}
