//! Repository fetcher - clones the CoreDNS source into the GOPATH layout

use crate::core::StepError;
use crate::runner::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Import path the repository is cloned under, relative to `$GOPATH/src`
const IMPORT_PATH: [&str; 3] = ["github.com", "coredns", "coredns"];

/// Where the repository and its build output live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    gopath: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(gopath: impl Into<PathBuf>) -> Self {
        Self {
            gopath: gopath.into(),
        }
    }

    /// Build the layout from an optional `GOPATH` value
    ///
    /// Unset or empty falls back to `~/go`, the Go toolchain default.
    pub fn from_gopath(gopath: Option<&str>) -> Self {
        match gopath.filter(|value| !value.trim().is_empty()) {
            Some(value) => Self::new(value),
            None => Self::new(
                dirs::home_dir()
                    .map(|home| home.join("go"))
                    .unwrap_or_else(|| PathBuf::from("go")),
            ),
        }
    }

    pub fn gopath(&self) -> &Path {
        &self.gopath
    }

    /// `$GOPATH/src/github.com/coredns/coredns`
    pub fn repository_dir(&self) -> PathBuf {
        IMPORT_PATH
            .iter()
            .fold(self.gopath.join("src"), |path, part| path.join(part))
    }
}

/// Clones the configured repository into [`WorkspaceLayout::repository_dir`]
pub struct RepositoryFetcher<'a, R> {
    runner: &'a R,
    layout: &'a WorkspaceLayout,
}

impl<'a, R: CommandRunner> RepositoryFetcher<'a, R> {
    pub fn new(runner: &'a R, layout: &'a WorkspaceLayout) -> Self {
        Self { runner, layout }
    }

    /// Create the destination tree and `git clone` into it
    ///
    /// Returns the destination directory.
    pub async fn fetch(&self, repository: Option<&str>) -> Result<PathBuf, StepError> {
        let uri = repository
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| StepError::Fetch("coredns repository is not set".to_string()))?;

        let dest = self.layout.repository_dir();
        create_dir_all_permissive(&dest).await.map_err(|e| {
            StepError::Fetch(format!("failed to create {}: {}", dest.display(), e))
        })?;
        debug!("Clone destination ready: {}", dest.display());

        info!("Cloning {} into {}", uri, dest.display());
        let spec = CommandSpec::new("git")
            .arg("clone")
            .arg(uri)
            .arg(dest.to_string_lossy());
        self.runner
            .run_checked(&spec)
            .await
            .map_err(|e| StepError::Fetch(e.to_string()))?;

        Ok(dest)
    }
}

#[cfg(unix)]
async fn create_dir_all_permissive(path: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true).mode(0o777);
    builder.create(path).await
}

#[cfg(not(unix))]
async fn create_dir_all_permissive(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
