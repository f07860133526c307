//! Step failure taxonomy

use crate::core::config::ConfigError;
use crate::runner::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure that ends the step with `CO_RESULT = false`
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Parse the CO_DATA error: {0}")]
    Config(#[from] ConfigError),

    #[error("Git clone error: {0}")]
    Fetch(String),

    #[error("Make build error: {0}")]
    Build(#[source] CommandError),

    #[error("Make test error: {0}")]
    Test(#[source] CommandError),

    #[error("Unknown action [{0}], the component only support build, test and release action.")]
    UnknownAction(String),

    #[error("Read coredns binary file error: {}: {source}", .path.display())]
    ArtifactOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload coredns binary file, service return 400 error: bad request")]
    UploadRejected,

    #[error("Upload coredns binary file, service return 401 error: unauthorized")]
    UploadUnauthorized,

    #[error("Upload coredns binary file error: {0}")]
    Upload(String),
}

impl StepError {
    /// Short name of the stage the failure belongs to, used in log fields
    pub fn stage(&self) -> &'static str {
        match self {
            StepError::Config(_) => "parse",
            StepError::Fetch(_) => "fetch",
            StepError::Build(_) | StepError::Test(_) | StepError::UnknownAction(_) => "dispatch",
            StepError::ArtifactOpen { .. }
            | StepError::UploadRejected
            | StepError::UploadUnauthorized
            | StepError::Upload(_) => "release",
        }
    }
}
