//! Artifact upload over HTTP

use crate::core::StepError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tracing::debug;

/// Trait for artifact upload - allows for different implementations
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    /// PUT the artifact to `url` and return the response status code
    ///
    /// Only transport failures are errors; every HTTP status is returned so
    /// the caller decides what it means.
    async fn put(&self, url: &str, artifact: File) -> Result<u16, StepError>;
}

/// Uploader backed by a `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpUploader {
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactUploader for HttpUploader {
    async fn put(&self, url: &str, artifact: File) -> Result<u16, StepError> {
        debug!("PUT {}", url);

        // The file handle moves into the body and is closed once the request ends.
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(reqwest::Body::from(artifact))
            .send()
            .await
            .map_err(|e| StepError::Upload(e.to_string()))?;

        let status = response.status().as_u16();
        debug!("PUT {} returned {}", url, status);
        Ok(status)
    }
}

/// Map an upload response status onto the step outcome
pub fn check_upload_status(status: u16) -> Result<(), StepError> {
    match status {
        200 => Ok(()),
        400 => Err(StepError::UploadRejected),
        401 => Err(StepError::UploadUnauthorized),
        other => Err(StepError::Upload(format!(
            "service return unknown error (HTTP {})",
            other
        ))),
    }
}
