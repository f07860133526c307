//! Step execution: fetch, dispatch and upload

pub mod dispatcher;
pub mod engine;
pub mod fetch;
pub mod upload;

pub use dispatcher::{ActionDispatcher, DispatchOutcome, ARTIFACT_NAME};
pub use engine::{EventSink, Stage, StepEngine, StepEvent};
pub use fetch::{RepositoryFetcher, WorkspaceLayout};
pub use upload::{check_upload_status, ArtifactUploader, HttpUploader};
