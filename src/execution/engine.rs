//! Step engine - runs parse, fetch and dispatch in order

use crate::{
    core::{StepConfig, StepError},
    execution::{
        dispatcher::{ActionDispatcher, DispatchOutcome},
        fetch::{RepositoryFetcher, WorkspaceLayout},
        upload::ArtifactUploader,
    },
    runner::CommandRunner,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Events that can occur during a step run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// A `CO_DATA` token whose key is not recognized
    UnknownParameter { token: String },
    /// A stage is about to run
    StageStarted { stage: Stage },
    /// The artifact was accepted by the upload service
    ArtifactPublished { uri: String },
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsing,
    Fetching,
    Dispatching,
}

/// Receives events while the engine runs
///
/// The reporter implements this to turn events into `[COUT]` lines.
pub trait EventSink {
    fn on_event(&mut self, event: &StepEvent);
}

impl<F: FnMut(&StepEvent)> EventSink for F {
    fn on_event(&mut self, event: &StepEvent) {
        self(event)
    }
}

/// Main step execution engine
pub struct StepEngine<R, U> {
    runner: R,
    uploader: U,
    layout: WorkspaceLayout,
    upload_scheme: String,
}

impl<R: CommandRunner, U: ArtifactUploader> StepEngine<R, U> {
    pub fn new(runner: R, uploader: U, layout: WorkspaceLayout) -> Self {
        Self {
            runner,
            uploader,
            layout,
            upload_scheme: "https".to_string(),
        }
    }

    /// Override the scheme used for the upload endpoint and artifact URI
    pub fn with_upload_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.upload_scheme = scheme.into();
        self
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Run the whole step against a raw `CO_DATA` string
    ///
    /// The first failing stage ends the run; later stages never start.
    pub async fn execute(
        &self,
        data: &str,
        sink: &mut dyn EventSink,
    ) -> Result<DispatchOutcome, StepError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("step", run_id = %run_id);

        let result = self.execute_stages(data, sink).instrument(span).await;
        match &result {
            Ok(outcome) => info!(%run_id, "Step finished: {:?}", outcome),
            Err(e) => error!(%run_id, stage = e.stage(), "Step failed: {}", e),
        }
        result
    }

    async fn execute_stages(
        &self,
        data: &str,
        sink: &mut dyn EventSink,
    ) -> Result<DispatchOutcome, StepError> {
        sink.on_event(&StepEvent::StageStarted {
            stage: Stage::Parsing,
        });
        let config = StepConfig::parse(data)?;
        for token in &config.unknown_keys {
            warn!("Unknown parameter: {}", token);
            sink.on_event(&StepEvent::UnknownParameter {
                token: token.clone(),
            });
        }

        sink.on_event(&StepEvent::StageStarted {
            stage: Stage::Fetching,
        });
        let repository_dir = RepositoryFetcher::new(&self.runner, &self.layout)
            .fetch(config.repository.as_deref())
            .await?;

        sink.on_event(&StepEvent::StageStarted {
            stage: Stage::Dispatching,
        });
        let dispatcher = ActionDispatcher::new(
            &self.runner,
            &self.uploader,
            &repository_dir,
            &self.upload_scheme,
        );
        let outcome = dispatcher.dispatch(&config).await?;

        if let DispatchOutcome::Released { uri } = &outcome {
            sink.on_event(&StepEvent::ArtifactPublished { uri: uri.clone() });
        }

        Ok(outcome)
    }
}
