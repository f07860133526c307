//! `[COUT]` output for the orchestrator
//!
//! Stdout carries the lines the orchestrator scrapes and is never styled.
//! Diagnostics go to stderr, coloured when stderr is a terminal.

use crate::{
    core::StepError,
    execution::{DispatchOutcome, EventSink, StepEvent},
};
use std::io::{self, Stderr, Stdout, Write};
use tracing::debug;

// Re-export style
pub use console::style;

/// Prefix of every line the orchestrator reads
pub const COUT: &str = "[COUT]";

/// Key of the final result marker
pub const RESULT_KEY: &str = "CO_RESULT";

/// Key of the published artifact URI line
pub const URI_KEY: &str = "CO_COREDNS_URI";

/// Writes `[COUT]` lines and the final result marker
pub struct Reporter<O, E> {
    out: O,
    err: E,
}

impl Reporter<Stdout, Stderr> {
    /// Reporter bound to the process stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// `[COUT] <message>` on stdout
    pub fn info(&mut self, message: impl std::fmt::Display) {
        // Reporting is best effort; a closed stdout must not mask the step result.
        let _ = writeln!(self.out, "{} {}", COUT, message);
    }

    /// `[COUT] <message>` on stderr
    pub fn diagnostic(&mut self, message: impl std::fmt::Display) {
        let _ = writeln!(
            self.err,
            "{} {}",
            COUT,
            style(message.to_string()).red().for_stderr()
        );
    }

    /// Write the result marker and return the process exit code
    pub fn finish(&mut self, result: &Result<DispatchOutcome, StepError>) -> i32 {
        match result {
            Ok(_) => {
                self.marker(true);
                0
            }
            Err(e) => {
                self.diagnostic(e);
                self.marker(false);
                1
            }
        }
    }

    /// Report a step that could not start because `CO_DATA` is absent
    pub fn missing_data(&mut self) -> i32 {
        self.fail("The CO_DATA value is null.")
    }

    /// Diagnostic plus the `false` marker, for failures outside the engine
    pub fn fail(&mut self, message: impl std::fmt::Display) -> i32 {
        self.diagnostic(message);
        self.marker(false);
        1
    }

    fn marker(&mut self, success: bool) {
        self.info(format_args!("{} = {}", RESULT_KEY, success));
        let _ = self.out.flush();
        let _ = self.err.flush();
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> EventSink for Reporter<O, E> {
    fn on_event(&mut self, event: &StepEvent) {
        match event {
            StepEvent::UnknownParameter { token } => {
                self.info(format_args!("Unknown Parameter: [{}]", token))
            }
            StepEvent::ArtifactPublished { uri } => {
                self.info(format_args!("{} = {}", URI_KEY, uri))
            }
            StepEvent::StageStarted { stage } => debug!("Stage started: {:?}", stage),
        }
    }
}
