//! coredns-ci - CI step that clones CoreDNS and builds, tests or releases it

pub mod cli;
pub mod core;
pub mod execution;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{Action, ConfigError, ReleaseTarget, StepConfig, StepError};
pub use execution::{DispatchOutcome, HttpUploader, StepEngine, StepEvent, WorkspaceLayout};
pub use runner::{CommandRunner, CommandSpec, SubprocessRunner};
