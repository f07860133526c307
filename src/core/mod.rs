//! Core domain models for the CoreDNS step
//!
//! The parsed configuration, the release target it describes, and the
//! failure taxonomy every stage reports through.

pub mod config;
pub mod error;

pub use config::*;
pub use error::StepError;
