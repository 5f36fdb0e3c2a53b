//! Utility modules for cert-watchdog
//!
//! Currently holds the error types shared by every stage of a run.

pub mod error;

pub use error::{CheckError, ConfigError, NotifyError};
