//! Data models for cert-watchdog
//!
//! This module contains the data structures passed between the loader,
//! the checker, the notifier and the runner.

pub mod domain;
pub mod outcome;

pub use domain::DomainEntry;
pub use outcome::{CheckOutcome, DomainReport, LeafCertificate, RunSummary};
