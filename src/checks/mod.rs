//! Check modules for cert-watchdog
//!
//! This module contains the certificate check implementation.

pub mod certificate;

pub use certificate::{
    days_until, inspect_chain, load_root_store, CertificateChecker, DomainChecker,
};
