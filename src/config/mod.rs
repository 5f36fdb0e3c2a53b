//! Configuration module for cert-watchdog
//!
//! Handles loading the YAML configuration file.

pub mod settings;

pub use settings::{CheckSettings, Settings, TrustStore, DEFAULT_CONFIG_PATH};
