//! Custom error types for cert-watchdog
//!
//! This module defines the error taxonomy for the three stages of a run:
//! loading configuration, checking a domain's certificate and delivering
//! a webhook alert. Only configuration errors are fatal.

use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read configuration file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },
}

/// Classified outcome of a failed certificate check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The peer accepted the connection but did not answer with a TLS record
    #[error("Unable to establish TLS connection: {message}")]
    TlsConnectionFailed { message: String },

    /// Handshake succeeded but the leaf certificate expires within the threshold
    #[error("Certificate is expiring soon")]
    CertificateExpiringSoon { days_remaining: Option<i64> },

    /// DNS, connect, timeout, verification or any other unclassified failure
    #[error("{message}")]
    Other { message: String },
}

impl CheckError {
    pub fn other(message: impl Into<String>) -> Self {
        CheckError::Other {
            message: message.into(),
        }
    }

    /// Short machine-friendly label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::TlsConnectionFailed { .. } => "tls_connection_failed",
            CheckError::CertificateExpiringSoon { .. } => "certificate_expiring_soon",
            CheckError::Other { .. } => "other_error",
        }
    }
}

/// Webhook delivery errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Unable to send POST request to webhook: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook response status code: {status}")]
    UnexpectedStatus { status: u16 },
}
