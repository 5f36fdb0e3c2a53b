//! Per-domain check results

use crate::models::DomainEntry;
use crate::utils::CheckError;
use chrono::{DateTime, Utc};

/// The leaf certificate of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCertificate {
    /// Certificate subject (RFC 4514 string)
    pub subject: String,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// Whole days until expiry, truncated toward zero
    pub days_remaining: i64,
}

/// Classification of a single domain check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Ok,
    TlsConnectionFailed,
    CertificateExpiringSoon { days_remaining: Option<i64> },
    OtherError { detail: String },
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckOutcome::Ok)
    }
}

impl From<&Result<LeafCertificate, CheckError>> for CheckOutcome {
    fn from(result: &Result<LeafCertificate, CheckError>) -> Self {
        match result {
            Ok(_) => CheckOutcome::Ok,
            Err(CheckError::TlsConnectionFailed { .. }) => CheckOutcome::TlsConnectionFailed,
            Err(CheckError::CertificateExpiringSoon { days_remaining }) => {
                CheckOutcome::CertificateExpiringSoon {
                    days_remaining: *days_remaining,
                }
            }
            Err(CheckError::Other { message }) => CheckOutcome::OtherError {
                detail: message.clone(),
            },
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Ok => write!(f, "Ok"),
            CheckOutcome::TlsConnectionFailed => write!(f, "TLS connection failed"),
            CheckOutcome::CertificateExpiringSoon {
                days_remaining: Some(days),
            } => write!(f, "Certificate expiring in {} days", days),
            CheckOutcome::CertificateExpiringSoon {
                days_remaining: None,
            } => write!(f, "Certificate expiring soon"),
            CheckOutcome::OtherError { detail } => write!(f, "Error: {}", detail),
        }
    }
}

/// What happened to one domain during a run
#[derive(Debug, Clone)]
pub struct DomainReport {
    pub domain: DomainEntry,
    pub outcome: CheckOutcome,
    /// `None` when no alert was needed, otherwise whether delivery succeeded
    pub notified: Option<bool>,
}

/// Results of a full pass over the configured domains
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<DomainReport>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Alerts that could not be delivered
    pub fn notification_failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.notified == Some(false))
            .count()
    }
}
