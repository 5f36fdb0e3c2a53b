//! Check orchestration
//!
//! Walks the configured domains in order, checks each one and sends an alert
//! for every failure. Per-domain failures, including failed alerts, never
//! stop the run.

use crate::checks::DomainChecker;
use crate::models::{CheckOutcome, DomainEntry, DomainReport, RunSummary};
use crate::notify::Notifier;
use crate::utils::CheckError;

/// Drives one pass over a domain list
pub struct Runner<C, N> {
    checker: C,
    notifier: N,
    describe_other_errors: bool,
}

impl<C: DomainChecker, N: Notifier> Runner<C, N> {
    pub fn new(checker: C, notifier: N) -> Self {
        Self {
            checker,
            notifier,
            describe_other_errors: false,
        }
    }

    /// Send a descriptive message for unclassified errors instead of an empty one
    pub fn describe_other_errors(mut self, enabled: bool) -> Self {
        self.describe_other_errors = enabled;
        self
    }

    /// Check every domain sequentially, in configuration order
    pub async fn run(&self, domains: &[DomainEntry]) -> RunSummary {
        if domains.is_empty() {
            tracing::warn!("No domains configured, nothing to check");
        }

        let mut summary = RunSummary::default();
        for domain in domains {
            summary.reports.push(self.run_one(domain).await);
        }

        tracing::debug!(
            total = summary.reports.len(),
            passed = summary.passed(),
            failed = summary.failed(),
            notification_failures = summary.notification_failures(),
            "Run complete"
        );

        summary
    }

    async fn run_one(&self, domain: &DomainEntry) -> DomainReport {
        let result = self.checker.check(&domain.url).await;
        let outcome = CheckOutcome::from(&result);

        let notified = match result {
            Ok(leaf) => {
                tracing::info!(
                    days_remaining = leaf.days_remaining,
                    "Certificate check passed for: {}",
                    domain.url
                );
                None
            }
            Err(err) => {
                tracing::warn!(
                    kind = err.kind(),
                    "Certificate check failed for {}: {}",
                    domain.url,
                    err
                );

                let message = alert_message(&err, self.describe_other_errors);
                match self.notifier.notify(domain, &message).await {
                    Ok(()) => Some(true),
                    Err(e) => {
                        tracing::error!(
                            channel = self.notifier.channel_name(),
                            "Unable to send message to webhook: {}",
                            e
                        );
                        Some(false)
                    }
                }
            }
        };

        DomainReport {
            domain: domain.clone(),
            outcome,
            notified,
        }
    }
}

/// Alert text for a failed check.
///
/// Unclassified errors produce an empty message unless `describe_other_errors`
/// is set.
pub fn alert_message(err: &CheckError, describe_other_errors: bool) -> String {
    match err {
        CheckError::TlsConnectionFailed { message } => {
            format!("Unable to establish TLS connection: {}", message)
        }
        CheckError::CertificateExpiringSoon {
            days_remaining: Some(days),
        } => format!("Certificate is expiring soon: {} days remaining", days),
        CheckError::CertificateExpiringSoon {
            days_remaining: None,
        } => "Certificate is expiring soon: expiry unknown".to_string(),
        CheckError::Other { message } if describe_other_errors => {
            format!("Certificate check failed: {}", message)
        }
        CheckError::Other { .. } => String::new(),
    }
}
