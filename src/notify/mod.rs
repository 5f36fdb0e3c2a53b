//! Alert delivery
//!
//! The runner only talks to the `Notifier` trait; `WebhookNotifier` is the
//! chat webhook implementation used by the binary.

pub mod webhook;

use crate::models::DomainEntry;
use crate::utils::NotifyError;
use async_trait::async_trait;

pub use webhook::{WebhookNotifier, WebhookPayload};

/// A channel that can deliver a failure alert for a domain
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` about `domain`
    async fn notify(&self, domain: &DomainEntry, message: &str) -> Result<(), NotifyError>;

    /// Channel name for logging
    fn channel_name(&self) -> &str;
}
