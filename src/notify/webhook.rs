//! Slack-compatible webhook notifier

use crate::models::DomainEntry;
use crate::notify::Notifier;
use crate::utils::NotifyError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

/// JSON body accepted by Slack incoming webhooks
#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub text: String,
}

/// Posts alerts to a webhook URL
pub struct WebhookNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Format the alert text using Slack markdown
    pub fn format_message(domain: &DomainEntry, message: &str) -> String {
        format!(
            ":warning: *Certificate check failed:*\n*Name:* {}\n*URL:* <{}|{}>\n*Contact:* {}\n*Error:* {}",
            domain.name, domain.url, domain.url, domain.contact, message
        )
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, domain: &DomainEntry, message: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            text: Self::format_message(domain, message),
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        // Dropping the response releases the connection without reading the body
        drop(response);

        if status != StatusCode::OK {
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}
