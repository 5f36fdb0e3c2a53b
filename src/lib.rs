//! cert-watchdog library
//!
//! Verifies that a list of domains serve TLS certificates that are not about
//! to expire, and alerts a chat webhook when a check fails:
//! - YAML configuration loading
//! - TLS handshake and leaf certificate expiry classification
//! - Slack-style webhook alerts
//! - Sequential run orchestration
//!
//! # Usage
//!
//! ```rust,ignore
//! use cert_watchdog::checks::CertificateChecker;
//! use cert_watchdog::config::Settings;
//! use cert_watchdog::notify::WebhookNotifier;
//! use cert_watchdog::runner::Runner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::load_from_file("config.yaml").unwrap();
//!     let runner = Runner::new(
//!         CertificateChecker::new(settings.check.clone()),
//!         WebhookNotifier::new(&settings.slack_webhook_url),
//!     );
//!     let summary = runner.run(&settings.domains).await;
//!     // Process summary...
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod models;
pub mod notify;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::{CheckSettings, Settings};
pub use models::{CheckOutcome, DomainEntry, RunSummary};
pub use utils::{CheckError, ConfigError, NotifyError};
