//! cert-watchdog - TLS certificate expiry monitor
//!
//! Loads the domain list, checks each domain's certificate once and posts
//! an alert to the configured webhook for every failure.

use anyhow::Context;
use cert_watchdog::checks::CertificateChecker;
use cert_watchdog::config::Settings;
use cert_watchdog::notify::WebhookNotifier;
use cert_watchdog::runner::Runner;
use cert_watchdog::Cli;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Install the ring crypto provider for rustls
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load_from_file(&cli.config)
        .context("Unable to read the configuration file")?;

    if let Some(url) = cli.webhook_url {
        settings = settings
            .with_webhook_url(url)
            .context("Invalid --webhook-url")?;
    }

    tracing::debug!(
        path = %cli.config.display(),
        domains = settings.domains.len(),
        "Configuration loaded"
    );

    let runner = Runner::new(
        CertificateChecker::new(settings.check.clone()),
        WebhookNotifier::new(settings.slack_webhook_url.as_str()),
    )
    .describe_other_errors(settings.check.describe_other_errors);

    // Per-domain failures are logged by the runner and never change the exit code
    runner.run(&settings.domains).await;

    Ok(())
}
