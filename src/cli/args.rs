//! CLI argument definitions using clap

use crate::config::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cert-watchdog")]
#[command(version)]
#[command(
    about = "Check that configured domains serve TLS certificates that are not about to expire",
    long_about = None
)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Webhook URL to alert, overriding slack_webhook_url from the configuration
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Default log filter when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
