//! CLI module for cert-watchdog

pub mod args;

pub use args::Cli;
