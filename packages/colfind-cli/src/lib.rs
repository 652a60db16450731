//! Shared command-line plumbing for the colfind binaries.

use std::io;

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const FALLBACK_FILTER: &str = "info";

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Green.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free for results.
pub fn init_tracing(log_level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(log_filter(log_level))
		.with_writer(io::stderr)
		.init();
}

fn log_filter(log_level: &str) -> EnvFilter {
	EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}
