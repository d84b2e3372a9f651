pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "line-fanout")]
#[command(about = "Read lines from stdin and process each one concurrently")]
pub struct CliConfig {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cap on concurrently running lines (default: unbounded)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Wait for in-flight lines to finish before exiting
    #[arg(long)]
    pub drain: bool,

    /// Give up draining after this many seconds
    #[arg(long)]
    pub drain_timeout_secs: Option<u64>,

    /// Run this command once per line, with the line on its stdin
    #[arg(long)]
    pub exec: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU, memory and live unit counts periodically")]
    pub monitor: bool,
}
