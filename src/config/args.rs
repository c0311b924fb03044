//! Command-line argument parsing for pair correlation runs

use super::DEFAULT_CONFIG_FILE;
use clap::Parser;

/// Center-of-geometry pair correlation function from a periodic trajectory
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Override trajectory path
    #[arg(short, long)]
    pub trajectory: Option<String>,

    /// Override histogram bin width
    #[arg(long)]
    pub bin_width: Option<f64>,

    /// Override fraction of trailing frames to analyse
    #[arg(long)]
    pub fraction: Option<f64>,

    /// Override number of worker threads (default: all available)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Override output table path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the log to this file instead of stdout
    #[arg(long)]
    pub log: Option<String>,
}
