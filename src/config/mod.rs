//! Configuration management for pair correlation runs
//!
//! A run is described by an optional YAML file. Every field can be
//! overridden on the command line, and anything left unset falls back to
//! the defaults below.

mod args;

pub use args::Args;

use crate::error::{PcfError, PcfResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// Configuration file read when none is named on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub trajectory: Option<String>,
    /// Histogram bin width in trajectory length units
    pub bin_width: Option<f64>,
    /// Fraction of trailing frames kept; earlier frames count as equilibration
    pub fraction: Option<f64>,
    /// Worker threads; unset means all available cores
    pub workers: Option<usize>,
    pub output: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trajectory: Some("traj.xyz".to_string()),
            bin_width: Some(0.01),
            fraction: Some(0.5),
            workers: None,
            output: Some("pcf.dat".to_string()),
        }
    }
}

impl Config {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.trajectory.is_none() {
            self.trajectory = defaults.trajectory;
        }
        if self.bin_width.is_none() {
            self.bin_width = defaults.bin_width;
        }
        if self.fraction.is_none() {
            self.fraction = defaults.fraction;
        }
        if self.output.is_none() {
            self.output = defaults.output;
        }
        self
    }

    pub fn from_yaml(content: &str) -> PcfResult<Self> {
        let config: Config = serde_yml::from_str(content)
            .map_err(|e| PcfError::Config(format!("failed to parse configuration: {}", e)))?;
        Ok(config.with_defaults())
    }

    pub fn load(path: &Path) -> PcfResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PcfError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Load the file named by `--config-file`. Only the default file may be
    /// absent, in which case the built-in defaults apply.
    pub fn load_for(args: &Args) -> PcfResult<Self> {
        let path = Path::new(&args.config_file);
        if args.config_file == DEFAULT_CONFIG_FILE && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Command-line values take precedence over the file.
    pub fn apply_overrides(mut self, args: &Args) -> Self {
        if let Some(path) = &args.trajectory {
            self.trajectory = Some(path.clone());
        }
        if let Some(dr) = args.bin_width {
            self.bin_width = Some(dr);
        }
        if let Some(fraction) = args.fraction {
            self.fraction = Some(fraction);
        }
        if let Some(workers) = args.workers {
            self.workers = Some(workers);
        }
        if let Some(path) = &args.output {
            self.output = Some(path.clone());
        }
        self
    }
}

/// Fully resolved, validated run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub trajectory: PathBuf,
    pub bin_width: f64,
    pub fraction: f64,
    pub workers: usize,
    pub output: PathBuf,
}

impl RunParameters {
    pub fn resolve(config: &Config) -> PcfResult<Self> {
        let defaults = Config::default();
        let bin_width = config.bin_width.or(defaults.bin_width).unwrap_or(0.01);
        if !(bin_width.is_finite() && bin_width > 0.0) {
            return Err(PcfError::Config(format!(
                "bin width must be positive, got {}",
                bin_width
            )));
        }
        let fraction = config.fraction.or(defaults.fraction).unwrap_or(0.5);
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PcfError::Config(format!(
                "frame fraction must lie in (0, 1], got {}",
                fraction
            )));
        }
        let workers = match config.workers {
            Some(0) => {
                return Err(PcfError::Config("worker count must be positive".into()));
            }
            Some(n) => n,
            None => available_workers(),
        };

        let trajectory = config.trajectory.clone().or(defaults.trajectory);
        let output = config.output.clone().or(defaults.output);

        Ok(Self {
            trajectory: PathBuf::from(trajectory.unwrap_or_default()),
            bin_width,
            fraction,
            workers,
            output: PathBuf::from(output.unwrap_or_default()),
        })
    }
}

/// Number of hardware threads, or 1 when it cannot be determined.
pub fn available_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
