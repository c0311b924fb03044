mod report;
mod runner;

pub use report::report_run_summary;
pub use runner::{compute_pcf, run_and_save, PcfRun};

use crate::config::{Args, Config, RunParameters};
use crate::io::{read_xyz_trajectory, setup_output};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

pub struct PcfApplication {
    args: Args,
    config: Config,
}

impl PcfApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.log.as_ref());
        info!("Configuration loaded:\n{:?}", self.config);

        let params = RunParameters::resolve(&self.config).wrap_err("Invalid run parameters")?;
        let trajectory = read_xyz_trajectory(&params.trajectory).wrap_err_with(|| {
            format!("Unable to load trajectory: {}", params.trajectory.display())
        })?;

        let run = run_and_save(&trajectory, &params).wrap_err("PCF calculation failed")?;
        report_run_summary(&run);
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = Config::load_for(args)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;
    Ok(config.apply_overrides(args))
}
