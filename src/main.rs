//! Pair correlation command-line interface
//!
//! Reads a YAML configuration, analyses the trajectory and writes the PCF table.

use cog_pcf::app::PcfApplication;
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    PcfApplication::from_cli()?.run()
}
