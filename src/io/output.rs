//! Output formatting and logging utilities

use crate::error::PcfResult;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Header line of the PCF table.
pub const TABLE_HEADER: &str = "# Distance [sigma] \t PCF";

/// Wall-clock timer with second precision
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let total_seconds = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;
        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Route log output to a file or stdout
pub fn setup_output(log_path: Option<&String>) {
    match log_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Log will be written to: {}", path);
            }
            Err(err) => eprintln!("Could not create log file {}: {}", path, err),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
        }
    }
}

/// Write `(radius, value)` rows, tab separated, below the header line.
pub fn write_pcf_table<W: Write>(writer: &mut W, rows: &[(f64, f64)]) -> PcfResult<()> {
    writeln!(writer, "{}", TABLE_HEADER)?;
    for (radius, value) in rows {
        writeln!(writer, "{:.18e}\t{:.18e}", radius, value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the table to `path`. The file only appears once it is complete.
pub fn save_pcf_table(path: &Path, rows: &[(f64, f64)]) -> PcfResult<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = Path::new(&partial).to_path_buf();

    {
        let mut writer = BufWriter::new(File::create(&partial)?);
        write_pcf_table(&mut writer, rows)?;
    }
    fs::rename(&partial, path)?;
    Ok(())
}
