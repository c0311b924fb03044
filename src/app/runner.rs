use crate::config::RunParameters;
use crate::error::PcfResult;
use crate::io::save_pcf_table;
use crate::pcf::{accumulate, FrameReport, SystemLayout};
use crate::trajectory::Trajectory;
use std::time::{Duration, Instant};
use tracing::info;

/// Result of a completed run.
#[derive(Debug)]
pub struct PcfRun {
    pub layout: SystemLayout,
    pub workers: usize,
    /// Normalized `(radius, g(r))` rows, ascending radius.
    pub table: Vec<(f64, f64)>,
    pub frames: Vec<FrameReport>,
    pub elapsed: Duration,
}

/// Accumulate and normalize the pair correlation function of `trajectory`.
pub fn compute_pcf<T: Trajectory + ?Sized>(
    trajectory: &T,
    params: &RunParameters,
) -> PcfResult<PcfRun> {
    let started = Instant::now();
    let layout = SystemLayout::derive(trajectory, params.bin_width, params.fraction)?;
    info!("Using {} threads.", params.workers);
    info!(
        "Box length {:.4}, {} molecules of {} beads, frames {}..{} of {}",
        layout.box_length,
        layout.n_molecules,
        layout.beads_per_molecule,
        layout.frames.start,
        layout.frames.end,
        layout.n_frames
    );

    let accumulation = accumulate(trajectory, &layout, params.workers)?;
    let mut histogram = accumulation.histogram;
    let table = histogram.normalize()?;

    Ok(PcfRun {
        layout,
        workers: params.workers,
        table,
        frames: accumulation.frames,
        elapsed: started.elapsed(),
    })
}

/// Compute the table and write it to the configured output path. Nothing is
/// written if any frame fails.
pub fn run_and_save<T: Trajectory + ?Sized>(
    trajectory: &T,
    params: &RunParameters,
) -> PcfResult<PcfRun> {
    let run = compute_pcf(trajectory, params)?;
    save_pcf_table(&params.output, &run.table)?;
    info!("PCF written to: {}", params.output.display());
    Ok(run)
}
