use crate::app::runner::PcfRun;
use crate::pcf::total_pairs;
use tracing::info;

pub fn report_run_summary(run: &PcfRun) {
    info!("\nPCF calculation finished.");
    info!(
        "  Frames analysed:   {} ({} workers)",
        run.frames.len(),
        run.workers
    );
    info!("  Pairs per frame:   {}", run.layout.pairs_per_frame());
    info!("  Pairs binned:      {}", total_pairs(&run.frames));
    info!(
        "  Bins:              {} of width {}",
        run.table.len(),
        run.layout.bin_width
    );
    info!("  Elapsed:           {:.2} s", run.elapsed.as_secs_f64());

    if let Some((radius, value)) = first_peak(&run.table) {
        info!("  First peak:        g({:.4}) = {:.4}", radius, value);
    }
}

/// Highest value before the curve first falls back below 1 after
/// exceeding it.
fn first_peak(table: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for &(radius, value) in table {
        match best {
            Some((_, peak)) if value < 1.0 && peak > 1.0 => break,
            Some((_, peak)) if value <= peak => {}
            _ => best = Some((radius, value)),
        }
    }
    best.filter(|&(_, value)| value > 0.0)
}
