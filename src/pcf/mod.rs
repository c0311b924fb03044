//! Pair correlation function between molecule centers of geometry.
//!
//! The heavy lifting is the O(N^2) pair loop of every frame. It is split over
//! a fixed pool of workers by [`partition`], executed frame by frame by the
//! [`FrameOrchestrator`], and accumulated into a single [`SharedHistogram`].
//! [`Histogram::normalize`] turns the final counts into g(r).

pub mod histogram;
pub mod kernel;
pub mod layout;
pub mod normalize;
pub mod orchestrator;
pub mod partition;

pub use histogram::{Histogram, PairAccumulator, SharedHistogram};
pub use kernel::{
    bin_index, mean_position, minimum_image_distance, pair_weight, unwrap_to_first_bead,
    PairKernel, TaskSummary,
};
pub use layout::SystemLayout;
pub use normalize::normalize_shells;
pub use orchestrator::{build_worker_pool, FrameOrchestrator, FrameReport, TaskKind};
pub use partition::{partition, WorkAssignment, WorkPlan};

use crate::error::PcfResult;
use crate::trajectory::Trajectory;
use tracing::{debug, info};

/// Raw result of a full pass over the retained frames.
#[derive(Debug)]
pub struct Accumulation {
    pub histogram: Histogram,
    pub frames: Vec<FrameReport>,
}

/// Pairs binned over a set of frames.
pub fn total_pairs(reports: &[FrameReport]) -> usize {
    reports.iter().map(|f| f.pairs).sum()
}

/// Bin every molecule pair of every retained frame.
///
/// Any failure ends the run and discards the partial histogram.
pub fn accumulate<T: Trajectory + ?Sized>(
    trajectory: &T,
    layout: &SystemLayout,
    n_workers: usize,
) -> PcfResult<Accumulation> {
    let histogram = SharedHistogram::new(layout.histogram_len());
    let frames = accumulate_into(trajectory, layout, n_workers, &histogram)?;
    Ok(Accumulation {
        histogram: histogram.into_histogram(layout.bin_width)?,
        frames,
    })
}

/// Feed every retained frame through one worker pool into `accumulator`.
///
/// Frames are processed strictly one after another; a frame is loaded only
/// after all tasks of the previous one have finished.
pub fn accumulate_into<T, A>(
    trajectory: &T,
    layout: &SystemLayout,
    n_workers: usize,
    accumulator: &A,
) -> PcfResult<Vec<FrameReport>>
where
    T: Trajectory + ?Sized,
    A: PairAccumulator,
{
    let orchestrator = FrameOrchestrator::new(layout.n_molecules, n_workers)?;
    let mut reports = Vec::with_capacity(layout.n_frames_used());

    for frame in layout.frames.clone() {
        info!("Current frame: {}", frame);
        let positions = trajectory.frame(frame)?;
        let kernel = PairKernel::new(
            &positions,
            layout.box_length,
            layout.beads_per_molecule,
            layout.bin_width,
            layout.weight,
        )?;
        let report = orchestrator.run_frame(frame, &kernel, accumulator)?;
        debug!(
            "Frame {}: {} main + {} remainder tasks, {} pairs",
            frame, report.main_tasks, report.remainder_tasks, report.pairs
        );
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::InMemoryTrajectory;
    use nalgebra::Vector3;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    const FRAMES: usize = 4;

    /// Molecule spacing of frame `k`; every frame yields its own set of
    /// pair distances.
    fn spacing(k: usize) -> f64 {
        1.0 + 0.25 * k as f64
    }

    fn frame_of(distance: f64) -> Option<usize> {
        (0..FRAMES).find(|&k| {
            let s = spacing(k);
            (distance - s).abs() < 1e-9 || (distance - 2.0 * s).abs() < 1e-9
        })
    }

    /// Logs the frame each deposit came from, slowly enough that overlapping
    /// frames would interleave.
    #[derive(Default)]
    struct FrameLog {
        frames: Mutex<Vec<Option<usize>>>,
    }

    impl PairAccumulator for FrameLog {
        fn deposit(&self, _: usize, _: usize, distance: f64, _: usize, _: f64) -> PcfResult<()> {
            thread::sleep(Duration::from_millis(2));
            self.frames.lock().unwrap().push(frame_of(distance));
            Ok(())
        }
    }

    #[test]
    fn frames_never_overlap() {
        let frames = (0..FRAMES)
            .map(|k| {
                (0..3)
                    .map(|i| Vector3::new(i as f64 * spacing(k), 1.0, 1.0))
                    .collect()
            })
            .collect();
        let traj = InMemoryTrajectory::with_uniform_molecules(20.0, 1, frames).unwrap();
        let layout = SystemLayout::derive(&traj, 0.1, 1.0).unwrap();
        let log = FrameLog::default();

        let reports = accumulate_into(&traj, &layout, 2, &log).unwrap();

        assert_eq!(reports.len(), FRAMES);
        assert_eq!(total_pairs(&reports), FRAMES * 3);
        let seen: Vec<usize> = log
            .frames
            .into_inner()
            .unwrap()
            .into_iter()
            .map(|f| f.expect("deposit from an unknown frame"))
            .collect();
        assert_eq!(seen.len(), FRAMES * 3);
        assert!(
            seen.windows(2).all(|w| w[0] <= w[1]),
            "frames interleaved: {seen:?}"
        );
    }
}
