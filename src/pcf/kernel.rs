//! Per-pair work: center of geometry, minimum-image distance and binning.

use crate::error::{PcfError, PcfResult};
use crate::pcf::histogram::PairAccumulator;
use crate::pcf::partition::WorkAssignment;
use nalgebra::Vector3;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};

/// Histogram increment for one pair, constant across the run.
///
/// Pairs are counted once per unordered pair, hence the factor 2. The rest
/// divides by the ideal-gas pair count of a sphere so that the normalized
/// curve tends to 1 at large distance.
pub fn pair_weight(n_frames_used: usize, box_length: f64, n_molecules: usize) -> f64 {
    let n = n_molecules as f64;
    (2.0 / n_frames_used as f64) * (box_length.powi(3) / n) * (1.0 / (n * 4.0 * PI / 3.0))
}

/// Round-to-nearest bin of a distance.
#[inline]
pub fn bin_index(distance: f64, bin_width: f64) -> usize {
    (distance / bin_width + 0.5).floor() as usize
}

/// Shift beads 1.. into the periodic image of bead 0.
///
/// Both comparisons look at the current (possibly already shifted) value,
/// so a bead first moved down by `L` can be moved back up.
pub fn unwrap_to_first_bead(beads: &mut [Vector3<f64>], box_length: f64) {
    let Some((reference, rest)) = beads.split_first_mut() else {
        return;
    };
    let half = box_length / 2.0;
    for bead in rest.iter_mut() {
        for k in 0..3 {
            if reference[k] - bead[k] < half {
                bead[k] -= box_length;
            }
            if reference[k] - bead[k] >= half {
                bead[k] += box_length;
            }
        }
    }
}

/// Unweighted mean of the beads.
pub fn mean_position(beads: &[Vector3<f64>]) -> Vector3<f64> {
    let inv = 1.0 / beads.len() as f64;
    let mut cog = Vector3::zeros();
    for bead in beads {
        cog += bead * inv;
    }
    cog
}

/// Minimum-image distance between two points in a cubic box.
pub fn minimum_image_distance(a: &Vector3<f64>, b: &Vector3<f64>, box_length: f64) -> f64 {
    let half = box_length / 2.0;
    let mut d2 = 0.0;
    for k in 0..3 {
        let mut d = (a[k] - b[k]).abs().rem_euclid(box_length);
        if d > half {
            d = box_length - d;
        }
        d2 += d * d;
    }
    d2.sqrt()
}

/// Work counters of one finished pair task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub first_indices: Vec<usize>,
    pub pairs: usize,
}

/// Read-only view of one frame plus the binning constants.
#[derive(Debug, Clone, Copy)]
pub struct PairKernel<'a> {
    positions: &'a [Vector3<f64>],
    box_length: f64,
    beads_per_molecule: usize,
    n_molecules: usize,
    bin_width: f64,
    weight: f64,
}

impl<'a> PairKernel<'a> {
    pub fn new(
        positions: &'a [Vector3<f64>],
        box_length: f64,
        beads_per_molecule: usize,
        bin_width: f64,
        weight: f64,
    ) -> PcfResult<Self> {
        if beads_per_molecule == 0 || positions.len() % beads_per_molecule != 0 {
            return Err(PcfError::Trajectory(format!(
                "{} positions cannot be split into molecules of {} beads",
                positions.len(),
                beads_per_molecule
            )));
        }
        Ok(Self {
            positions,
            box_length,
            beads_per_molecule,
            n_molecules: positions.len() / beads_per_molecule,
            bin_width,
            weight,
        })
    }

    pub fn n_molecules(&self) -> usize {
        self.n_molecules
    }

    /// Center of geometry of `molecule`, using `scratch` for the unwrapped
    /// beads.
    pub fn center_of_geometry(
        &self,
        molecule: usize,
        scratch: &mut Vec<Vector3<f64>>,
    ) -> Vector3<f64> {
        let b = self.beads_per_molecule;
        scratch.clear();
        scratch.extend_from_slice(&self.positions[molecule * b..(molecule + 1) * b]);
        unwrap_to_first_bead(scratch, self.box_length);
        mean_position(scratch)
    }

    /// Bin every pair `(m, m')` with `m` from the assignment and `m' > m`.
    ///
    /// Stops before the next first-molecule once `abort` is raised.
    pub fn run<A: PairAccumulator + ?Sized>(
        &self,
        assignment: WorkAssignment,
        accumulator: &A,
        abort: &AtomicBool,
    ) -> PcfResult<TaskSummary> {
        let mut summary = TaskSummary::default();
        let mut scratch = Vec::with_capacity(self.beads_per_molecule);

        for first in assignment.indices() {
            if abort.load(Ordering::Relaxed) {
                break;
            }
            if first >= self.n_molecules {
                return Err(PcfError::PlanMismatch(format!(
                    "assignment visits molecule {} but frame holds {}",
                    first, self.n_molecules
                )));
            }
            let cog = self.center_of_geometry(first, &mut scratch);

            for partner in first + 1..self.n_molecules {
                let cog_other = self.center_of_geometry(partner, &mut scratch);
                let distance = minimum_image_distance(&cog_other, &cog, self.box_length);
                if !distance.is_finite() {
                    return Err(PcfError::Trajectory(format!(
                        "non-finite distance between molecules {} and {}",
                        first, partner
                    )));
                }
                let bin = bin_index(distance, self.bin_width);
                accumulator.deposit(first, partner, distance, bin, self.weight)?;
                summary.pairs += 1;
            }
            summary.first_indices.push(first);
        }

        Ok(summary)
    }
}
