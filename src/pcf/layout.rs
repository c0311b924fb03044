use crate::error::{PcfError, PcfResult};
use crate::pcf::kernel::pair_weight;
use crate::trajectory::Trajectory;
use std::ops::Range;

/// Everything derived from the trajectory header and the run parameters
/// before the first frame is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemLayout {
    pub box_length: f64,
    pub beads_per_molecule: usize,
    pub n_molecules: usize,
    pub n_frames: usize,
    /// Trailing frames that contribute to the histogram.
    pub frames: Range<usize>,
    pub bin_width: f64,
    /// Highest bin index; the histogram holds `n_bins + 1` entries.
    pub n_bins: usize,
    pub weight: f64,
}

impl SystemLayout {
    pub fn derive<T: Trajectory + ?Sized>(
        trajectory: &T,
        bin_width: f64,
        fraction: f64,
    ) -> PcfResult<Self> {
        let box_length = trajectory.box_length();
        if !(box_length.is_finite() && box_length > 0.0) {
            return Err(PcfError::Config(format!(
                "box length must be positive, got {}",
                box_length
            )));
        }
        if !(bin_width.is_finite() && bin_width > 0.0) {
            return Err(PcfError::Config(format!(
                "bin width must be positive, got {}",
                bin_width
            )));
        }
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PcfError::Config(format!(
                "frame fraction must lie in (0, 1], got {}",
                fraction
            )));
        }

        let n_sites = trajectory.n_sites();
        let beads_per_molecule = trajectory.n_site_types();
        if beads_per_molecule == 0 || n_sites == 0 {
            return Err(PcfError::Config("trajectory contains no sites".into()));
        }
        if n_sites % beads_per_molecule != 0 {
            return Err(PcfError::Config(format!(
                "{} sites are not divisible by {} site types",
                n_sites, beads_per_molecule
            )));
        }
        let n_molecules = n_sites / beads_per_molecule;

        let n_frames = trajectory.n_frames();
        let n_used = (n_frames as f64 * fraction) as usize;
        if n_used == 0 {
            return Err(PcfError::Config(format!(
                "fraction {} of {} frames leaves nothing to analyse",
                fraction, n_frames
            )));
        }
        let frames = n_frames - n_used..n_frames;

        // Covers twice the box edge, well past the largest minimum-image
        // distance of sqrt(3) / 2 * L.
        let n_bins = (box_length * 2.0 / bin_width + 1.0) as usize;

        Ok(Self {
            box_length,
            beads_per_molecule,
            n_molecules,
            n_frames,
            frames,
            bin_width,
            n_bins,
            weight: pair_weight(n_used, box_length, n_molecules),
        })
    }

    pub fn n_frames_used(&self) -> usize {
        self.frames.len()
    }

    pub fn histogram_len(&self) -> usize {
        self.n_bins + 1
    }

    pub fn pairs_per_frame(&self) -> usize {
        self.n_molecules * self.n_molecules.saturating_sub(1) / 2
    }
}
