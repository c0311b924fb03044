#![allow(dead_code)]

use cog_pcf::pcf::PairAccumulator;
use cog_pcf::{InMemoryTrajectory, PcfResult};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    path.push(format!(
        "cog_pcf_test_{}_{}_{}",
        std::process::id(),
        since_epoch.as_nanos(),
        label
    ));
    path
}

pub fn write_text(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write temp file");
}

/// One frame of single-bead molecules at the given positions.
pub fn single_bead_frame(box_length: f64, positions: &[[f64; 3]]) -> InMemoryTrajectory {
    let frame = positions
        .iter()
        .map(|p| Vector3::new(p[0], p[1], p[2]))
        .collect();
    InMemoryTrajectory::with_uniform_molecules(box_length, 1, vec![frame]).unwrap()
}

/// Molecules of `beads` sites scattered around random centers, with every
/// bead wrapped back into the primary box so molecules straddle boundaries.
pub fn random_molecules(
    seed: u64,
    box_length: f64,
    n_molecules: usize,
    beads: usize,
    n_frames: usize,
) -> InMemoryTrajectory {
    let mut rng = StdRng::seed_from_u64(seed);
    let frames = (0..n_frames)
        .map(|_| {
            let mut frame = Vec::with_capacity(n_molecules * beads);
            for _ in 0..n_molecules {
                let center = Vector3::new(
                    rng.gen_range(0.0..box_length),
                    rng.gen_range(0.0..box_length),
                    rng.gen_range(0.0..box_length),
                );
                for _ in 0..beads {
                    let offset = Vector3::new(
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                    );
                    frame.push((center + offset).map(|c| c.rem_euclid(box_length)));
                }
            }
            frame
        })
        .collect();
    InMemoryTrajectory::with_uniform_molecules(box_length, beads, frames).unwrap()
}

/// Accumulator that keeps every deposit for inspection.
#[derive(Default)]
pub struct DepositLog {
    pub entries: Mutex<Vec<Deposit>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deposit {
    pub first: usize,
    pub partner: usize,
    pub distance: f64,
    pub bin: usize,
}

impl DepositLog {
    pub fn take(self) -> Vec<Deposit> {
        self.entries.into_inner().unwrap()
    }
}

impl PairAccumulator for DepositLog {
    fn deposit(
        &self,
        first: usize,
        partner: usize,
        distance: f64,
        bin: usize,
        _weight: f64,
    ) -> PcfResult<()> {
        self.entries.lock().unwrap().push(Deposit {
            first,
            partner,
            distance,
            bin,
        });
        Ok(())
    }
}
