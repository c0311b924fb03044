//! Read-only access to simulation trajectories.
//!
//! The engine only needs the cubic box edge, the site layout and the raw
//! positions of one frame at a time. Anything that can provide those can be
//! analysed, so the file formats live behind the [`Trajectory`] trait.

use crate::error::{PcfError, PcfResult};
use nalgebra::Vector3;

/// Source of frames for the pair correlation engine.
pub trait Trajectory {
    /// Edge length of the cubic periodic box.
    fn box_length(&self) -> f64;

    /// Total number of sites (beads) per frame.
    fn n_sites(&self) -> usize;

    /// Number of distinct site types. Every molecule carries one site of each.
    fn n_site_types(&self) -> usize;

    fn n_frames(&self) -> usize;

    /// Raw site positions of frame `index`, in site order.
    fn frame(&self, index: usize) -> PcfResult<Vec<Vector3<f64>>>;
}

/// Trajectory held entirely in memory.
#[derive(Debug, Clone)]
pub struct InMemoryTrajectory {
    box_length: f64,
    site_types: Vec<String>,
    frames: Vec<Vec<Vector3<f64>>>,
}

impl InMemoryTrajectory {
    /// Build a trajectory from per-site type labels and per-frame positions.
    pub fn new(
        box_length: f64,
        site_types: Vec<String>,
        frames: Vec<Vec<Vector3<f64>>>,
    ) -> PcfResult<Self> {
        let n_sites = site_types.len();
        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, frame)| frame.len() != n_sites)
        {
            return Err(PcfError::Trajectory(format!(
                "frame {} has {} sites, expected {}",
                index,
                frame.len(),
                n_sites
            )));
        }
        Ok(Self {
            box_length,
            site_types,
            frames,
        })
    }

    /// Trajectory whose molecules are made of `beads_per_molecule` sites typed
    /// `B0`, `B1`, ... in that order.
    pub fn with_uniform_molecules(
        box_length: f64,
        beads_per_molecule: usize,
        frames: Vec<Vec<Vector3<f64>>>,
    ) -> PcfResult<Self> {
        if beads_per_molecule == 0 {
            return Err(PcfError::Config(
                "beads per molecule must be positive".into(),
            ));
        }
        let n_sites = frames.first().map(|f| f.len()).unwrap_or(0);
        let site_types = (0..n_sites)
            .map(|i| format!("B{}", i % beads_per_molecule))
            .collect();
        Self::new(box_length, site_types, frames)
    }

    pub fn site_types(&self) -> &[String] {
        &self.site_types
    }
}

impl Trajectory for InMemoryTrajectory {
    fn box_length(&self) -> f64 {
        self.box_length
    }

    fn n_sites(&self) -> usize {
        self.site_types.len()
    }

    fn n_site_types(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for kind in &self.site_types {
            if !seen.contains(&kind.as_str()) {
                seen.push(kind.as_str());
            }
        }
        seen.len()
    }

    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> PcfResult<Vec<Vector3<f64>>> {
        self.frames.get(index).cloned().ok_or_else(|| {
            PcfError::Trajectory(format!(
                "frame {} requested but trajectory has {} frames",
                index,
                self.frames.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_distinct_site_types() {
        let frame = vec![Vector3::zeros(); 6];
        let traj = InMemoryTrajectory::with_uniform_molecules(5.0, 3, vec![frame]).unwrap();
        assert_eq!(traj.n_sites(), 6);
        assert_eq!(traj.n_site_types(), 3);
        assert_eq!(traj.n_frames(), 1);
    }

    #[test]
    fn rejects_ragged_frames() {
        let types = vec!["A".to_string(), "B".to_string()];
        let frames = vec![vec![Vector3::zeros(); 2], vec![Vector3::zeros(); 3]];
        let err = InMemoryTrajectory::new(5.0, types, frames).unwrap_err();
        assert!(matches!(err, PcfError::Trajectory(_)));
    }

    #[test]
    fn missing_frame_is_an_error() {
        let traj = InMemoryTrajectory::with_uniform_molecules(5.0, 1, vec![vec![Vector3::zeros()]])
            .unwrap();
        assert!(traj.frame(1).is_err());
    }
}
