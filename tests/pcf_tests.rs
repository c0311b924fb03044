use approx::assert_relative_eq;
use cog_pcf::pcf::{
    accumulate, pair_weight, total_pairs, FrameOrchestrator, PairKernel, SystemLayout,
};
use cog_pcf::Trajectory;
use std::collections::HashSet;

mod common;
use common::{random_molecules, single_bead_frame, DepositLog};

fn run_single_frame(
    traj: &impl Trajectory,
    bin_width: f64,
    workers: usize,
) -> Vec<common::Deposit> {
    let layout = SystemLayout::derive(traj, bin_width, 1.0).unwrap();
    let positions = traj.frame(0).unwrap();
    let kernel = PairKernel::new(
        &positions,
        layout.box_length,
        layout.beads_per_molecule,
        layout.bin_width,
        layout.weight,
    )
    .unwrap();
    let orchestrator = FrameOrchestrator::new(layout.n_molecules, workers).unwrap();
    let log = DepositLog::default();
    orchestrator.run_frame(0, &kernel, &log).unwrap();
    log.take()
}

#[test]
fn boundary_wrap_uses_nearest_image() {
    let traj = single_bead_frame(10.0, &[[0.05, 0.0, 0.0], [9.95, 0.0, 0.0]]);
    let deposits = run_single_frame(&traj, 0.01, 2);
    assert_eq!(deposits.len(), 1);
    assert_relative_eq!(deposits[0].distance, 0.1, epsilon = 1e-9);
    assert_eq!(deposits[0].bin, 10);
}

#[test]
fn unit_distance_lands_in_bin_ten() {
    let traj = single_bead_frame(10.0, &[[1.0, 1.0, 1.0], [2.0, 1.0, 1.0]]);
    let layout = SystemLayout::derive(&traj, 0.1, 1.0).unwrap();
    let result = accumulate(&traj, &layout, 3).unwrap();

    let values = result.histogram.values();
    assert_eq!(values.len(), layout.histogram_len());
    for (i, value) in values.iter().enumerate() {
        if i == 10 {
            assert_relative_eq!(*value, pair_weight(1, 10.0, 2));
        } else {
            assert_eq!(*value, 0.0, "bin {i}");
        }
    }
}

#[test]
fn four_molecules_three_workers_count_each_pair_once() {
    let traj = random_molecules(11, 8.0, 4, 3, 1);
    let deposits = run_single_frame(&traj, 0.01, 3);
    let pairs: Vec<(usize, usize)> = deposits.iter().map(|d| (d.first, d.partner)).collect();
    let unique: HashSet<(usize, usize)> = pairs.iter().copied().collect();
    assert_eq!(pairs.len(), 6);
    assert_eq!(unique.len(), 6);
    assert!(pairs.iter().all(|(a, b)| a < b));
}

#[test]
fn distances_never_exceed_half_box_diagonal() {
    let box_length = 8.0;
    let bound = box_length * 3f64.sqrt() / 2.0;
    for seed in 0..5 {
        let traj = random_molecules(seed, box_length, 40, 4, 1);
        for d in run_single_frame(&traj, 0.05, 4) {
            assert!(
                d.distance <= bound + 1e-9,
                "seed {seed}: distance {} exceeds {}",
                d.distance,
                bound
            );
        }
    }
}

#[test]
fn worker_count_does_not_change_histogram() {
    let traj = random_molecules(3, 6.0, 23, 2, 3);
    let layout = SystemLayout::derive(&traj, 0.1, 1.0).unwrap();
    let reference = accumulate(&traj, &layout, 1).unwrap();
    for workers in [2, 5, 23, 40] {
        let other = accumulate(&traj, &layout, workers).unwrap();
        assert_eq!(total_pairs(&other.frames), total_pairs(&reference.frames));
        for (a, b) in reference
            .histogram
            .values()
            .iter()
            .zip(other.histogram.values())
        {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}

#[test]
fn only_trailing_frames_are_used() {
    let traj = random_molecules(5, 6.0, 10, 2, 9);
    let layout = SystemLayout::derive(&traj, 0.1, 0.34).unwrap();
    let result = accumulate(&traj, &layout, 4).unwrap();
    let frames: Vec<usize> = result.frames.iter().map(|f| f.frame).collect();
    assert_eq!(frames, vec![6, 7, 8]);
    assert_eq!(total_pairs(&result.frames), 3 * 45);
}

#[test]
fn ideal_gas_tends_to_one() {
    let traj = random_molecules(42, 10.0, 200, 1, 5);
    let layout = SystemLayout::derive(&traj, 0.05, 1.0).unwrap();
    let mut histogram = accumulate(&traj, &layout, 4).unwrap().histogram;
    let table = histogram.normalize().unwrap();

    let window: Vec<f64> = table
        .iter()
        .filter(|(r, _)| (2.0..4.0).contains(r))
        .map(|(_, g)| *g)
        .collect();
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    assert!((mean - 1.0).abs() < 0.1, "mean g(r) = {mean}");
}
