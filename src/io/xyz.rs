//! Multi-frame extended XYZ reader.
//!
//! Each frame is an atom count line, a comment line carrying
//! `Lattice="Lx 0 0 0 Ly 0 0 0 Lz"`, then one `type x y z` row per site.
//! Only cubic lattices are accepted, and the site types must be the same in
//! every frame.

use crate::error::{PcfError, PcfResult};
use crate::trajectory::{InMemoryTrajectory, Trajectory};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

pub fn read_xyz_trajectory(path: &Path) -> PcfResult<InMemoryTrajectory> {
    let file = File::open(path).map_err(|e| {
        PcfError::Trajectory(format!("cannot open {}: {}", path.display(), e))
    })?;
    let trajectory = parse_xyz_trajectory(BufReader::new(file))?;
    info!(
        "Read {} frames of {} sites from {}",
        trajectory.n_frames(),
        trajectory.site_types().len(),
        path.display()
    );
    Ok(trajectory)
}

pub fn parse_xyz_trajectory<R: BufRead>(reader: R) -> PcfResult<InMemoryTrajectory> {
    let mut lines = reader.lines().enumerate();
    let mut box_length: Option<f64> = None;
    let mut site_types: Option<Vec<String>> = None;
    let mut frames = Vec::new();

    while let Some((line_no, line)) = lines.next() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let frame_index = frames.len();
        let n_sites: usize = trimmed.parse().map_err(|_| {
            PcfError::Trajectory(format!(
                "line {}: invalid site count '{}'",
                line_no + 1,
                trimmed
            ))
        })?;

        let (comment_no, comment) = lines.next().ok_or_else(|| {
            PcfError::Trajectory(format!("frame {} is missing its comment line", frame_index))
        })?;
        let edge = parse_cubic_lattice(&comment?).map_err(|msg| {
            PcfError::Trajectory(format!("line {}: {}", comment_no + 1, msg))
        })?;
        match box_length {
            None => box_length = Some(edge),
            Some(first) if (first - edge).abs() > 1e-9 * first.abs() => {
                return Err(PcfError::Trajectory(format!(
                    "frame {} has box edge {} but frame 0 has {}",
                    frame_index, edge, first
                )));
            }
            Some(_) => {}
        }

        let mut types = Vec::with_capacity(n_sites);
        let mut positions = Vec::with_capacity(n_sites);
        for _ in 0..n_sites {
            let (row_no, row) = lines.next().ok_or_else(|| {
                PcfError::Trajectory(format!(
                    "frame {} ends after {} of {} sites",
                    frame_index,
                    positions.len(),
                    n_sites
                ))
            })?;
            let row = row?;
            let (kind, position) = parse_site(&row).map_err(|msg| {
                PcfError::Trajectory(format!("line {}: {}", row_no + 1, msg))
            })?;
            types.push(kind);
            positions.push(position);
        }

        match &site_types {
            None => site_types = Some(types),
            Some(expected) if *expected != types => {
                return Err(PcfError::Trajectory(format!(
                    "site types of frame {} differ from frame 0",
                    frame_index
                )));
            }
            Some(_) => {}
        }
        frames.push(positions);
    }

    let box_length =
        box_length.ok_or_else(|| PcfError::Trajectory("trajectory contains no frames".into()))?;
    InMemoryTrajectory::new(box_length, site_types.unwrap_or_default(), frames)
}

/// Edge length from a `Lattice="..."` entry; the cell must be cubic.
fn parse_cubic_lattice(comment: &str) -> Result<f64, String> {
    let start = comment
        .find("Lattice=\"")
        .ok_or_else(|| "comment line has no Lattice=\"...\" entry".to_string())?
        + "Lattice=\"".len();
    let end = comment[start..]
        .find('"')
        .ok_or_else(|| "unterminated Lattice entry".to_string())?
        + start;
    let values = comment[start..end]
        .split_whitespace()
        .map(|v| v.parse::<f64>().map_err(|_| format!("bad lattice value '{}'", v)))
        .collect::<Result<Vec<f64>, String>>()?;
    if values.len() != 9 {
        return Err(format!("lattice needs 9 values, found {}", values.len()));
    }
    let edge = values[0];
    let off_diagonal = [1, 2, 3, 5, 6, 7];
    if off_diagonal.iter().any(|&i| values[i] != 0.0) {
        return Err("only orthogonal cells are supported".to_string());
    }
    if values[4] != edge || values[8] != edge {
        return Err(format!(
            "only cubic cells are supported, got {} x {} x {}",
            edge, values[4], values[8]
        ));
    }
    Ok(edge)
}

fn parse_site(row: &str) -> Result<(String, Vector3<f64>), String> {
    let parts: Vec<&str> = row.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(format!("expected 'type x y z', got '{}'", row.trim()));
    }
    let mut coords = [0.0; 3];
    for (k, part) in parts[1..4].iter().enumerate() {
        coords[k] = part
            .parse()
            .map_err(|_| format!("bad coordinate '{}'", part))?;
    }
    Ok((
        parts[0].to_string(),
        Vector3::new(coords[0], coords[1], coords[2]),
    ))
}
