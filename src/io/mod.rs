//! Input/Output operations for pair correlation runs
//!
//! This module handles trajectory reading, logging setup and the result table.

mod output;
mod xyz;

pub use output::{save_pcf_table, setup_output, write_pcf_table, TABLE_HEADER};
pub use xyz::{parse_xyz_trajectory, read_xyz_trajectory};
