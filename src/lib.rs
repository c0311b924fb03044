//! Parallel center-of-geometry pair correlation functions for periodic
//! molecular trajectories.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod pcf;
pub mod trajectory;

pub use error::{PcfError, PcfResult};
pub use trajectory::{InMemoryTrajectory, Trajectory};
