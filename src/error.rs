use thiserror::Error;

/// Failures raised by the pair correlation engine.
///
/// `Config` and `Trajectory` are input problems reported before any frame is
/// processed. `BinOutOfRange` and `PlanMismatch` mean the derived histogram or
/// work plan does not fit the frame and are never caused by user input.
#[derive(Debug, Error)]
pub enum PcfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("trajectory error: {0}")]
    Trajectory(String),
    #[error(
        "bin index {bin} out of range for histogram of length {len} \
         (distance {distance:.6} between molecules {first} and {partner})"
    )]
    BinOutOfRange {
        bin: usize,
        len: usize,
        distance: f64,
        first: usize,
        partner: usize,
    },
    #[error("work plan does not fit the frame: {0}")]
    PlanMismatch(String),
    #[error("pair task for molecule {start} panicked: {message}")]
    WorkerPanicked { start: usize, message: String },
    #[error("histogram lock poisoned")]
    LockPoisoned,
    #[error("histogram has already been normalized")]
    AlreadyNormalized,
}

pub type PcfResult<T> = Result<T, PcfError>;
