use thiserror::Error;
use validator::ValidationErrors;

/// Errors raised by lattice construction and spin assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    #[error("invalid lattice dimensions {rows}x{cols}: both axes must be positive")]
    InvalidDimension { rows: usize, cols: usize },
    #[error("invalid spin value {0}, expected +1 or -1")]
    InvalidSpinValue(i8),
}

/// Errors raised while setting up or running a job.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Lattice(#[from] LatticeError),
    #[error("invalid simulation config: {0}")]
    Config(#[from] ValidationErrors),
}
