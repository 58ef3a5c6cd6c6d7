use crate::chrom::element::ChromError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("population size must be positive (non-zero)")]
    InvalidPopulationSize,

    #[error("missing seed chromosome for population construction")]
    MissingSeedChromosome,

    #[error("missing scoring function for population construction")]
    MissingScoringFunction,

    #[error("replicate count must be positive (non-zero)")]
    InvalidReplicateCount,

    #[error("population failure - not enough diversity")]
    InsufficientDiversity,

    #[error("simplex search has not been initialised")]
    SimplexUninitialised,

    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Chrom(#[from] ChromError),
}
