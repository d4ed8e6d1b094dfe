use thiserror::Error;

/// Invalid configuration detected before any simulation runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("world side must be positive (got {0})")]
    NonPositiveSide(usize),

    #[error("world of {requested} cells exceeds the limit of {max}")]
    TooManyCells { requested: usize, max: usize },

    #[error("row {row} has {len} cells, expected {side}")]
    RaggedRow { row: usize, len: usize, side: usize },

    #[error("satisfaction threshold must lie in [0, 1] (got {0})")]
    InvalidThreshold(f64),

    #[error("proportion for {kind} must be a finite non-negative number (got {value})")]
    NegativeProportion { kind: &'static str, value: f64 },

    #[error("proportions must sum to 1.0 (got {0})")]
    ProportionSum(f64),

    #[error("proportions cover only {capacity} of {cells} cells after rounding")]
    InsufficientCapacity { capacity: usize, cells: usize },
}

/// Rejects thresholds outside `[0, 1]`, NaN included.
pub fn check_threshold(threshold: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}
