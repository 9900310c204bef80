//! Error taxonomy for the equilibrium engine.
//!
//! Every variant is a contract violation rather than a transient fault:
//! the pipeline reports it synchronously and never retries. Hosts decide
//! whether to surface the error to a user or treat it as fatal.

use std::fmt;

/// Errors raised by the world, matrix, solver and sampler stages.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A linear location index falls outside the world (or matrix).
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of valid locations.
        len: usize,
    },
    /// A grid coordinate falls outside a 2D world.
    OutOfBoundsCoord {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid height.
        rows: usize,
        /// Grid width.
        cols: usize,
    },
    /// A proximity penalty produced a multiplier outside `(0, 1]` or
    /// decreased as distance grew.
    InvalidPenaltyFunction {
        /// Distance at which the violation was observed.
        distance: f64,
        /// Multiplier returned at that distance.
        multiplier: f64,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// The LP was infeasible, unbounded or failed verification. This points
    /// to a bug in matrix construction, not to a valid game state.
    MalformedGame(String),
    /// A weight vector (or draw) is not a valid probability input.
    InvalidDistribution(String),
    /// Base scores break the HARD/NEUTRAL/EASY ordering.
    InvalidBaseScores(String),
    /// Place-type weights cannot be sampled from.
    InvalidTypeDistribution(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds { index, len } => {
                write!(f, "Location {} is out of bounds (world has {} locations)", index, len)
            }
            GameError::OutOfBoundsCoord { row, col, rows, cols } => {
                write!(f, "Location ({}, {}) is out of bounds for a {}x{} grid", row, col, rows, cols)
            }
            GameError::InvalidPenaltyFunction { distance, multiplier, reason } => {
                write!(
                    f,
                    "Invalid penalty function: multiplier {} at distance {} ({})",
                    multiplier, distance, reason
                )
            }
            GameError::MalformedGame(msg) => write!(f, "Malformed game: {}", msg),
            GameError::InvalidDistribution(msg) => write!(f, "Invalid distribution: {}", msg),
            GameError::InvalidBaseScores(msg) => write!(f, "Invalid base scores: {}", msg),
            GameError::InvalidTypeDistribution(msg) => {
                write!(f, "Invalid place type distribution: {}", msg)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GameError>;
