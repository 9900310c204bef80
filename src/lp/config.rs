//! Configuration options for the equilibrium solver.
//!
//! This module provides the numeric policy used by the simplex engine and
//! the statistics reported after each solve.

use serde::{Deserialize, Serialize};

/// Configuration for the equilibrium solver.
///
/// This struct controls the numeric policy of the LP solve:
/// - Acceptance tolerance for feasibility and minimax equality
/// - Pivot tolerance used when selecting entering/leaving variables
/// - A hard cap on simplex pivots
///
/// # Example
/// ```
/// use hide_seek_solver::lp::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.tolerance, 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Acceptance tolerance `ε`.
    ///
    /// Strategies must lie on the probability simplex within `ε`, every
    /// LP constraint must hold within `ε`, and the seeker and hider values
    /// must agree within `ε`.
    pub tolerance: f64,

    /// Threshold below which tableau entries are treated as zero when
    /// choosing pivots.
    pub pivot_tolerance: f64,

    /// Maximum number of simplex pivots per LP.
    ///
    /// Bland's rule guarantees termination, so hitting this limit means the
    /// input was not a well-formed game.
    pub max_pivots: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            pivot_tolerance: 1e-9,
            max_pivots: 10_000,
        }
    }
}

impl SolverConfig {
    /// Create a new SolverConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stricter configuration for reference comparisons.
    pub fn strict() -> Self {
        Self {
            tolerance: 1e-9,
            pivot_tolerance: 1e-12,
            ..Default::default()
        }
    }

    /// Builder method: set acceptance tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method: set pivot tolerance.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Builder method: set pivot cap.
    pub fn with_max_pivots(mut self, max_pivots: usize) -> Self {
        self.max_pivots = max_pivots;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::InvalidTolerance("acceptance", self.tolerance));
        }
        if !(self.pivot_tolerance > 0.0 && self.pivot_tolerance <= self.tolerance) {
            return Err(ConfigError::InvalidTolerance("pivot", self.pivot_tolerance));
        }
        if self.max_pivots == 0 {
            return Err(ConfigError::ZeroPivotLimit);
        }
        Ok(())
    }
}

/// Errors that can occur when validating solver configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// A tolerance is out of range.
    InvalidTolerance(&'static str, f64),
    /// The pivot cap is zero.
    ZeroPivotLimit,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTolerance(name, val) => {
                write!(f, "{} tolerance {} is out of range", name, val)
            }
            ConfigError::ZeroPivotLimit => write!(f, "max_pivots must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Statistics tracked for a single solve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveStats {
    /// Number of locations (matrix dimension).
    pub size: usize,

    /// Additive shift applied before the simplex runs.
    pub shift: f64,

    /// Pivots spent on the seeker LP.
    pub seeker_pivots: usize,

    /// Pivots spent on the hider LP.
    pub hider_pivots: usize,

    /// Game value obtained from the seeker LP.
    pub seeker_value: f64,

    /// Game value obtained from the hider LP.
    pub hider_value: f64,

    /// Total time spent solving (in seconds).
    pub elapsed_seconds: f64,
}

impl SolveStats {
    /// Absolute gap between the two LP values.
    pub fn duality_gap(&self) -> f64 {
        (self.seeker_value - self.hider_value).abs()
    }

    /// Total pivots across both LPs.
    pub fn total_pivots(&self) -> usize {
        self.seeker_pivots + self.hider_pivots
    }
}
