//! Linear-programming equilibrium engine.
//!
//! This module solves finite two-player zero-sum games exactly by reducing
//! them to a pair of dual linear programs.
//!
//! # Overview
//!
//! For a payoff matrix `M` where the row player (seeker) maximizes and the
//! column player (hider) minimizes:
//!
//! 1. Shift `M` so that every entry is at least 1 (conditioning only; the
//!    shift is removed from every reported value)
//! 2. Solve the hider's program and the seeker's program independently
//!    with a dense-tableau simplex using Bland's rule
//! 3. Check that both values agree and that each strategy actually
//!    guarantees the value against every pure reply
//!
//! # Example
//!
//! ```
//! use hide_seek_solver::lp::{EquilibriumSolver, SolverConfig, StrategySampler};
//!
//! let game = vec![vec![3.0, 0.0], vec![0.0, 1.0]];
//! let solver = EquilibriumSolver::new(SolverConfig::default());
//! let result = solver.solve(&game).unwrap();
//!
//! assert!((result.value - 0.75).abs() < 1e-9);
//! let pick = StrategySampler::sample(&result.seeker_strategy, 0.9).unwrap();
//! assert_eq!(pick, 1);
//! ```
//!
//! # Theory
//!
//! **Minimax theorem**: for any finite zero-sum game
//! ```text
//! max_p min_q pᵀ M q = min_q max_p pᵀ M q
//! ```
//! and the seeker and hider programs are LP duals, so solving both and
//! comparing the optima is a built-in correctness check.

pub mod config;
pub mod game;
pub mod simplex;
pub mod solver;
pub mod strategy;

// Re-export main types for convenient access
pub use config::{ConfigError, SolveStats, SolverConfig};
pub use game::MatrixGame;
pub use solver::EquilibriumSolver;
pub use strategy::{validate_weights, MixedStrategy, SolveResult, StrategySampler};
