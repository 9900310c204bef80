//! # Hide & Seek Solver
//!
//! Computes optimal mixed strategies for a Hide & Seek game played on a
//! 1D line or 2D grid of locations, and plays rounds against them.
//!
//! ## Features
//!
//! - **Exact Equilibria**: Solves both sides' linear programs with a
//!   Bland's-rule simplex and cross-checks the minimax value
//! - **Typed Worlds**: HARD / NEUTRAL / EASY places drawn from a seeded
//!   distribution
//! - **Proximity Penalty**: Optional distance-based discount on near misses
//! - **Reproducible Play**: Every random draw comes from a seeded RNG
//! - **Batch Runs**: Independent games solved in parallel
//!
//! ## Quick Start
//!
//! ```
//! use hide_seek_solver::game::{GameConfig, Simulation};
//!
//! let sim = Simulation::new(GameConfig::line(5).with_seed(7)).unwrap();
//! let report = sim.run(100).unwrap();
//!
//! assert_eq!(report.scoreboard.rounds, 100);
//! println!("value {:.3}, observed {:.3}", sim.solution().value, report.scoreboard.average_seeker_score());
//! ```
//!
//! ## Modules
//!
//! - [`lp`]: Generic zero-sum LP solver and mixed-strategy sampling
//! - [`game`]: World, payoffs, proximity, rounds and simulation
//! - [`error`]: Error type shared by both
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Equilibrium Solver (Generic LP)                 │
//! │  - Positive-game shift    - Bland's-rule simplex                │
//! │  - Duality cross-check    - Strategy sampling                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements MatrixGame trait
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌─────────┐         ┌───────────┐         ┌───────────┐
//!    │ Payoff  │         │ Proximity │         │  Raw      │
//!    │ Matrix  │         │ Adjusted  │         │ Vec<Vec>  │
//!    └─────────┘         └───────────┘         └───────────┘
//! ```

#![warn(missing_docs)]

/// Error type and result alias.
pub mod error;

/// Hide & Seek game model.
///
/// Builds worlds and payoff matrices and simulates rounds.
pub mod game;

/// Linear-programming equilibrium engine.
///
/// This is the core module; it knows nothing about Hide & Seek.
pub mod lp;

// Re-export commonly used types at crate root for convenience
pub use error::{GameError, Result};
pub use game::{GameConfig, PayoffMatrix, Role, Simulation, World};
pub use lp::{EquilibriumSolver, MatrixGame, MixedStrategy, SolveResult, SolverConfig};
