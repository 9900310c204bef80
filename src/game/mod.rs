//! Hide & Seek game model.
//!
//! This module turns a world description into a zero-sum payoff matrix and
//! plays rounds against the solved equilibrium.
//!
//! # Pipeline
//!
//! ```text
//! World::create ─▶ PayoffMatrixBuilder::build ─▶ ProximityAdjuster::apply (optional)
//!                                                         │
//!                                                         ▼
//!                  Simulation::run ◀── EquilibriumSolver::solve
//! ```
//!
//! Matrices are indexed `[seeker][hider]`. The seeker scores high on a catch
//! at a HARD place; the hider scores high when caught at an EASY place and
//! whenever it escapes.

pub mod config;
pub mod payoff;
pub mod proximity;
pub mod round;
pub mod simulation;
pub mod world;

// Re-export main types for convenient access
pub use config::{ConfigError, GameConfig};
pub use payoff::{BaseScores, PayoffMatrix, PayoffMatrixBuilder, PayoffPair};
pub use proximity::{PenaltyShape, ProximityAdjuster, ProximityPenalty};
pub use round::{play_round, Role, RoundOutcome, Scoreboard};
pub use simulation::{
    run_batch, ComputerPlayer, Player, RandomPlayer, Simulation, SimulationReport, MAX_HISTORY,
};
pub use world::{Dimensions, Location, PlaceType, TypeDistribution, World};
