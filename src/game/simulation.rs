//! Round-by-round play between the solved computer and an opponent.
//!
//! A [`Simulation`] runs the whole pipeline once (world, payoff matrix,
//! optional proximity penalty, equilibrium solve) and can then replay any
//! number of rounds against that fixed solution. Each player owns its own
//! seeded RNG, so a run is fully determined by the configuration.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::config::GameConfig;
use crate::game::payoff::{PayoffMatrix, PayoffMatrixBuilder};
use crate::game::proximity::ProximityAdjuster;
use crate::game::round::{play_round, Role, RoundOutcome, Scoreboard};
use crate::game::world::World;
use crate::lp::{EquilibriumSolver, MixedStrategy, SolveResult, SolveStats, StrategySampler};

/// Seed offsets so the world and the two players never share a stream.
const COMPUTER_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
const OPPONENT_STREAM: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Rounds kept in [`SimulationReport::rounds`]; later rounds only reach the
/// scoreboard and pick counts.
pub const MAX_HISTORY: usize = 10_000;

/// Something that picks a location each round.
pub trait Player {
    /// Side this player takes.
    fn role(&self) -> Role;

    /// Pick a location index for the next round.
    fn choose(&mut self) -> usize;
}

/// Plays its side of the equilibrium by sampling the optimal strategy.
pub struct ComputerPlayer {
    role: Role,
    strategy: MixedStrategy,
    rng: StdRng,
}

impl ComputerPlayer {
    /// Seat the computer on `role` using the strategy from `solution`.
    pub fn new(role: Role, solution: &SolveResult, seed: u64) -> Self {
        Self {
            role,
            strategy: role.strategy(solution).clone(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The strategy being sampled.
    pub fn strategy(&self) -> &MixedStrategy {
        &self.strategy
    }
}

impl Player for ComputerPlayer {
    fn role(&self) -> Role {
        self.role
    }

    fn choose(&mut self) -> usize {
        StrategySampler::sample_rng(&self.strategy, &mut self.rng)
    }
}

/// Picks uniformly at random; stands in for a human opponent.
pub struct RandomPlayer {
    role: Role,
    locations: usize,
    rng: StdRng,
}

impl RandomPlayer {
    /// Create a uniform player over `locations` places.
    pub fn new(role: Role, locations: usize, seed: u64) -> Result<Self> {
        if locations == 0 {
            return Err(GameError::InvalidDistribution(
                "random player needs at least one location".to_string(),
            ));
        }
        Ok(Self {
            role,
            locations,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Player for RandomPlayer {
    fn role(&self) -> Role {
        self.role
    }

    fn choose(&mut self) -> usize {
        self.rng.gen_range(0..self.locations)
    }
}

/// Everything a finished simulation reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Name of the configuration that produced this report
    pub name: String,
    /// The world that was played on
    pub world: World,
    /// Side the computer played
    pub computer_role: Role,
    /// Equilibrium strategies and value
    pub solution: SolveResult,
    /// LP diagnostics
    pub solve_stats: SolveStats,
    /// Running totals
    pub scoreboard: Scoreboard,
    /// How often the computer picked each location
    pub computer_picks: Vec<u64>,
    /// The first rounds in order, at most [`MAX_HISTORY`] of them
    pub rounds: Vec<RoundOutcome>,
}

impl SimulationReport {
    /// Gap between the observed mean seeker score and the game value.
    pub fn value_gap(&self) -> f64 {
        self.scoreboard.average_seeker_score() - self.solution.value
    }

    /// Empirical frequency of each computer pick.
    pub fn pick_frequencies(&self) -> Vec<f64> {
        let total = self.scoreboard.rounds.max(1) as f64;
        self.computer_picks.iter().map(|&c| c as f64 / total).collect()
    }

    /// Save the report as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

/// A solved game ready to be played.
pub struct Simulation {
    config: GameConfig,
    world: World,
    matrix: PayoffMatrix,
    solution: SolveResult,
    stats: SolveStats,
}

impl Simulation {
    /// Build the world and solve it.
    pub fn new(config: GameConfig) -> Result<Self> {
        let world = config.build_world()?;
        let base = PayoffMatrixBuilder::build(&world, &config.scores)?;
        let matrix = match &config.proximity {
            Some(shape) => ProximityAdjuster::apply(&base, &world, shape)?,
            None => base,
        };

        let solver = EquilibriumSolver::new(config.solver.clone());
        let (solution, stats) = solver.solve_with_stats(&matrix)?;

        log::info!(
            "{}: solved {} world ({} locations), value {:.6}, {} pivots",
            config.name,
            world.dimensions(),
            world.len(),
            solution.value,
            stats.total_pivots()
        );

        Ok(Self {
            config,
            world,
            matrix,
            solution,
            stats,
        })
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The world being played on.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Payoff matrix after any proximity adjustment.
    pub fn matrix(&self) -> &PayoffMatrix {
        &self.matrix
    }

    /// Equilibrium strategies and value.
    pub fn solution(&self) -> &SolveResult {
        &self.solution
    }

    /// Play `rounds` rounds of the computer against a uniform opponent.
    pub fn run(&self, rounds: u64) -> Result<SimulationReport> {
        let role = self.config.computer_role;
        let seed = self.config.seed;
        let mut computer = ComputerPlayer::new(role, &self.solution, seed ^ COMPUTER_STREAM);
        let mut opponent = RandomPlayer::new(role.opponent(), self.world.len(), seed ^ OPPONENT_STREAM)?;
        self.run_with(&mut computer, &mut opponent, rounds)
    }

    /// Play `rounds` rounds between two arbitrary players.
    ///
    /// `computer` is the player whose picks are tallied in the report.
    pub fn run_with<C, O>(&self, computer: &mut C, opponent: &mut O, rounds: u64) -> Result<SimulationReport>
    where
        C: Player + ?Sized,
        O: Player + ?Sized,
    {
        if computer.role() == opponent.role() {
            return Err(GameError::MalformedGame(format!(
                "both players are on the {} side",
                computer.role()
            )));
        }

        let mut scoreboard = Scoreboard::new();
        let mut computer_picks = vec![0u64; self.world.len()];
        let mut history = Vec::with_capacity(history_capacity(rounds));

        for round in 0..rounds {
            let computer_pos = computer.choose();
            let opponent_pos = opponent.choose();
            let (hider_pos, seeker_pos) = match computer.role() {
                Role::Hider => (computer_pos, opponent_pos),
                Role::Seeker => (opponent_pos, computer_pos),
            };

            let outcome = play_round(&self.matrix, hider_pos, seeker_pos)?;
            computer_picks[computer_pos] += 1;
            scoreboard.record(&outcome);
            if history.len() < MAX_HISTORY {
                history.push(outcome);
            }

            log::trace!(
                "round {}: hider {} seeker {} found={}",
                round + 1,
                hider_pos,
                seeker_pos,
                outcome.found
            );
        }

        log::debug!(
            "{}: {} rounds, seeker avg {:.4} vs value {:.4}",
            self.config.name,
            scoreboard.rounds,
            scoreboard.average_seeker_score(),
            self.solution.value
        );

        Ok(SimulationReport {
            name: self.config.name.clone(),
            world: self.world.clone(),
            computer_role: computer.role(),
            solution: self.solution.clone(),
            solve_stats: self.stats.clone(),
            scoreboard,
            computer_picks,
            rounds: history,
        })
    }
}

fn history_capacity(rounds: u64) -> usize {
    usize::try_from(rounds).map_or(MAX_HISTORY, |r| r.min(MAX_HISTORY))
}

/// Build and run each configuration in parallel, using its own round count.
///
/// `on_done` is called once per finished configuration, from whichever
/// worker thread finished it.
pub fn run_batch<F>(configs: &[GameConfig], on_done: F) -> Vec<Result<SimulationReport>>
where
    F: Fn(&GameConfig) + Sync,
{
    configs
        .par_iter()
        .map(|config| {
            let report = Simulation::new(config.clone()).and_then(|sim| sim.run(config.rounds));
            on_done(config);
            report
        })
        .collect()
}
