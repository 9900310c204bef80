//! Round resolution and score keeping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game::payoff::PayoffMatrix;
use crate::lp::{MixedStrategy, SolveResult};

/// Which side a player takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Picks a location to hide in.
    Hider,
    /// Picks a location to search.
    Seeker,
}

impl Role {
    /// The other side.
    pub fn opponent(&self) -> Role {
        match self {
            Role::Hider => Role::Seeker,
            Role::Seeker => Role::Hider,
        }
    }

    /// This side's optimal strategy from a solve result.
    pub fn strategy<'a>(&self, result: &'a SolveResult) -> &'a MixedStrategy {
        match self {
            Role::Hider => &result.hider_strategy,
            Role::Seeker => &result.seeker_strategy,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Hider => write!(f, "Hider"),
            Role::Seeker => write!(f, "Seeker"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hider" => Ok(Role::Hider),
            "seeker" => Ok(Role::Seeker),
            other => Err(format!("unknown role '{}', expected hider or seeker", other)),
        }
    }
}

/// What happened in a single round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Where the hider hid.
    pub hider_pos: usize,
    /// Where the seeker searched.
    pub seeker_pos: usize,
    /// Whether the seeker found the hider.
    pub found: bool,
    /// Seeker's payoff for this round.
    pub seeker_score: f64,
    /// Hider's payoff for this round.
    pub hider_score: f64,
}

impl RoundOutcome {
    /// Side that won the round.
    pub fn winner(&self) -> Role {
        if self.found {
            Role::Seeker
        } else {
            Role::Hider
        }
    }
}

/// Resolve one round: both sides are credited their cell payoff, and the
/// win goes to the seeker on a catch and to the hider otherwise.
pub fn play_round(matrix: &PayoffMatrix, hider_pos: usize, seeker_pos: usize) -> Result<RoundOutcome> {
    let pair = matrix.pair(seeker_pos, hider_pos)?;
    Ok(RoundOutcome {
        hider_pos,
        seeker_pos,
        found: hider_pos == seeker_pos,
        seeker_score: pair.seeker,
        hider_score: pair.hider,
    })
}

/// Running totals across rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Rounds played.
    pub rounds: u64,
    /// Cumulative hider score.
    pub hider_score: f64,
    /// Cumulative seeker score.
    pub seeker_score: f64,
    /// Rounds the hider escaped.
    pub hider_wins: u64,
    /// Rounds the seeker found the hider.
    pub seeker_wins: u64,
}

impl Scoreboard {
    /// Create an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a round to the totals.
    pub fn record(&mut self, outcome: &RoundOutcome) {
        self.rounds += 1;
        self.hider_score += outcome.hider_score;
        self.seeker_score += outcome.seeker_score;
        match outcome.winner() {
            Role::Seeker => self.seeker_wins += 1,
            Role::Hider => self.hider_wins += 1,
        }
    }

    /// Clear all totals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Mean seeker score per round; comparable to the game value.
    pub fn average_seeker_score(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.seeker_score / self.rounds as f64
        }
    }

    /// Cumulative score for a side.
    pub fn score(&self, role: Role) -> f64 {
        match role {
            Role::Hider => self.hider_score,
            Role::Seeker => self.seeker_score,
        }
    }

    /// Win count for a side.
    pub fn wins(&self, role: Role) -> u64 {
        match role {
            Role::Hider => self.hider_wins,
            Role::Seeker => self.seeker_wins,
        }
    }
}
