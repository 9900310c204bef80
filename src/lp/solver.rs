//! Exact equilibrium solver for zero-sum matrix games.
//!
//! The seeker (row player) maximizes its score `M[s][h]`; the hider (column
//! player) minimizes it. Written over the loss matrix `L = -M` that the
//! seeker minimizes, the two programs are:
//!
//! ```text
//! Seeker LP:  minimize v    s.t. Σ_s p[s]·L[s][h] ≤ v  ∀h,  Σ p = 1,  p ≥ 0
//! Hider LP:   maximize w    s.t. Σ_h q[h]·L[s][h] ≥ w  ∀s,  Σ q = 1,  q ≥ 0
//! ```
//!
//! They are duals of each other, so by the minimax theorem their optima
//! coincide. The reported value is the seeker's expected score, `-v = -w`.
//!
//! Each program is solved through the positive-game reduction: for the
//! minimizing column player of a game `A`, shift every entry to at least 1
//! with `k = 1 - min(A)`, solve `max Σy s.t. (A + k)·y ≤ 1, y ≥ 0`, and
//! recover `value = 1/Σy - k`, `q = y/Σy`. The hider is the column player of
//! `M`; the seeker is the column player of `-Mᵀ`. The shift is always
//! subtracted back out before a value is reported.

use std::time::Instant;

use crate::error::{GameError, Result};
use crate::lp::config::{SolveStats, SolverConfig};
use crate::lp::game::MatrixGame;
use crate::lp::simplex::solve_positive_game;
use crate::lp::strategy::{MixedStrategy, SolveResult};

/// LP-based equilibrium solver.
///
/// # Example
/// ```
/// use hide_seek_solver::lp::{EquilibriumSolver, SolverConfig};
///
/// // Matching pennies: value 0, both sides mix 50/50.
/// let game = vec![vec![1.0, -1.0], vec![-1.0, 1.0]];
/// let result = EquilibriumSolver::new(SolverConfig::default()).solve(&game).unwrap();
/// assert!(result.value.abs() < 1e-9);
/// assert!((result.seeker_strategy.weights()[0] - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquilibriumSolver {
    config: SolverConfig,
}

/// One side's solution to the positive-game reduction.
struct ColumnSolution {
    strategy: MixedStrategy,
    value: f64,
    shift: f64,
    pivots: usize,
}

impl EquilibriumSolver {
    /// Create a solver with the given numeric policy.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the game and return both optimal strategies and the value.
    pub fn solve<G: MatrixGame + ?Sized>(&self, game: &G) -> Result<SolveResult> {
        self.solve_with_stats(game).map(|(result, _)| result)
    }

    /// Solve the game, also returning per-LP diagnostics.
    pub fn solve_with_stats<G: MatrixGame + ?Sized>(&self, game: &G) -> Result<(SolveResult, SolveStats)> {
        let start_time = Instant::now();
        let rows = checked_rows(game)?;
        let (n_rows, n_cols) = (rows.len(), rows[0].len());

        // Hider: column player of M.
        let hider = self.solve_column_player(&rows)?;

        // Seeker: column player of -Mᵀ, whose value is the negated game value.
        let negated_transpose: Vec<Vec<f64>> = (0..n_cols)
            .map(|h| (0..n_rows).map(|s| -rows[s][h]).collect())
            .collect();
        let seeker = self.solve_column_player(&negated_transpose)?;
        let seeker_value = -seeker.value;

        let scale = rows.iter().flatten().fold(1.0_f64, |m, &x| m.max(x.abs()));
        let eps = self.config.tolerance * scale;

        if (seeker_value - hider.value).abs() > eps {
            return Err(GameError::MalformedGame(format!(
                "seeker LP value {} differs from hider LP value {}",
                seeker_value, hider.value
            )));
        }
        let value = 0.5 * (seeker_value + hider.value);

        let guarantee = game.row_guarantee(seeker.strategy.weights());
        if guarantee < value - eps {
            return Err(GameError::MalformedGame(format!(
                "seeker strategy only guarantees {} against value {}",
                guarantee, value
            )));
        }
        let concession = game.col_concession(hider.strategy.weights());
        if concession > value + eps {
            return Err(GameError::MalformedGame(format!(
                "hider strategy concedes {} against value {}",
                concession, value
            )));
        }

        let stats = SolveStats {
            size: n_rows,
            shift: hider.shift,
            seeker_pivots: seeker.pivots,
            hider_pivots: hider.pivots,
            seeker_value,
            hider_value: hider.value,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        };

        log::debug!(
            "solved {}x{} game: value {:.6}, gap {:.2e}, pivots {}+{}",
            n_rows,
            n_cols,
            value,
            stats.duality_gap(),
            stats.seeker_pivots,
            stats.hider_pivots
        );

        let result = SolveResult {
            seeker_strategy: seeker.strategy,
            hider_strategy: hider.strategy,
            value,
        };
        Ok((result, stats))
    }

    /// Optimal strategy and value for the minimizing column player of `a`.
    fn solve_column_player(&self, a: &[Vec<f64>]) -> Result<ColumnSolution> {
        let min = a.iter().flatten().copied().fold(f64::INFINITY, f64::min);
        let shift = if min < 1.0 { 1.0 - min } else { 0.0 };

        let shifted: Vec<Vec<f64>> = a
            .iter()
            .map(|row| row.iter().map(|&x| x + shift).collect())
            .collect();

        let solution = solve_positive_game(&shifted, self.config.pivot_tolerance, self.config.max_pivots)?;
        if !(solution.objective.is_finite() && solution.objective > 0.0) {
            return Err(GameError::MalformedGame(format!(
                "LP objective {} is not positive",
                solution.objective
            )));
        }

        log::trace!("column LP: shift {}, objective {}", shift, solution.objective);

        Ok(ColumnSolution {
            strategy: MixedStrategy::from_unnormalized(&solution.primal)?,
            value: 1.0 / solution.objective - shift,
            shift,
            pivots: solution.pivots,
        })
    }
}

/// Dense copy of the game after shape and finiteness checks.
fn checked_rows<G: MatrixGame + ?Sized>(game: &G) -> Result<Vec<Vec<f64>>> {
    if game.num_rows() == 0 || game.num_cols() == 0 {
        return Err(GameError::MalformedGame("empty payoff matrix".to_string()));
    }
    let rows = game.to_rows();
    for (s, row) in rows.iter().enumerate() {
        if let Some(h) = row.iter().position(|x| !x.is_finite()) {
            return Err(GameError::MalformedGame(format!(
                "payoff at ({}, {}) is not finite",
                s, h
            )));
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> EquilibriumSolver {
        EquilibriumSolver::new(SolverConfig::default())
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_rock_paper_scissors() {
        let game = vec![
            vec![0.0, -1.0, 1.0],
            vec![1.0, 0.0, -1.0],
            vec![-1.0, 1.0, 0.0],
        ];
        let (result, stats) = solver().solve_with_stats(&game).unwrap();
        assert_close(result.value, 0.0);
        for &w in result.seeker_strategy.weights().iter().chain(result.hider_strategy.weights()) {
            assert_close(w, 1.0 / 3.0);
        }
        assert!(stats.duality_gap() < 1e-9);
        assert_close(stats.shift, 2.0);
    }

    #[test]
    fn test_diagonal_hand_solved() {
        // Seeker scores d_i only when guessing the hider's spot: both sides
        // play proportional to 1/d_i and V = 1 / Σ(1/d_i).
        let game = vec![
            vec![3.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let result = solver().solve(&game).unwrap();
        let expected = [2.0 / 11.0, 3.0 / 11.0, 6.0 / 11.0];
        assert_close(result.value, 6.0 / 11.0);
        for i in 0..3 {
            assert_close(result.seeker_strategy.weights()[i], expected[i]);
            assert_close(result.hider_strategy.weights()[i], expected[i]);
        }
    }

    #[test]
    fn test_saddle_point() {
        // Row 1 dominates; column 0 is the hider's best reply: value 2.
        let game = vec![vec![1.0, 4.0], vec![2.0, 3.0]];
        let result = solver().solve(&game).unwrap();
        assert_close(result.value, 2.0);
        assert_close(result.seeker_strategy.weights()[1], 1.0);
        assert_close(result.hider_strategy.weights()[0], 1.0);
    }

    #[test]
    fn test_already_positive_matrix_has_no_shift() {
        let game = vec![vec![5.0, 2.0], vec![3.0, 4.0]];
        let (result, stats) = solver().solve_with_stats(&game).unwrap();
        assert_eq!(stats.shift, 0.0);
        // Mixed: p = (1/4, 3/4), V = 3.5
        assert_close(result.value, 3.5);
        assert_close(result.seeker_strategy.weights()[0], 0.25);
        assert_close(result.hider_strategy.weights()[0], 0.5);
    }

    #[test]
    fn test_rectangular_game() {
        // Seeker has two rows, hider three columns; third column dominated.
        let game = vec![vec![2.0, -1.0, 5.0], vec![-1.0, 1.0, 5.0]];
        let result = solver().solve(&game).unwrap();
        assert_close(result.value, 0.2);
        assert_eq!(result.seeker_strategy.len(), 2);
        assert_eq!(result.hider_strategy.len(), 3);
        assert_close(result.hider_strategy.weights()[2], 0.0);
    }

    #[test]
    fn test_constant_game_any_strategy_is_optimal() {
        let game = vec![vec![-2.5; 3]; 3];
        let result = solver().solve(&game).unwrap();
        assert_close(result.value, -2.5);
        let sum: f64 = result.seeker_strategy.weights().iter().sum();
        assert_close(sum, 1.0);
    }

    #[test]
    fn test_malformed_inputs() {
        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(solver().solve(&empty), Err(GameError::MalformedGame(_))));

        let nan = vec![vec![f64::NAN, 1.0], vec![0.0, 1.0]];
        assert!(matches!(solver().solve(&nan), Err(GameError::MalformedGame(_))));

        let inf = vec![vec![f64::INFINITY]];
        assert!(matches!(solver().solve(&inf), Err(GameError::MalformedGame(_))));
    }

    #[test]
    fn test_pivot_cap_surfaces_as_malformed() {
        let game = vec![
            vec![3.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let capped = EquilibriumSolver::new(SolverConfig::default().with_max_pivots(1));
        assert!(matches!(capped.solve(&game), Err(GameError::MalformedGame(_))));
    }
}
