//! Matrix game trait consumed by the equilibrium solver.
//!
//! Any two-player zero-sum game in normal form can be solved by
//! implementing [`MatrixGame`]. This keeps the LP machinery independent of
//! how Hide & Seek builds its payoffs.

/// A finite two-player zero-sum game in normal form.
///
/// Rows are the maximizing player's pure choices (the seeker in Hide &
/// Seek), columns are the minimizing player's (the hider). `payoff(r, c)`
/// is what the row player receives; the column player receives its
/// negation in the zero-sum reduction.
pub trait MatrixGame: Send + Sync {
    /// Number of row (maximizer) choices.
    fn num_rows(&self) -> usize;

    /// Number of column (minimizer) choices.
    fn num_cols(&self) -> usize;

    /// Row player's payoff for the pure profile `(row, col)`.
    fn payoff(&self, row: usize, col: usize) -> f64;

    /// Copy the payoffs into a dense row-major table.
    fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.num_rows())
            .map(|r| (0..self.num_cols()).map(|c| self.payoff(r, c)).collect())
            .collect()
    }

    /// Row player's expected payoff when row plays `p` and column plays `q`.
    fn expected_payoff(&self, p: &[f64], q: &[f64]) -> f64 {
        let mut total = 0.0;
        for (r, &pr) in p.iter().enumerate() {
            if pr == 0.0 {
                continue;
            }
            for (c, &qc) in q.iter().enumerate() {
                total += pr * qc * self.payoff(r, c);
            }
        }
        total
    }

    /// Worst case for a row strategy: the minimum over columns of the
    /// expected payoff.
    fn row_guarantee(&self, p: &[f64]) -> f64 {
        (0..self.num_cols())
            .map(|c| p.iter().enumerate().map(|(r, &pr)| pr * self.payoff(r, c)).sum::<f64>())
            .fold(f64::INFINITY, f64::min)
    }

    /// Worst case for a column strategy: the maximum over rows of the
    /// expected payoff conceded.
    fn col_concession(&self, q: &[f64]) -> f64 {
        (0..self.num_rows())
            .map(|r| q.iter().enumerate().map(|(c, &qc)| qc * self.payoff(r, c)).sum::<f64>())
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl MatrixGame for Vec<Vec<f64>> {
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn num_cols(&self) -> usize {
        self.first().map(|r| r.len()).unwrap_or(0)
    }

    fn payoff(&self, row: usize, col: usize) -> f64 {
        self[row][col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_pennies_guarantees() {
        let game = vec![vec![1.0, -1.0], vec![-1.0, 1.0]];
        let half = [0.5, 0.5];
        assert_eq!(game.expected_payoff(&half, &half), 0.0);
        assert_eq!(game.row_guarantee(&half), 0.0);
        assert_eq!(game.col_concession(&half), 0.0);

        // Pure row strategy is exploitable.
        assert_eq!(game.row_guarantee(&[1.0, 0.0]), -1.0);
        assert_eq!(game.col_concession(&[1.0, 0.0]), 1.0);
    }

    #[test]
    fn test_to_rows_roundtrip_shape() {
        let game = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(game.num_rows(), 2);
        assert_eq!(game.num_cols(), 3);
        assert_eq!(game.to_rows(), game);
    }
}
