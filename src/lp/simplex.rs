//! Dense-tableau primal simplex for positive matrix games.
//!
//! Solves the program
//!
//! ```text
//! maximize    Σ_j y[j]
//! subject to  Σ_j A[i][j]·y[j] ≤ 1   for every row i
//!             y ≥ 0
//! ```
//!
//! for a matrix `A` whose entries are all strictly positive. The slack basis
//! is feasible because the right-hand side is positive, and the optimum is
//! bounded because every column has a positive coefficient, so a single
//! phase suffices. Bland's rule picks both the entering and the leaving
//! variable, so the highly degenerate diagonal games produced by Hide &
//! Seek cannot cycle.

use crate::error::{GameError, Result};

/// Optimal primal point of the positive-game LP.
#[derive(Debug, Clone)]
pub struct SimplexSolution {
    /// Optimal `y`, one entry per column of `A`.
    pub primal: Vec<f64>,
    /// Optimal objective `Σ y`.
    pub objective: f64,
    /// Pivots performed.
    pub pivots: usize,
}

/// Tableau layout: `rows` constraint rows followed by the objective row.
/// Columns are the `cols` structural variables, then `rows` slacks, then
/// the right-hand side.
struct Tableau {
    rows: usize,
    cols: usize,
    width: usize,
    cells: Vec<f64>,
    basis: Vec<usize>,
}

impl Tableau {
    fn new(a: &[Vec<f64>]) -> Self {
        let rows = a.len();
        let cols = a[0].len();
        let width = cols + rows + 1;
        let mut cells = vec![0.0; (rows + 1) * width];

        for (i, row) in a.iter().enumerate() {
            let line = &mut cells[i * width..(i + 1) * width];
            line[..cols].copy_from_slice(row);
            line[cols + i] = 1.0;
            line[width - 1] = 1.0;
        }

        // Objective row holds -c for a maximization.
        let obj = &mut cells[rows * width..];
        for cell in obj.iter_mut().take(cols) {
            *cell = -1.0;
        }

        let basis = (cols..cols + rows).collect();

        Self {
            rows,
            cols,
            width,
            cells,
            basis,
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.width + col]
    }

    #[inline]
    fn rhs(&self, row: usize) -> f64 {
        self.at(row, self.width - 1)
    }

    /// Lowest-index column with a negative reduced cost.
    fn entering(&self, eps: f64) -> Option<usize> {
        (0..self.width - 1).find(|&j| self.at(self.rows, j) < -eps)
    }

    /// Minimum-ratio row; ties go to the row whose basic variable has the
    /// lowest index.
    fn leaving(&self, col: usize, eps: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for i in 0..self.rows {
            let coef = self.at(i, col);
            if coef <= eps {
                continue;
            }
            let ratio = self.rhs(i) / coef;
            best = match best {
                None => Some((i, ratio)),
                Some((b, r)) => {
                    if ratio < r - eps || ((ratio - r).abs() <= eps && self.basis[i] < self.basis[b]) {
                        Some((i, ratio))
                    } else {
                        Some((b, r))
                    }
                }
            };
        }

        best.map(|(i, _)| i)
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let w = self.width;
        let p = self.at(row, col);

        for k in 0..w {
            self.cells[row * w + k] /= p;
        }
        self.cells[row * w + col] = 1.0;

        for i in 0..=self.rows {
            if i == row {
                continue;
            }
            let factor = self.at(i, col);
            if factor == 0.0 {
                continue;
            }
            for k in 0..w {
                let delta = factor * self.cells[row * w + k];
                self.cells[i * w + k] -= delta;
            }
            self.cells[i * w + col] = 0.0;
        }

        self.basis[row] = col;
    }
}

/// Solve the positive-game LP for `a` (every entry must be `> 0`).
///
/// Fails with [`GameError::MalformedGame`] when the matrix is empty, ragged
/// or not strictly positive, when the ratio test finds no leaving row, or
/// when `max_pivots` is exceeded.
pub fn solve_positive_game(a: &[Vec<f64>], pivot_eps: f64, max_pivots: usize) -> Result<SimplexSolution> {
    let rows = a.len();
    let cols = a.first().map(|r| r.len()).unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(GameError::MalformedGame("empty payoff matrix".to_string()));
    }
    if a.iter().any(|r| r.len() != cols) {
        return Err(GameError::MalformedGame("ragged payoff matrix".to_string()));
    }
    if a.iter().flatten().any(|&x| !(x.is_finite() && x > 0.0)) {
        return Err(GameError::MalformedGame(
            "shifted matrix must be finite and strictly positive".to_string(),
        ));
    }

    let mut tableau = Tableau::new(a);
    let mut pivots = 0usize;

    while let Some(col) = tableau.entering(pivot_eps) {
        if pivots >= max_pivots {
            return Err(GameError::MalformedGame(format!(
                "simplex did not converge within {} pivots",
                max_pivots
            )));
        }
        let row = tableau
            .leaving(col, pivot_eps)
            .ok_or_else(|| GameError::MalformedGame(format!("LP unbounded in column {}", col)))?;
        tableau.pivot(row, col);
        pivots += 1;
    }

    let mut primal = vec![0.0; tableau.cols];
    for (i, &var) in tableau.basis.iter().enumerate() {
        if var < tableau.cols {
            primal[var] = tableau.rhs(i).max(0.0);
        }
    }
    let objective: f64 = primal.iter().sum();

    log::trace!("simplex {}x{} finished after {} pivots, objective {}", rows, cols, pivots, objective);

    Ok(SimplexSolution {
        primal,
        objective,
        pivots,
    })
}
