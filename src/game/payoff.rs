//! Payoff matrix construction.
//!
//! ## Convention
//!
//! For a seeker choice `s` and a hider choice `h`:
//!
//! | case     | seeker payoff            | hider payoff            |
//! |----------|--------------------------|-------------------------|
//! | `s == h` | `base[type(h)].seeker`   | `base[type(h)].hider`   |
//! | `s != h` | `miss`                   | `escape`                |
//!
//! Every cell therefore has a fixed total `C(s, h)`: the catch total of the
//! hider's place type on the diagonal, `miss + escape` elsewhere. The hider
//! table is always derived as `C − M`, never stored independently of it.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::world::{PlaceType, World};
use crate::lp::MatrixGame;

/// Seeker and hider payoff for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPair {
    /// Seeker's payoff.
    pub seeker: f64,
    /// Hider's payoff.
    pub hider: f64,
}

impl PayoffPair {
    /// Create a new pair.
    pub const fn new(seeker: f64, hider: f64) -> Self {
        Self { seeker, hider }
    }

    /// Combined payoff of both sides.
    pub fn total(&self) -> f64 {
        self.seeker + self.hider
    }
}

/// Per-place-type catch payoffs plus the off-diagonal miss/escape values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseScores {
    /// Catch payoffs at a HARD place.
    pub hard: PayoffPair,
    /// Catch payoffs at a NEUTRAL place.
    pub neutral: PayoffPair,
    /// Catch payoffs at an EASY place.
    pub easy: PayoffPair,
    /// Seeker's payoff when it guesses the wrong location.
    #[serde(default)]
    pub miss: f64,
    /// Hider's payoff when it is not found.
    #[serde(default = "default_escape")]
    pub escape: f64,
}

fn default_escape() -> f64 {
    1.0
}

impl Default for BaseScores {
    fn default() -> Self {
        Self {
            hard: PayoffPair::new(3.0, 1.0),
            neutral: PayoffPair::new(2.0, 2.0),
            easy: PayoffPair::new(1.0, 3.0),
            miss: 0.0,
            escape: default_escape(),
        }
    }
}

impl BaseScores {
    /// Builder method: set the off-diagonal miss/escape payoffs.
    pub fn with_miss_escape(mut self, miss: f64, escape: f64) -> Self {
        self.miss = miss;
        self.escape = escape;
        self
    }

    /// Catch payoffs for a place type.
    pub fn for_type(&self, place: PlaceType) -> PayoffPair {
        match place {
            PlaceType::Hard => self.hard,
            PlaceType::Neutral => self.neutral,
            PlaceType::Easy => self.easy,
        }
    }

    /// Payoffs when the seeker misses.
    pub fn off_diagonal(&self) -> PayoffPair {
        PayoffPair::new(self.miss, self.escape)
    }

    /// Check finiteness and the HARD/NEUTRAL/EASY ordering.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.hard.seeker,
            self.hard.hider,
            self.neutral.seeker,
            self.neutral.hider,
            self.easy.seeker,
            self.easy.hider,
            self.miss,
            self.escape,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GameError::InvalidBaseScores("all payoffs must be finite".to_string()));
        }
        if self.neutral.seeker != self.neutral.hider {
            return Err(GameError::InvalidBaseScores(format!(
                "neutral places must pay both sides equally, got {:?}",
                self.neutral
            )));
        }
        if !(self.hard.seeker > self.neutral.seeker && self.neutral.seeker > self.easy.seeker) {
            return Err(GameError::InvalidBaseScores(format!(
                "seeker payoffs must rank hard > neutral > easy, got {} / {} / {}",
                self.hard.seeker, self.neutral.seeker, self.easy.seeker
            )));
        }
        if !(self.hard.hider < self.neutral.hider && self.neutral.hider < self.easy.hider) {
            return Err(GameError::InvalidBaseScores(format!(
                "hider payoffs must rank easy > neutral > hard, got {} / {} / {}",
                self.hard.hider, self.neutral.hider, self.easy.hider
            )));
        }
        Ok(())
    }
}

/// Square payoff table indexed `[seeker][hider]`.
///
/// Holds the seeker table `M` and the hider table `H` with the invariant
/// `M[s][h] + H[s][h] = C(s, h)` for the cell's fixed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PayoffMatrixData")]
pub struct PayoffMatrix {
    size: usize,
    seeker: Vec<f64>,
    hider: Vec<f64>,
}

/// Unchecked serialized form of a [`PayoffMatrix`].
#[derive(Deserialize)]
struct PayoffMatrixData {
    size: usize,
    seeker: Vec<f64>,
    hider: Vec<f64>,
}

impl TryFrom<PayoffMatrixData> for PayoffMatrix {
    type Error = GameError;

    fn try_from(data: PayoffMatrixData) -> Result<Self> {
        let cells = match data.size.checked_mul(data.size) {
            Some(cells) if cells > 0 => cells,
            _ => {
                return Err(GameError::MalformedGame(format!(
                    "invalid payoff matrix size {}",
                    data.size
                )))
            }
        };
        if data.seeker.len() != cells || data.hider.len() != cells {
            return Err(GameError::MalformedGame(format!(
                "{}x{} payoff matrix needs {} cells per table, got {} seeker and {} hider",
                data.size,
                data.size,
                cells,
                data.seeker.len(),
                data.hider.len()
            )));
        }
        if data.seeker.iter().chain(&data.hider).any(|x| !x.is_finite()) {
            return Err(GameError::MalformedGame("payoffs must be finite".to_string()));
        }
        Ok(Self {
            size: data.size,
            seeker: data.seeker,
            hider: data.hider,
        })
    }
}

impl PayoffMatrix {
    /// Unscaled zero-sum matrix from seeker rows: `H = −M`, `C = 0`.
    pub fn zero_sum(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(GameError::MalformedGame("empty payoff matrix".to_string()));
        }
        if rows.iter().any(|r| r.len() != size) {
            return Err(GameError::MalformedGame(format!(
                "payoff matrix must be square ({} rows)",
                size
            )));
        }
        let seeker: Vec<f64> = rows.into_iter().flatten().collect();
        if seeker.iter().any(|x| !x.is_finite()) {
            return Err(GameError::MalformedGame("payoffs must be finite".to_string()));
        }
        let hider = seeker.iter().map(|&x| -x).collect();
        Ok(Self { size, seeker, hider })
    }

    /// Assemble from per-cell seeker payoffs and cell totals.
    pub(crate) fn from_totals(size: usize, seeker: Vec<f64>, totals: &[f64]) -> Self {
        debug_assert_eq!(seeker.len(), size * size);
        debug_assert_eq!(totals.len(), size * size);
        let hider = seeker.iter().zip(totals).map(|(&m, &c)| c - m).collect();
        Self { size, seeker, hider }
    }

    /// Number of locations on each side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Seeker's payoff for `(s, h)`.
    pub fn seeker(&self, s: usize, h: usize) -> Result<f64> {
        self.offset(s, h).map(|i| self.seeker[i])
    }

    /// Hider's payoff for `(s, h)`.
    pub fn hider(&self, s: usize, h: usize) -> Result<f64> {
        self.offset(s, h).map(|i| self.hider[i])
    }

    /// Both payoffs for `(s, h)`.
    pub fn pair(&self, s: usize, h: usize) -> Result<PayoffPair> {
        self.offset(s, h)
            .map(|i| PayoffPair::new(self.seeker[i], self.hider[i]))
    }

    /// Cell constant `C(s, h) = M[s][h] + H[s][h]`.
    pub fn total(&self, s: usize, h: usize) -> Result<f64> {
        self.pair(s, h).map(|p| p.total())
    }

    /// Seeker table as rows.
    pub fn seeker_rows(&self) -> Vec<Vec<f64>> {
        self.seeker.chunks(self.size).map(|c| c.to_vec()).collect()
    }

    /// Hider table as rows.
    pub fn hider_rows(&self) -> Vec<Vec<f64>> {
        self.hider.chunks(self.size).map(|c| c.to_vec()).collect()
    }

    pub(crate) fn seeker_cells(&self) -> &[f64] {
        &self.seeker
    }

    pub(crate) fn hider_cells(&self) -> &[f64] {
        &self.hider
    }

    fn offset(&self, s: usize, h: usize) -> Result<usize> {
        if s >= self.size {
            return Err(GameError::OutOfBounds { index: s, len: self.size });
        }
        if h >= self.size {
            return Err(GameError::OutOfBounds { index: h, len: self.size });
        }
        Ok(s * self.size + h)
    }
}

impl MatrixGame for PayoffMatrix {
    fn num_rows(&self) -> usize {
        self.size
    }

    fn num_cols(&self) -> usize {
        self.size
    }

    fn payoff(&self, row: usize, col: usize) -> f64 {
        self.seeker[row * self.size + col]
    }
}

/// Builds a [`PayoffMatrix`] from a world and base scores.
pub struct PayoffMatrixBuilder;

impl PayoffMatrixBuilder {
    /// Build the payoff matrix for `world` under `scores`.
    ///
    /// Pure: identical inputs give bit-identical matrices.
    pub fn build(world: &World, scores: &BaseScores) -> Result<PayoffMatrix> {
        scores.validate()?;

        let n = world.len();
        let miss = scores.off_diagonal();
        let mut seeker = Vec::with_capacity(n * n);
        let mut totals = Vec::with_capacity(n * n);

        for s in 0..n {
            for (h, &place) in world.places().iter().enumerate() {
                let cell = if s == h { scores.for_type(place) } else { miss };
                seeker.push(cell.seeker);
                totals.push(cell.total());
            }
        }

        log::debug!("built {}x{} payoff matrix", n, n);

        Ok(PayoffMatrix::from_totals(n, seeker, &totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::world::{Dimensions, TypeDistribution};

    fn hne() -> World {
        World::line(vec![PlaceType::Hard, PlaceType::Neutral, PlaceType::Easy]).unwrap()
    }

    #[test]
    fn test_diagonal_and_off_diagonal_cells() {
        let scores = BaseScores::default().with_miss_escape(0.5, 1.5);
        let matrix = PayoffMatrixBuilder::build(&hne(), &scores).unwrap();

        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.pair(0, 0).unwrap(), PayoffPair::new(3.0, 1.0));
        assert_eq!(matrix.pair(1, 1).unwrap(), PayoffPair::new(2.0, 2.0));
        assert_eq!(matrix.pair(2, 2).unwrap(), PayoffPair::new(1.0, 3.0));
        assert_eq!(matrix.pair(0, 2).unwrap(), PayoffPair::new(0.5, 1.5));
        assert_eq!(matrix.pair(2, 1).unwrap(), PayoffPair::new(0.5, 1.5));
    }

    #[test]
    fn test_cell_totals() {
        let world = World::create(Dimensions::Grid { rows: 3, cols: 3 }, &TypeDistribution::uniform(), 5).unwrap();
        let scores = BaseScores::default();
        let matrix = PayoffMatrixBuilder::build(&world, &scores).unwrap();

        for s in 0..world.len() {
            for h in 0..world.len() {
                let expected = if s == h {
                    scores.for_type(world.places()[h]).total()
                } else {
                    scores.miss + scores.escape
                };
                assert_eq!(matrix.total(s, h).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let world = World::create(Dimensions::Line { len: 8 }, &TypeDistribution::uniform(), 3).unwrap();
        let a = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
        let b = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_sum_matrix() {
        let matrix = PayoffMatrix::zero_sum(vec![vec![1.0, -2.0], vec![0.0, 4.0]]).unwrap();
        assert_eq!(matrix.hider(0, 1).unwrap(), 2.0);
        assert_eq!(matrix.total(1, 1).unwrap(), 0.0);
        assert_eq!(matrix.hider_rows(), vec![vec![-1.0, 2.0], vec![-0.0, -4.0]]);

        assert!(PayoffMatrix::zero_sum(vec![]).is_err());
        assert!(PayoffMatrix::zero_sum(vec![vec![1.0, 2.0]]).is_err());
        assert!(PayoffMatrix::zero_sum(vec![vec![f64::NAN]]).is_err());
    }

    #[test]
    fn test_out_of_bounds_cells() {
        let matrix = PayoffMatrixBuilder::build(&hne(), &BaseScores::default()).unwrap();
        assert_eq!(matrix.seeker(3, 0), Err(GameError::OutOfBounds { index: 3, len: 3 }));
        assert!(matrix.hider(0, 9).is_err());
    }

    #[test]
    fn test_rejects_misordered_scores() {
        let mut scores = BaseScores::default();
        scores.neutral = PayoffPair::new(2.0, 2.5);
        assert!(matches!(
            PayoffMatrixBuilder::build(&hne(), &scores),
            Err(GameError::InvalidBaseScores(_))
        ));

        let mut scores = BaseScores::default();
        std::mem::swap(&mut scores.hard, &mut scores.easy);
        assert!(scores.validate().is_err());

        let mut scores = BaseScores::default();
        scores.miss = f64::INFINITY;
        assert!(scores.validate().is_err());
    }

    #[test]
    fn test_rejects_tied_type_payoffs() {
        let mut scores = BaseScores::default();
        scores.hard = PayoffPair::new(2.0, 2.0);
        assert!(matches!(scores.validate(), Err(GameError::InvalidBaseScores(_))));

        let mut scores = BaseScores::default();
        scores.easy = PayoffPair::new(2.0, 2.0);
        assert!(matches!(scores.validate(), Err(GameError::InvalidBaseScores(_))));

        let mut scores = BaseScores::default();
        scores.hard.hider = 2.0;
        assert!(scores.validate().is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let bad = r#"{"size":2,"seeker":[1.0],"hider":[]}"#;
        assert!(serde_json::from_str::<PayoffMatrix>(bad).is_err());

        let empty = r#"{"size":0,"seeker":[],"hider":[]}"#;
        assert!(serde_json::from_str::<PayoffMatrix>(empty).is_err());

        let matrix = PayoffMatrixBuilder::build(&hne(), &BaseScores::default()).unwrap();
        let parsed: PayoffMatrix = serde_json::from_str(&serde_json::to_string(&matrix).unwrap()).unwrap();
        assert_eq!(parsed, matrix);
    }
}
