//! World model: a line or grid of typed hiding places.
//!
//! Worlds are immutable value objects. Re-randomizing the place types
//! produces a new `World`, so a payoff matrix built from one world can never
//! silently go stale.

use std::fmt;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// How hard a location is for the seeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    /// Hard for the seeker: catching here pays the seeker most.
    Hard,
    /// Neutral: both sides score the same on a catch.
    Neutral,
    /// Easy for the seeker: catching here pays the seeker least.
    Easy,
}

impl PlaceType {
    /// All place types, in sampling order.
    pub const ALL: [PlaceType; 3] = [PlaceType::Hard, PlaceType::Neutral, PlaceType::Easy];

    /// Single-character symbol for compact rendering.
    pub fn symbol(&self) -> char {
        match self {
            PlaceType::Hard => 'H',
            PlaceType::Neutral => 'N',
            PlaceType::Easy => 'E',
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceType::Hard => write!(f, "Hard"),
            PlaceType::Neutral => write!(f, "Neutral"),
            PlaceType::Easy => write!(f, "Easy"),
        }
    }
}

/// Shape of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dimensions {
    /// `len` locations on a line, indexed `0..len`.
    Line {
        /// Number of locations.
        len: usize,
    },
    /// `rows × cols` grid, linearized row-major.
    Grid {
        /// Grid height.
        rows: usize,
        /// Grid width.
        cols: usize,
    },
}

impl Dimensions {
    /// Total number of locations; saturates at `usize::MAX` for grids too
    /// large to index.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Total number of locations, or `None` if `rows × cols` overflows.
    pub fn checked_len(&self) -> Option<usize> {
        match *self {
            Dimensions::Line { len } => Some(len),
            Dimensions::Grid { rows, cols } => rows.checked_mul(cols),
        }
    }

    /// True when the world would have no locations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimensions::Line { len } => write!(f, "1D line of {}", len),
            Dimensions::Grid { rows, cols } => write!(f, "2D grid {}x{}", rows, cols),
        }
    }
}

/// A location, either as a linear index or a grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Linear index (row-major for grids).
    Index(usize),
    /// Grid coordinate.
    Cell {
        /// Row.
        row: usize,
        /// Column.
        col: usize,
    },
}

impl From<usize> for Location {
    fn from(index: usize) -> Self {
        Location::Index(index)
    }
}

impl From<(usize, usize)> for Location {
    fn from((row, col): (usize, usize)) -> Self {
        Location::Cell { row, col }
    }
}

/// Relative weights used when assigning random place types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDistribution {
    /// Weight of HARD places.
    pub hard: f64,
    /// Weight of NEUTRAL places.
    pub neutral: f64,
    /// Weight of EASY places.
    pub easy: f64,
}

impl Default for TypeDistribution {
    fn default() -> Self {
        Self::uniform()
    }
}

impl TypeDistribution {
    /// Equal odds for every place type.
    pub fn uniform() -> Self {
        Self {
            hard: 1.0,
            neutral: 1.0,
            easy: 1.0,
        }
    }

    /// Every place gets the same type.
    pub fn only(place: PlaceType) -> Self {
        let mut dist = Self {
            hard: 0.0,
            neutral: 0.0,
            easy: 0.0,
        };
        match place {
            PlaceType::Hard => dist.hard = 1.0,
            PlaceType::Neutral => dist.neutral = 1.0,
            PlaceType::Easy => dist.easy = 1.0,
        }
        dist
    }

    fn sampler(&self) -> Result<WeightedIndex<f64>> {
        let weights = [self.hard, self.neutral, self.easy];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(GameError::InvalidTypeDistribution(format!(
                "weights {:?} must be finite",
                weights
            )));
        }
        WeightedIndex::new(weights).map_err(|e| GameError::InvalidTypeDistribution(e.to_string()))
    }

    /// Check that the weights can be sampled from.
    pub fn validate(&self) -> Result<()> {
        self.sampler().map(|_| ())
    }
}

/// An immutable line or grid of typed locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorldData")]
pub struct World {
    dimensions: Dimensions,
    places: Vec<PlaceType>,
}

/// Unchecked serialized form of a [`World`].
#[derive(Deserialize)]
struct WorldData {
    dimensions: Dimensions,
    places: Vec<PlaceType>,
}

impl TryFrom<WorldData> for World {
    type Error = GameError;

    fn try_from(data: WorldData) -> Result<Self> {
        World::from_types(data.dimensions, data.places)
    }
}

impl World {
    /// Create a world with place types drawn from `distribution`.
    ///
    /// The same `(dimensions, distribution, seed)` always produces the same
    /// world.
    pub fn create(dimensions: Dimensions, distribution: &TypeDistribution, seed: u64) -> Result<Self> {
        let len = checked_size(dimensions)?;
        let sampler = distribution.sampler()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let places = (0..len)
            .map(|_| PlaceType::ALL[sampler.sample(&mut rng)])
            .collect();

        log::debug!("created {} world with seed {}", dimensions, seed);

        Ok(Self { dimensions, places })
    }

    /// Build a world from an explicit type assignment.
    pub fn from_types(dimensions: Dimensions, places: Vec<PlaceType>) -> Result<Self> {
        let len = checked_size(dimensions)?;
        if places.len() != len {
            return Err(GameError::OutOfBounds {
                index: places.len(),
                len,
            });
        }
        Ok(Self { dimensions, places })
    }

    /// A 1D world with the given types.
    pub fn line(places: Vec<PlaceType>) -> Result<Self> {
        Self::from_types(Dimensions::Line { len: places.len() }, places)
    }

    /// A new world of the same shape with freshly drawn types.
    pub fn reshuffled(&self, distribution: &TypeDistribution, seed: u64) -> Result<Self> {
        Self::create(self.dimensions, distribution, seed)
    }

    /// Shape of the world.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Always false: empty worlds cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Place types in linear-index order.
    pub fn places(&self) -> &[PlaceType] {
        &self.places
    }

    /// How many locations have the given type.
    pub fn count(&self, place: PlaceType) -> usize {
        self.places.iter().filter(|&&p| p == place).count()
    }

    /// Resolve a location to its linear index.
    pub fn index_of(&self, location: impl Into<Location>) -> Result<usize> {
        match location.into() {
            Location::Index(index) => {
                if index < self.len() {
                    Ok(index)
                } else {
                    Err(GameError::OutOfBounds { index, len: self.len() })
                }
            }
            Location::Cell { row, col } => {
                let (rows, cols) = self.grid_shape();
                if row < rows && col < cols {
                    Ok(row * cols + col)
                } else {
                    Err(GameError::OutOfBoundsCoord { row, col, rows, cols })
                }
            }
        }
    }

    /// Native location for a linear index: an index on a line, a cell on a
    /// grid.
    pub fn location(&self, index: usize) -> Result<Location> {
        let index = self.index_of(index)?;
        Ok(match self.dimensions {
            Dimensions::Line { .. } => Location::Index(index),
            Dimensions::Grid { cols, .. } => Location::Cell {
                row: index / cols,
                col: index % cols,
            },
        })
    }

    /// Place type at a location.
    pub fn place_type_at(&self, location: impl Into<Location>) -> Result<PlaceType> {
        let index = self.index_of(location)?;
        Ok(self.places[index])
    }

    /// Distance between two locations.
    ///
    /// Absolute index difference on a line; Manhattan distance on a grid.
    pub fn distance(&self, a: impl Into<Location>, b: impl Into<Location>) -> Result<f64> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        Ok(self.index_distance(a, b))
    }

    /// Distance between two already-validated linear indices.
    pub(crate) fn index_distance(&self, a: usize, b: usize) -> f64 {
        match self.dimensions {
            Dimensions::Line { .. } => a.abs_diff(b) as f64,
            Dimensions::Grid { cols, .. } => {
                let (ra, ca) = (a / cols, a % cols);
                let (rb, cb) = (b / cols, b % cols);
                (ra.abs_diff(rb) + ca.abs_diff(cb)) as f64
            }
        }
    }

    /// Every distinct positive distance between two locations, ascending.
    pub fn distinct_distances(&self) -> Vec<f64> {
        // Distances are integers bounded by the world's diameter.
        let diameter = match self.dimensions {
            Dimensions::Line { len } => len.saturating_sub(1),
            Dimensions::Grid { rows, cols } => rows.saturating_sub(1) + cols.saturating_sub(1),
        };
        (1..=diameter).map(|d| d as f64).collect()
    }

    fn grid_shape(&self) -> (usize, usize) {
        match self.dimensions {
            Dimensions::Line { len } => (1, len),
            Dimensions::Grid { rows, cols } => (rows, cols),
        }
    }
}

/// Location count for `dimensions`, rejecting empty and overflowing shapes.
fn checked_size(dimensions: Dimensions) -> Result<usize> {
    match dimensions.checked_len() {
        None => Err(GameError::MalformedGame(format!(
            "{} has more locations than can be indexed",
            dimensions
        ))),
        Some(0) => Err(GameError::OutOfBounds { index: 0, len: 0 }),
        Some(len) => Ok(len),
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.grid_shape();
        for r in 0..rows {
            let line: String = self.places[r * cols..(r + 1) * cols]
                .iter()
                .map(|p| p.symbol())
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
