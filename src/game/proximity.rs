//! Proximity adjustment: near misses still threaten the hider.
//!
//! For every off-diagonal cell the hider's payoff is multiplied by
//! `penalty(distance(s, h))` and the seeker's payoff is recomputed from the
//! cell constant, so `M' + H' = C` still holds. Diagonal cells are never
//! touched.
//!
//! Validation happens on every call to [`ProximityAdjuster::apply`]: the
//! penalty is evaluated at each distinct distance occurring in the world,
//! in ascending order, before any cell is written.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::payoff::PayoffMatrix;
use crate::game::world::World;

/// A distance → multiplier rule.
///
/// Multipliers must lie in `(0, 1]` and be non-decreasing in distance.
pub trait ProximityPenalty {
    /// Multiplier applied to the hider's escape payoff at `distance`.
    fn multiplier(&self, distance: f64) -> f64;
}

impl<F> ProximityPenalty for F
where
    F: Fn(f64) -> f64,
{
    fn multiplier(&self, distance: f64) -> f64 {
        self(distance)
    }
}

/// Serializable penalty shapes for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum PenaltyShape {
    /// `d / (d + scale)`: half the escape payoff survives at `d == scale`.
    Saturating {
        /// Distance at which the multiplier reaches one half.
        scale: f64,
    },
    /// `1 − exp(−rate · d)`.
    Exponential {
        /// Recovery rate; larger means the penalty fades faster.
        rate: f64,
    },
    /// No penalty.
    Flat,
}

impl Default for PenaltyShape {
    fn default() -> Self {
        PenaltyShape::Saturating { scale: 1.0 }
    }
}

impl ProximityPenalty for PenaltyShape {
    fn multiplier(&self, distance: f64) -> f64 {
        match *self {
            PenaltyShape::Saturating { scale } => distance / (distance + scale),
            PenaltyShape::Exponential { rate } => 1.0 - (-rate * distance).exp(),
            PenaltyShape::Flat => 1.0,
        }
    }
}

/// Applies a proximity penalty to a payoff matrix.
pub struct ProximityAdjuster;

impl ProximityAdjuster {
    /// Return a new matrix with the hider's off-diagonal payoffs discounted.
    pub fn apply<P>(matrix: &PayoffMatrix, world: &World, penalty: &P) -> Result<PayoffMatrix>
    where
        P: ProximityPenalty + ?Sized,
    {
        let n = matrix.size();
        if n != world.len() {
            return Err(GameError::MalformedGame(format!(
                "matrix has {} locations but world has {}",
                n,
                world.len()
            )));
        }

        Self::validate(world, penalty)?;

        let seeker = matrix.seeker_cells();
        let hider = matrix.hider_cells();
        let mut adjusted = Vec::with_capacity(n * n);
        let mut totals = Vec::with_capacity(n * n);

        for s in 0..n {
            for h in 0..n {
                let i = s * n + h;
                let total = seeker[i] + hider[i];
                totals.push(total);
                if s == h {
                    adjusted.push(seeker[i]);
                } else {
                    let factor = penalty.multiplier(world.index_distance(s, h));
                    adjusted.push(total - hider[i] * factor);
                }
            }
        }

        Ok(PayoffMatrix::from_totals(n, adjusted, &totals))
    }

    /// Check the penalty at every distance that occurs in `world`.
    pub fn validate<P>(world: &World, penalty: &P) -> Result<()>
    where
        P: ProximityPenalty + ?Sized,
    {
        let mut previous: Option<f64> = None;

        for distance in world.distinct_distances() {
            let multiplier = penalty.multiplier(distance);
            if !(multiplier > 0.0 && multiplier <= 1.0) {
                return Err(GameError::InvalidPenaltyFunction {
                    distance,
                    multiplier,
                    reason: "multiplier must lie in (0, 1]",
                });
            }
            if let Some(prev) = previous {
                if multiplier < prev {
                    return Err(GameError::InvalidPenaltyFunction {
                        distance,
                        multiplier,
                        reason: "multiplier must not decrease with distance",
                    });
                }
            }
            previous = Some(multiplier);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::payoff::{BaseScores, PayoffMatrixBuilder};
    use crate::game::world::{Dimensions, PlaceType, TypeDistribution};

    fn two_spot_world() -> World {
        World::line(vec![PlaceType::Hard, PlaceType::Easy]).unwrap()
    }

    #[test]
    fn test_inverse_penalty_lowers_escape() {
        let world = two_spot_world();
        let scores = BaseScores::default().with_miss_escape(0.0, 1.0);
        let base = PayoffMatrixBuilder::build(&world, &scores).unwrap();
        let adjusted = ProximityAdjuster::apply(&base, &world, &|d: f64| 1.0 / (1.0 + d)).unwrap();

        for (s, h) in [(0, 1), (1, 0)] {
            assert!(adjusted.hider(s, h).unwrap() < base.hider(s, h).unwrap());
            assert_eq!(adjusted.hider(s, h).unwrap(), 0.5);
            assert_eq!(adjusted.seeker(s, h).unwrap(), 0.5);
            assert_eq!(adjusted.total(s, h).unwrap(), base.total(s, h).unwrap());
        }
        // Diagonal untouched.
        assert_eq!(adjusted.pair(0, 0).unwrap(), base.pair(0, 0).unwrap());
        assert_eq!(adjusted.pair(1, 1).unwrap(), base.pair(1, 1).unwrap());
    }

    #[test]
    fn test_grid_penalty_grows_with_distance() {
        let world = World::create(Dimensions::Grid { rows: 3, cols: 3 }, &TypeDistribution::uniform(), 11).unwrap();
        let base = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
        let adjusted = ProximityAdjuster::apply(&base, &world, &PenaltyShape::default()).unwrap();

        // Neighbour (distance 1) keeps less of the escape than the far corner (distance 4).
        let near = adjusted.hider(0, 1).unwrap();
        let far = adjusted.hider(0, 8).unwrap();
        assert!(near < far);
        for s in 0..9 {
            for h in 0..9 {
                assert!((adjusted.total(s, h).unwrap() - base.total(s, h).unwrap()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_flat_penalty_is_identity() {
        let world = World::create(Dimensions::Line { len: 5 }, &TypeDistribution::uniform(), 2).unwrap();
        let base = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
        let adjusted = ProximityAdjuster::apply(&base, &world, &PenaltyShape::Flat).unwrap();
        assert_eq!(adjusted, base);
    }

    #[test]
    fn test_rejects_out_of_range_multiplier() {
        let world = World::line(vec![PlaceType::Neutral; 4]).unwrap();
        let base = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();

        let too_big = |_d: f64| 1.5;
        assert!(matches!(
            ProximityAdjuster::apply(&base, &world, &too_big),
            Err(GameError::InvalidPenaltyFunction { .. })
        ));

        let zero = |_d: f64| 0.0;
        assert!(ProximityAdjuster::apply(&base, &world, &zero).is_err());

        let nan = |_d: f64| f64::NAN;
        assert!(ProximityAdjuster::apply(&base, &world, &nan).is_err());
    }

    #[test]
    fn test_rejects_decreasing_multiplier() {
        let world = World::line(vec![PlaceType::Neutral; 4]).unwrap();
        let base = PayoffMatrixBuilder::build(&world, &BaseScores::default()).unwrap();
        // Fine on two locations (one distance), but shrinks from d = 1 to d = 2.
        let shrinking = |d: f64| 1.0 / (1.0 + d);
        match ProximityAdjuster::apply(&base, &world, &shrinking) {
            Err(GameError::InvalidPenaltyFunction { distance, .. }) => assert_eq!(distance, 2.0),
            other => panic!("expected InvalidPenaltyFunction, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_size_mismatch() {
        let world = World::line(vec![PlaceType::Neutral; 3]).unwrap();
        let other = World::line(vec![PlaceType::Neutral; 2]).unwrap();
        let base = PayoffMatrixBuilder::build(&other, &BaseScores::default()).unwrap();
        assert!(matches!(
            ProximityAdjuster::apply(&base, &world, &PenaltyShape::Flat),
            Err(GameError::MalformedGame(_))
        ));
    }

    #[test]
    fn test_configured_shapes_are_valid() {
        let world = World::line(vec![PlaceType::Neutral; 6]).unwrap();
        assert!(ProximityAdjuster::validate(&world, &PenaltyShape::Exponential { rate: 0.7 }).is_ok());
        assert!(ProximityAdjuster::validate(&world, &PenaltyShape::Saturating { scale: 2.5 }).is_ok());

        // A non-positive scale flips the sign of the multiplier.
        assert!(ProximityAdjuster::validate(&world, &PenaltyShape::Saturating { scale: -3.0 }).is_err());
    }
}
