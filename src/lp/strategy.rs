//! Mixed strategies, solve results and strategy sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Default tolerance for "sums to one" checks.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// A probability distribution over locations.
///
/// Weights are non-negative and sum to 1 within [`DISTRIBUTION_TOLERANCE`].
/// The only way to obtain one is through a validating constructor, so a
/// `MixedStrategy` in hand is always a valid distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct MixedStrategy {
    weights: Vec<f64>,
}

impl MixedStrategy {
    /// Validate and wrap a weight vector.
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        validate_weights(&weights, DISTRIBUTION_TOLERANCE)?;
        Ok(Self { weights })
    }

    /// Uniform strategy over `n` locations.
    pub fn uniform(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(GameError::InvalidDistribution("empty weight vector".to_string()));
        }
        Ok(Self {
            weights: vec![1.0 / n as f64; n],
        })
    }

    /// Normalize raw non-negative values (e.g. an LP primal point) into a
    /// strategy. Tiny negative round-off is clamped to zero.
    pub(crate) fn from_unnormalized(raw: &[f64]) -> Result<Self> {
        let clamped: Vec<f64> = raw.iter().map(|&x| if x < 0.0 { 0.0 } else { x }).collect();
        let total: f64 = clamped.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(GameError::MalformedGame(format!(
                "cannot normalize strategy with total weight {}",
                total
            )));
        }
        Self::new(clamped.iter().map(|&x| x / total).collect())
    }

    /// Probability weights, one per location.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of a single location.
    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Number of locations covered.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a validated strategy.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Locations played with positive probability.
    pub fn support(&self, eps: f64) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > eps)
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the heaviest location (lowest index on ties).
    pub fn most_likely(&self) -> usize {
        let mut best = 0;
        for (i, &w) in self.weights.iter().enumerate() {
            if w > self.weights[best] {
                best = i;
            }
        }
        best
    }

    /// Draw a location with a single uniform `draw` in `[0, 1)`.
    pub fn sample(&self, draw: f64) -> Result<usize> {
        StrategySampler::sample(self, draw)
    }
}

impl TryFrom<Vec<f64>> for MixedStrategy {
    type Error = GameError;

    fn try_from(weights: Vec<f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<MixedStrategy> for Vec<f64> {
    fn from(strategy: MixedStrategy) -> Self {
        strategy.weights
    }
}

/// Check that `weights` lie on the probability simplex.
pub fn validate_weights(weights: &[f64], tolerance: f64) -> Result<()> {
    if weights.is_empty() {
        return Err(GameError::InvalidDistribution("empty weight vector".to_string()));
    }
    if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
        return Err(GameError::InvalidDistribution(format!(
            "weight {} at index {} is not finite",
            w, i
        )));
    }
    if let Some((i, w)) = weights.iter().enumerate().find(|&(_, &w)| w < 0.0) {
        return Err(GameError::InvalidDistribution(format!(
            "weight {} at index {} is negative",
            w, i
        )));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > tolerance {
        return Err(GameError::InvalidDistribution(format!(
            "weights sum to {} instead of 1",
            total
        )));
    }
    Ok(())
}

/// Outcome of solving a Hide & Seek payoff matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    /// Optimal seeker strategy (maximizes the seeker's guaranteed score).
    pub seeker_strategy: MixedStrategy,
    /// Optimal hider strategy (minimizes the seeker's achievable score).
    pub hider_strategy: MixedStrategy,
    /// Game value: the seeker's expected score per round under optimal play.
    pub value: f64,
}

/// Cumulative-distribution inversion over a mixed strategy.
pub struct StrategySampler;

impl StrategySampler {
    /// Draw an index with probability equal to its weight.
    ///
    /// Returns the first index whose cumulative weight exceeds `draw`. If
    /// rounding leaves `draw` past the final cumulative sum, the last index
    /// with positive weight is returned.
    pub fn sample(strategy: &MixedStrategy, draw: f64) -> Result<usize> {
        invert(strategy.weights(), draw)
    }

    /// Validate a raw weight vector, then sample it.
    pub fn sample_weights(weights: &[f64], draw: f64) -> Result<usize> {
        validate_weights(weights, DISTRIBUTION_TOLERANCE)?;
        invert(weights, draw)
    }

    /// Sample with a single uniform draw taken from `rng`.
    pub fn sample_rng<R: Rng + ?Sized>(strategy: &MixedStrategy, rng: &mut R) -> usize {
        let draw: f64 = rng.gen();
        // A draw from gen::<f64>() is always in [0, 1).
        invert(strategy.weights(), draw).unwrap_or_else(|_| strategy.most_likely())
    }
}

fn invert(weights: &[f64], draw: f64) -> Result<usize> {
    if !(0.0..1.0).contains(&draw) {
        return Err(GameError::InvalidDistribution(format!(
            "draw {} is outside [0, 1)",
            draw
        )));
    }

    let mut cumsum = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if draw < cumsum {
            return Ok(i);
        }
    }

    // Fallback for floating point shortfall in the cumulative sum.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .ok_or_else(|| GameError::InvalidDistribution("no location has positive weight".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sampler_inverts_cumulative_distribution() {
        let strategy = MixedStrategy::new(vec![0.2, 0.3, 0.5]).unwrap();
        let picks: Vec<usize> = [0.1, 0.25, 0.75]
            .iter()
            .map(|&u| StrategySampler::sample(&strategy, u).unwrap())
            .collect();
        assert_eq!(picks, vec![0, 1, 2]);
    }

    #[test]
    fn test_sampler_boundaries() {
        let strategy = MixedStrategy::new(vec![0.2, 0.3, 0.5]).unwrap();
        assert_eq!(strategy.sample(0.0).unwrap(), 0);
        // Exactly on a boundary belongs to the next bucket.
        assert_eq!(strategy.sample(0.2).unwrap(), 1);
        assert_eq!(strategy.sample(0.999_999_999).unwrap(), 2);
    }

    #[test]
    fn test_sampler_skips_zero_weights() {
        let strategy = MixedStrategy::new(vec![0.0, 1.0, 0.0]).unwrap();
        for u in [0.0, 0.3, 0.9999] {
            assert_eq!(strategy.sample(u).unwrap(), 1);
        }
    }

    #[test]
    fn test_sampler_rejects_bad_draws() {
        let strategy = MixedStrategy::uniform(2).unwrap();
        assert!(matches!(strategy.sample(1.0), Err(GameError::InvalidDistribution(_))));
        assert!(matches!(strategy.sample(-0.1), Err(GameError::InvalidDistribution(_))));
        assert!(matches!(strategy.sample(f64::NAN), Err(GameError::InvalidDistribution(_))));
    }

    #[test]
    fn test_invalid_distributions() {
        assert!(matches!(
            StrategySampler::sample_weights(&[0.5, 0.6], 0.1),
            Err(GameError::InvalidDistribution(_))
        ));
        assert!(matches!(
            StrategySampler::sample_weights(&[1.2, -0.2], 0.1),
            Err(GameError::InvalidDistribution(_))
        ));
        assert!(MixedStrategy::new(vec![]).is_err());
        assert!(MixedStrategy::uniform(0).is_err());
        assert!(MixedStrategy::new(vec![f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_rng_sampling_is_reproducible() {
        let strategy = MixedStrategy::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let xs: Vec<usize> = (0..50).map(|_| StrategySampler::sample_rng(&strategy, &mut a)).collect();
        let ys: Vec<usize> = (0..50).map(|_| StrategySampler::sample_rng(&strategy, &mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_rng_sampling_frequencies() {
        let strategy = MixedStrategy::new(vec![0.2, 0.3, 0.5]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 3];
        let n = 20_000;
        for _ in 0..n {
            counts[StrategySampler::sample_rng(&strategy, &mut rng)] += 1;
        }
        for (i, &c) in counts.iter().enumerate() {
            let freq = c as f64 / n as f64;
            assert!(
                (freq - strategy.weights()[i]).abs() < 0.02,
                "location {} sampled with frequency {}",
                i,
                freq
            );
        }
    }

    #[test]
    fn test_normalization_and_helpers() {
        let strategy = MixedStrategy::from_unnormalized(&[2.0, 0.0, 6.0, -1e-15]).unwrap();
        assert_eq!(strategy.weights(), &[0.25, 0.0, 0.75, 0.0]);
        assert_eq!(strategy.support(1e-12), vec![0, 2]);
        assert_eq!(strategy.most_likely(), 2);
        assert!(MixedStrategy::from_unnormalized(&[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_serde_rejects_invalid_weights() {
        let ok: MixedStrategy = serde_json::from_str("[0.5, 0.5]").unwrap();
        assert_eq!(ok.len(), 2);
        assert!(serde_json::from_str::<MixedStrategy>("[0.5, 0.7]").is_err());
    }
}
