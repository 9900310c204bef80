//! Game configuration for hosts (binary, simulations).
//!
//! Configurations can be loaded from JSON files. The core pipeline never
//! reads files itself; only hosts go through this module.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::game::payoff::BaseScores;
use crate::game::proximity::PenaltyShape;
use crate::game::round::Role;
use crate::game::world::{Dimensions, TypeDistribution, World};
use crate::lp::SolverConfig;

/// Complete configuration for one Hide & Seek game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Configuration name
    #[serde(default = "default_name")]
    pub name: String,
    /// World shape
    pub dimensions: Dimensions,
    /// Place type weights used when randomizing the world
    #[serde(default)]
    pub type_distribution: TypeDistribution,
    /// Catch and miss payoffs
    #[serde(default)]
    pub scores: BaseScores,
    /// Optional proximity penalty
    #[serde(default)]
    pub proximity: Option<PenaltyShape>,
    /// Side played by the computer
    #[serde(default = "default_role")]
    pub computer_role: Role,
    /// Rounds to simulate
    #[serde(default = "default_rounds")]
    pub rounds: u64,
    /// World and player seed
    #[serde(default)]
    pub seed: u64,
    /// Numeric policy for the LP solve
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_name() -> String {
    "hide-and-seek".to_string()
}

fn default_role() -> Role {
    Role::Seeker
}

fn default_rounds() -> u64 {
    100
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::line(10)
    }
}

impl GameConfig {
    /// Default configuration for a 1D world of `len` locations.
    pub fn line(len: usize) -> Self {
        Self {
            name: default_name(),
            dimensions: Dimensions::Line { len },
            type_distribution: TypeDistribution::default(),
            scores: BaseScores::default(),
            proximity: None,
            computer_role: default_role(),
            rounds: default_rounds(),
            seed: 0,
            solver: SolverConfig::default(),
        }
    }

    /// Default configuration for a `rows × cols` grid.
    pub fn grid(rows: usize, cols: usize) -> Self {
        Self {
            dimensions: Dimensions::Grid { rows, cols },
            ..Self::line(0)
        }
    }

    /// Builder method: set seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method: set the computer's side.
    pub fn with_computer_role(mut self, role: Role) -> Self {
        self.computer_role = role;
        self
    }

    /// Builder method: set round count.
    pub fn with_rounds(mut self, rounds: u64) -> Self {
        self.rounds = rounds;
        self
    }

    /// Builder method: enable a proximity penalty.
    pub fn with_proximity(mut self, shape: PenaltyShape) -> Self {
        self.proximity = Some(shape);
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions.checked_len().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "dimensions".to_string(),
                message: format!("{} has more locations than can be indexed", self.dimensions),
            });
        }
        if self.dimensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dimensions".to_string(),
                message: "world must have at least one location".to_string(),
            });
        }
        if let Err(e) = self.type_distribution.validate() {
            return Err(ConfigError::InvalidValue {
                field: "type_distribution".to_string(),
                message: e.to_string(),
            });
        }
        if let Err(e) = self.scores.validate() {
            return Err(ConfigError::InvalidValue {
                field: "scores".to_string(),
                message: e.to_string(),
            });
        }
        match self.proximity {
            Some(PenaltyShape::Saturating { scale }) if !(scale > 0.0 && scale.is_finite()) => {
                return Err(ConfigError::InvalidValue {
                    field: "proximity.scale".to_string(),
                    message: format!("must be positive, got {}", scale),
                });
            }
            Some(PenaltyShape::Exponential { rate }) if !(rate > 0.0 && rate.is_finite()) => {
                return Err(ConfigError::InvalidValue {
                    field: "proximity.rate".to_string(),
                    message: format!("must be positive, got {}", rate),
                });
            }
            _ => {}
        }
        if self.rounds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rounds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Err(e) = self.solver.validate() {
            return Err(ConfigError::InvalidValue {
                field: "solver".to_string(),
                message: e.to_string(),
            });
        }
        Ok(())
    }

    /// Draw the world this configuration describes.
    pub fn build_world(&self) -> crate::error::Result<World> {
        World::create(self.dimensions, &self.type_distribution, self.seed)
    }
}

/// Configuration errors.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// File could not be read or written.
    IoError(String),
    /// JSON was malformed or did not match the schema.
    ParseError(String),
    /// A field parsed but holds an unusable value.
    InvalidValue {
        /// Offending field, dotted for nested values.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {}", e),
            Self::ParseError(e) => write!(f, "Parse error: {}", e),
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: &str = r#"{
        "name": "Test Grid",
        "dimensions": { "kind": "grid", "rows": 3, "cols": 4 },
        "type_distribution": { "hard": 1.0, "neutral": 2.0, "easy": 1.0 },
        "scores": {
            "hard": { "seeker": 4.0, "hider": 0.5 },
            "neutral": { "seeker": 2.0, "hider": 2.0 },
            "easy": { "seeker": 1.0, "hider": 3.0 },
            "miss": 0.0,
            "escape": 1.0
        },
        "proximity": { "shape": "saturating", "scale": 2.0 },
        "computer_role": "hider",
        "rounds": 250,
        "seed": 17
    }"#;

    #[test]
    fn test_parse_config() {
        let config = GameConfig::from_json_str(TEST_CONFIG).unwrap();
        assert_eq!(config.name, "Test Grid");
        assert_eq!(config.dimensions, Dimensions::Grid { rows: 3, cols: 4 });
        assert_eq!(config.computer_role, Role::Hider);
        assert_eq!(config.proximity, Some(PenaltyShape::Saturating { scale: 2.0 }));
        assert_eq!(config.rounds, 250);
        assert_eq!(config.scores.hard.seeker, 4.0);
        // Solver settings fall back to defaults.
        assert_eq!(config.solver.tolerance, 1e-6);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "dimensions": { "kind": "line", "len": 5 } }"#).unwrap();
        assert_eq!(config.name, "hide-and-seek");
        assert_eq!(config.scores, BaseScores::default());
        assert_eq!(config.computer_role, Role::Seeker);
        assert!(config.proximity.is_none());
        assert_eq!(config.build_world().unwrap().len(), 5);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::grid(2, 2).with_proximity(PenaltyShape::Exponential { rate: 0.5 });
        let parsed = GameConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.dimensions, config.dimensions);
        assert_eq!(parsed.proximity, config.proximity);
    }

    #[test]
    fn test_invalid_values() {
        let err = GameConfig::line(0).validate().unwrap_err();
        assert!(err.to_string().contains("dimensions"));

        let err = GameConfig::line(3).with_rounds(0).validate().unwrap_err();
        assert!(err.to_string().contains("rounds"));

        let err = GameConfig::line(3)
            .with_proximity(PenaltyShape::Saturating { scale: 0.0 })
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("proximity.scale"));

        let mut config = GameConfig::line(3);
        config.scores.neutral.hider = 9.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_oversized_grid_is_invalid() {
        let json = format!(
            r#"{{ "dimensions": {{ "kind": "grid", "rows": {}, "cols": 3 }} }}"#,
            usize::MAX
        );
        match GameConfig::from_json_str(&json) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "dimensions"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(GameConfig::from_json_str("{"), Err(ConfigError::ParseError(_))));
        assert!(matches!(
            GameConfig::from_json_file("/definitely/not/here.json"),
            Err(ConfigError::IoError(_))
        ));
    }
}
