//! Simulation settings.
//!
//! Everything has a default, so an empty document deserializes to a valid
//! configuration:
//!
//! ```rust
//! use qstab_core::config::SimulationConfig;
//!
//! let config: SimulationConfig = serde_json::from_str("{}").unwrap();
//! assert_eq!(config.seed, None);
//! assert_eq!(config.noise.error_probability, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{StabError, StabResult};
use crate::noise::ErrorModel;

/// Settings for building a [`CircuitState`](crate::CircuitState) and its noise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for measurement outcomes and error sampling. `None` uses OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Error injection settings.
    #[serde(default)]
    pub noise: NoiseConfig,
}

/// Error injection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Chance that a qubit is hit when errors are injected.
    #[serde(default)]
    pub error_probability: f64,
}

impl SimulationConfig {
    /// Check that every field is in range.
    pub fn validate(&self) -> StabResult<()> {
        self.noise.validate()
    }

    /// Return a copy with the seed replaced, if `seed` is given.
    #[must_use]
    pub fn with_seed_override(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Return a copy with the error probability replaced, if `p` is given.
    #[must_use]
    pub fn with_error_probability_override(mut self, p: Option<f64>) -> Self {
        if let Some(p) = p {
            self.noise.error_probability = p;
        }
        self
    }
}

impl NoiseConfig {
    /// Check the probability is in `[0, 1]`.
    pub fn validate(&self) -> StabResult<()> {
        if (0.0..=1.0).contains(&self.error_probability) {
            Ok(())
        } else {
            Err(StabError::InvalidProbability(self.error_probability))
        }
    }

    /// The error model these settings describe.
    pub fn error_model(&self) -> StabResult<ErrorModel> {
        ErrorModel::new(self.error_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let config = SimulationConfig::default().with_error_probability_override(Some(1.5));
        assert_eq!(config.validate(), Err(StabError::InvalidProbability(1.5)));

        let config = SimulationConfig::default().with_error_probability_override(Some(f64::NAN));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_only_apply_when_given() {
        let config = SimulationConfig {
            seed: Some(3),
            noise: NoiseConfig {
                error_probability: 0.25,
            },
        };
        let same = config
            .clone()
            .with_seed_override(None)
            .with_error_probability_override(None);
        assert_eq!(same, config);

        let changed = config.with_seed_override(Some(9));
        assert_eq!(changed.seed, Some(9));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"noise": {"error_probability": 0.01}}"#).unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.noise.error_probability, 0.01);
    }
}
