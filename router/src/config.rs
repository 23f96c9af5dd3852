//! Configuration for routing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, RouterError};

/// Weights of the three scoring signals.
///
/// A weight of `0.0` disables its signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
    /// Added when a query token equals a trigger.
    pub exact_weight: f64,
    /// Added once per trigger that contains, or is contained in, a query token.
    pub partial_weight: f64,
    /// Added once per skill whose description contains a query token as a word.
    pub description_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_weight: 3.0,
            partial_weight: 1.0,
            description_weight: 0.5,
        }
    }
}

impl ScoringWeights {
    /// Check that every weight is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::InvalidConfig` naming the first bad weight.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("exactWeight", self.exact_weight)?;
        check_non_negative("partialWeight", self.partial_weight)?;
        check_non_negative("descriptionWeight", self.description_weight)
    }
}

/// Configuration for a [`SkillRouter`](crate::SkillRouter).
///
/// Can be built in code or read from TOML:
///
/// ```toml
/// minFuzzyLen = 3
/// defaultLimit = 3
/// defaultThreshold = 0.0
///
/// [weights]
/// exactWeight = 3.0
/// partialWeight = 1.0
/// descriptionWeight = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    /// Signal weights.
    pub weights: ScoringWeights,
    /// Minimum length of the shorter string for partial and description
    /// matches. Exact matches are never length-gated.
    pub min_fuzzy_len: usize,
    /// Result limit used when a request doesn't set one. `None` is unbounded.
    pub default_limit: Option<usize>,
    /// Score threshold used when a request doesn't set one.
    pub default_threshold: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_fuzzy_len: 3,
            default_limit: None,
            default_threshold: 0.0,
        }
    }
}

impl RouterConfig {
    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::new()
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::Toml` for invalid TOML and
    /// `RouterError::InvalidConfig` for out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::ReadConfig` if the file can't be read,
    /// `RouterError::ParseConfig` for invalid TOML and
    /// `RouterError::InvalidConfig` for out-of-range values.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RouterError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| RouterError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        check_non_negative("defaultThreshold", self.default_threshold)?;
        if self.default_limit == Some(0) {
            return Err(RouterError::InvalidConfig {
                field: "defaultLimit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for router configuration.
#[derive(Debug, Default)]
pub struct RouterConfigBuilder {
    config: RouterConfig,
}

impl RouterConfigBuilder {
    /// Creates a new configuration builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
        }
    }

    /// Sets all signal weights at once.
    #[must_use]
    pub const fn weights(mut self, weights: ScoringWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Sets the exact match weight.
    #[must_use]
    pub const fn exact_weight(mut self, weight: f64) -> Self {
        self.config.weights.exact_weight = weight;
        self
    }

    /// Sets the partial match weight.
    #[must_use]
    pub const fn partial_weight(mut self, weight: f64) -> Self {
        self.config.weights.partial_weight = weight;
        self
    }

    /// Sets the description overlap weight.
    #[must_use]
    pub const fn description_weight(mut self, weight: f64) -> Self {
        self.config.weights.description_weight = weight;
        self
    }

    /// Sets the minimum length for partial and description matches.
    #[must_use]
    pub const fn min_fuzzy_len(mut self, len: usize) -> Self {
        self.config.min_fuzzy_len = len;
        self
    }

    /// Sets the default result limit.
    #[must_use]
    pub const fn default_limit(mut self, limit: Option<usize>) -> Self {
        self.config.default_limit = limit;
        self
    }

    /// Sets the default score threshold.
    #[must_use]
    pub const fn default_threshold(mut self, threshold: f64) -> Self {
        self.config.default_threshold = threshold;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> RouterConfig {
        self.config
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RouterError::InvalidConfig {
            field,
            reason: format!("expected a finite non-negative number, got {value}"),
        })
    }
}
