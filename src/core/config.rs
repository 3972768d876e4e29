//! Query configuration with documented defaults
//!
//! The adapter itself takes its flags per call. This struct collects the
//! values callers (batch queries, the dump tool) pass through, so they can be
//! tuned from a TOML file instead of being scattered as literals.

use crate::core::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Defaults for placement queries
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Return the first hit a mesh reports instead of the nearest one
    ///
    /// Line-of-sight checks only need a yes/no answer and set this.
    pub stop_at_first_hit: bool,

    /// Skip doodad (M2) geometry inside world models during ray tests
    pub ignore_m2_models: bool,

    /// Longest ray, in world units, a batch ray query starts with
    pub max_ray_distance: f32,

    /// Minimum number of instances before batch queries go parallel
    ///
    /// Below this, thread hand-off costs more than the queries.
    pub parallel_threshold: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stop_at_first_hit: false,
            ignore_m2_models: false,
            max_ray_distance: 1000.0,
            parallel_threshold: 256,
        }
    }
}

impl QueryConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ray_distance <= 0.0 || !self.max_ray_distance.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "max_ray_distance ({}) must be positive and finite",
                self.max_ray_distance
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(ConfigError::Invalid(
                "parallel_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
