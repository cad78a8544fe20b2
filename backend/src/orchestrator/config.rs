//! Simulation configuration
//!
//! `SimulationConfig` is the only input the engine reads. It is built once
//! (by hand, from JSON, from the CLI, or from a Python dict) and validated
//! before any graph is built or any step runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::DiffusionModel;
use crate::topology::{self, TopologyKind};

/// Invalid configuration; always reported before the first step
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("node_count must be at least 1, got {0}")]
    NodeCount(usize),

    #[error("preferential attachment needs a whole attachment count m with 1 <= m < node_count ({node_count}), got {m}")]
    AttachmentCount { m: f64, node_count: usize },

    #[error("random edge probability must be within [0, 1], got {0}")]
    EdgeProbability(f64),

    #[error("initial_seed_count must be within 1..={node_count}, got {requested}")]
    SeedCount { requested: usize, node_count: usize },

    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("unknown diffusion_model '{0}' (expected simple_probabilistic, timer_based or threshold_based)")]
    UnknownDiffusionModel(String),

    #[error("unknown topology_kind '{0}' (expected preferential_attachment or random_edge)")]
    UnknownTopologyKind(String),

    #[error("diffusion_model {0} has no retention policy; leave retention_rate unset")]
    RetentionUnsupported(DiffusionModel),

    #[error("smoothing window must be at least 1")]
    SmoothingWindow,

    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Complete simulation configuration
///
/// # Fields
///
/// * `node_count` - Number of agents / graph nodes
/// * `topology_kind` - Graph generator
/// * `topology_param` - Attachment count (preferential) or edge probability (random)
/// * `initial_seed_count` - Agents starting as high performers
/// * `base_influence_probability` - Base success probability of one interaction
/// * `retention_rate` - Per-step probability a high performer is kept (None = no retention)
/// * `diffusion_model` - Rule set selector
/// * `step_count` - Hard bound on the number of steps
/// * `rng_seed` - Seed for the single run RNG
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::{DiffusionModel, SimulationConfig, TopologyKind};
///
/// let config = SimulationConfig {
///     node_count: 20,
///     topology_kind: TopologyKind::RandomEdge,
///     topology_param: 0.3,
///     initial_seed_count: 2,
///     base_influence_probability: 1.0,
///     retention_rate: None,
///     diffusion_model: DiffusionModel::SimpleProbabilistic,
///     step_count: 5,
///     rng_seed: 42,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub node_count: usize,
    pub topology_kind: TopologyKind,
    pub topology_param: f64,
    pub initial_seed_count: usize,
    pub base_influence_probability: f64,
    #[serde(default)]
    pub retention_rate: Option<f64>,
    pub diffusion_model: DiffusionModel,
    pub step_count: usize,
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    /// Defaults of the original dashboard sliders
    fn default() -> Self {
        Self {
            node_count: 100,
            topology_kind: TopologyKind::PreferentialAttachment,
            topology_param: 3.0,
            initial_seed_count: 3,
            base_influence_probability: 0.5,
            retention_rate: Some(0.7),
            diffusion_model: DiffusionModel::SimpleProbabilistic,
            step_count: 50,
            rng_seed: 12345,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON document
    ///
    /// # Example
    ///
    /// ```rust
    /// use influence_simulator_core_rs::SimulationConfig;
    ///
    /// let json = r#"{
    ///     "node_count": 50,
    ///     "topology_kind": "preferential_attachment",
    ///     "topology_param": 2,
    ///     "initial_seed_count": 5,
    ///     "base_influence_probability": 0.4,
    ///     "retention_rate": 0.9,
    ///     "diffusion_model": "timer_based",
    ///     "step_count": 30,
    ///     "rng_seed": 7
    /// }"#;
    /// let config = SimulationConfig::from_json(json).unwrap();
    /// assert_eq!(config.node_count, 50);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Check every field against its domain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_count < 1 {
            return Err(ConfigError::NodeCount(self.node_count));
        }

        topology::validate_param(self.topology_kind, self.node_count, self.topology_param)?;

        if self.initial_seed_count == 0 || self.initial_seed_count > self.node_count {
            return Err(ConfigError::SeedCount {
                requested: self.initial_seed_count,
                node_count: self.node_count,
            });
        }

        check_probability("base_influence_probability", self.base_influence_probability)?;

        if let Some(rate) = self.retention_rate {
            check_probability("retention_rate", rate)?;
            if !self.diffusion_model.supports_retention() {
                return Err(ConfigError::RetentionUnsupported(self.diffusion_model));
            }
        }

        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}
