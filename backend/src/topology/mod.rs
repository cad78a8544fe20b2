//! Topology construction
//!
//! Builds the fixed interaction graph once per run:
//! - **preferential_attachment**: Barabási–Albert, `topology_param` = attachment count `m`
//! - **random_edge**: Erdős–Rényi G(n, p), `topology_param` = edge probability `p`
//!
//! Connectivity is not guaranteed. Isolated nodes are a normal outcome of a
//! low edge probability and simply never take part in interactions.

mod generators;
pub mod graph;

pub use graph::{Graph, NodeId};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::orchestrator::ConfigError;
use crate::rng::RngManager;

/// Graph generator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TopologyKind {
    /// Preferential attachment; parameter is the attachment count
    PreferentialAttachment,
    /// Independent edges; parameter is the edge probability
    RandomEdge,
}

impl TopologyKind {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyKind::PreferentialAttachment => "preferential_attachment",
            TopologyKind::RandomEdge => "random_edge",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopologyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preferential_attachment" | "barabasi_albert" => Ok(TopologyKind::PreferentialAttachment),
            "random_edge" | "erdos_renyi" => Ok(TopologyKind::RandomEdge),
            other => Err(ConfigError::UnknownTopologyKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for TopologyKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TopologyKind> for String {
    fn from(kind: TopologyKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Check `param` against the domain of `kind` for a graph of `node_count` nodes
pub fn validate_param(kind: TopologyKind, node_count: usize, param: f64) -> Result<(), ConfigError> {
    if node_count < 1 {
        return Err(ConfigError::NodeCount(node_count));
    }
    match kind {
        TopologyKind::PreferentialAttachment => {
            let whole = param.is_finite() && param.fract() == 0.0;
            if !whole || param < 1.0 || param >= node_count as f64 {
                return Err(ConfigError::AttachmentCount { m: param, node_count });
            }
        }
        TopologyKind::RandomEdge => {
            if !param.is_finite() || !(0.0..=1.0).contains(&param) {
                return Err(ConfigError::EdgeProbability(param));
            }
        }
    }
    Ok(())
}

/// Builds the interaction graph for one run
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::{RngManager, TopologyBuilder, TopologyKind};
///
/// let mut rng = RngManager::new(42);
/// let graph = TopologyBuilder::new(TopologyKind::PreferentialAttachment, 2.0)
///     .build(10, &mut rng)
///     .unwrap();
/// assert_eq!(graph.node_count(), 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TopologyBuilder {
    kind: TopologyKind,
    param: f64,
}

impl TopologyBuilder {
    pub fn new(kind: TopologyKind, param: f64) -> Self {
        Self { kind, param }
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    /// Validate, then generate with draws from `rng`
    pub fn build(&self, node_count: usize, rng: &mut RngManager) -> Result<Graph, ConfigError> {
        validate_param(self.kind, node_count, self.param)?;

        let graph = match self.kind {
            TopologyKind::PreferentialAttachment => {
                generators::preferential_attachment(node_count, self.param as usize, rng)
            }
            TopologyKind::RandomEdge => generators::random_edge(node_count, self.param, rng),
        };
        Ok(graph)
    }
}
