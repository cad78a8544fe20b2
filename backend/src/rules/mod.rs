//! Interaction Rule Module
//!
//! Defines how agents change status through contact with their neighbors.
//!
//! # Overview
//!
//! Each step the orchestrator freezes the agents into a [`StepView`] and asks
//! the configured rule to propose changes for every node, in ascending node
//! order. Rules never touch the agent store: they only push
//! [`ProposedChange`]s, which the orchestrator commits after every node has
//! proposed. When several proposals claim one node, a single winner is drawn
//! uniformly at random; commit order equals proposal order.
//!
//! # Rule Interface
//!
//! All diffusion models implement the `InteractionRule` trait:
//! ```rust
//! use influence_simulator_core_rs::rules::{InteractionRule, ProposedChange, StepView};
//! use influence_simulator_core_rs::{NodeId, RngManager, Status};
//!
//! struct Frozen;
//!
//! impl InteractionRule for Frozen {
//!     fn status_set(&self) -> &'static [Status] {
//!         &[Status::HighPerformer, Status::Neutral]
//!     }
//!
//!     fn draw_capacity(&self, _rng: &mut RngManager) -> f64 {
//!         1.0
//!     }
//!
//!     fn propose(
//!         &self,
//!         _node: NodeId,
//!         _view: &StepView<'_>,
//!         _rng: &mut RngManager,
//!         _out: &mut Vec<ProposedChange>,
//!     ) {
//!         // Nothing ever changes
//!     }
//! }
//! ```
//!
//! Available models:
//! 1. **SimpleProbabilistic**: influencers convert, rescue or drag neighbors
//! 2. **TimerBased**: influence and engagement play out over countdown timers
//! 3. **ThresholdBased**: nodes follow a strict majority of their neighbors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::agent::{Agent, TimerKind};
use crate::models::event::TransitionCause;
use crate::models::status::{Status, StatusCounts};
use crate::orchestrator::ConfigError;
use crate::rng::RngManager;
use crate::topology::{Graph, NodeId};

pub mod retention;
pub mod simple;
pub mod threshold;
pub mod timer;

pub use retention::RetentionPolicy;
pub use simple::SimpleProbabilisticRule;
pub use threshold::ThresholdRule;
pub use timer::{TimerRule, ENGAGEMENT_STEPS};

/// Status set shared by the timer and threshold models
pub(crate) const FOUR_STATUS: &[Status] = &[
    Status::HighPerformer,
    Status::Neutral,
    Status::Engaged,
    Status::Disengaged,
];

/// Diffusion model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DiffusionModel {
    SimpleProbabilistic,
    TimerBased,
    ThresholdBased,
}

impl DiffusionModel {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffusionModel::SimpleProbabilistic => "simple_probabilistic",
            DiffusionModel::TimerBased => "timer_based",
            DiffusionModel::ThresholdBased => "threshold_based",
        }
    }

    /// Whether a retention rate may be configured with this model
    pub fn supports_retention(&self) -> bool {
        !matches!(self, DiffusionModel::ThresholdBased)
    }
}

impl fmt::Display for DiffusionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffusionModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple_probabilistic" => Ok(DiffusionModel::SimpleProbabilistic),
            "timer_based" => Ok(DiffusionModel::TimerBased),
            "threshold_based" => Ok(DiffusionModel::ThresholdBased),
            other => Err(ConfigError::UnknownDiffusionModel(other.to_string())),
        }
    }
}

impl TryFrom<String> for DiffusionModel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiffusionModel> for String {
    fn from(model: DiffusionModel) -> Self {
        model.as_str().to_string()
    }
}

/// Create the rule for a diffusion model
///
/// `base_probability` is the configured `base_influence_probability`.
pub fn build_rule(model: DiffusionModel, base_probability: f64) -> Box<dyn InteractionRule> {
    match model {
        DiffusionModel::SimpleProbabilistic => Box::new(SimpleProbabilisticRule::new(base_probability)),
        DiffusionModel::TimerBased => Box::new(TimerRule::new(base_probability)),
        DiffusionModel::ThresholdBased => Box::new(ThresholdRule::new(base_probability)),
    }
}

/// A change a rule wants applied once every node has proposed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProposedChange {
    /// Move `node` to `to`; claims the node
    Transition {
        node: NodeId,
        to: Status,
        cause: TransitionCause,
    },

    /// Start the influence countdown of a neutral `node`; claims the node
    StartInfluence {
        node: NodeId,
        influencer: NodeId,
        timer: u32,
    },

    /// Count a timer down by one; never conflicts
    DecrementTimer { node: NodeId, kind: TimerKind },
}

impl ProposedChange {
    /// Node the change applies to
    pub fn target(&self) -> NodeId {
        match self {
            ProposedChange::Transition { node, .. } => *node,
            ProposedChange::StartInfluence { node, .. } => *node,
            ProposedChange::DecrementTimer { node, .. } => *node,
        }
    }

    /// Whether applying this change claims the target for the rest of the step
    pub fn claims_target(&self) -> bool {
        !matches!(self, ProposedChange::DecrementTimer { .. })
    }
}

/// Read-only view of the agents at the start of a step
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    step: usize,
    graph: &'a Graph,
    agents: &'a [Agent],
}

impl<'a> StepView<'a> {
    pub fn new(step: usize, graph: &'a Graph, agents: &'a [Agent]) -> Self {
        Self { step, graph, agents }
    }

    /// Step being computed (1-based)
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn agent(&self, node: NodeId) -> &'a Agent {
        &self.agents[node]
    }

    pub fn status(&self, node: NodeId) -> Status {
        self.agents[node].status()
    }

    /// Neighbors of `node`, ascending
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        self.graph.neighbors(node)
    }

    /// Status tally over the neighbors of `node`
    pub fn neighbor_mix(&self, node: NodeId) -> NeighborMix {
        let counts = StatusCounts::from_statuses(self.neighbors(node).map(|n| self.status(n)));
        NeighborMix { counts }
    }
}

/// Statuses found among a node's neighbors
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeighborMix {
    counts: StatusCounts,
}

impl NeighborMix {
    pub fn total(&self) -> usize {
        self.counts.total()
    }

    pub fn count(&self, status: Status) -> usize {
        self.counts.get(status)
    }

    /// Share of neighbors in any of `statuses`; 0 for an isolated node
    pub fn fraction(&self, statuses: &[Status]) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let matching: usize = statuses.iter().map(|s| self.counts.get(*s)).sum();
        matching as f64 / total as f64
    }

    /// Strictly more than half of the neighbors are in `statuses`
    pub fn majority(&self, statuses: &[Status]) -> bool {
        self.fraction(statuses) > 0.5
    }
}

/// Pluggable per-model interaction strategy
pub trait InteractionRule: Send + Sync {
    /// Statuses agents may take under this rule
    fn status_set(&self) -> &'static [Status];

    /// Draw one agent's influence capacity
    fn draw_capacity(&self, rng: &mut RngManager) -> f64;

    /// Timer an agent entering `status` starts with
    ///
    /// Applied to seeds at initialization and after every committed
    /// transition.
    fn initial_timer(&self, _status: Status) -> Option<(TimerKind, u32)> {
        None
    }

    /// Push the changes `node` causes this step
    ///
    /// Must read only `view` and draw from `rng` in ascending neighbor order.
    fn propose(&self, node: NodeId, view: &StepView<'_>, rng: &mut RngManager, out: &mut Vec<ProposedChange>);
}
