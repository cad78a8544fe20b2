//! Agent Store
//!
//! Holds the interaction graph and one `Agent` per node. This is the only
//! place statuses and timers change.
//!
//! # Critical Invariants
//!
//! 1. **One agent per node**: `agents[i].id() == i` for every node of the graph
//! 2. **Status membership**: every status belongs to the configured status set
//! 3. **Non-negative timers**: timers are unsigned and decrementing zero is an error
//! 4. **Seeding**: exactly `seed_count` agents start as high performers, the rest neutral

use crate::models::agent::{Agent, AgentError, TimerKind};
use crate::models::status::{Status, StatusCounts};
use crate::orchestrator::ConfigError;
use crate::rng::RngManager;
use crate::topology::{Graph, NodeId};

/// Per-node mutable state plus the immutable graph
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::{AgentStore, Graph, RngManager, Status};
///
/// let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
/// let statuses = &[Status::HighPerformer, Status::Neutral, Status::Disengaged];
/// let mut rng = RngManager::new(1);
///
/// let store = AgentStore::seeded(graph, statuses, 2, &mut rng, |_| 1.0).unwrap();
/// assert_eq!(store.node_count(), 4);
/// assert_eq!(store.counts().high_performer, 2);
/// ```
#[derive(Debug, Clone)]
pub struct AgentStore {
    graph: Graph,

    /// Indexed by node id
    agents: Vec<Agent>,

    /// Statuses the selected diffusion model may use
    status_set: &'static [Status],
}

impl AgentStore {
    /// Create a store from pre-built agents
    ///
    /// # Errors
    ///
    /// - `UnknownNode` if the agents do not map one-to-one onto the graph's nodes
    /// - `StatusNotAllowed` if an agent's status is outside `status_set`
    pub fn new(graph: Graph, agents: Vec<Agent>, status_set: &'static [Status]) -> Result<Self, AgentError> {
        if agents.len() != graph.node_count() {
            return Err(AgentError::UnknownNode(agents.len().min(graph.node_count())));
        }
        for (index, agent) in agents.iter().enumerate() {
            if agent.id() != index {
                return Err(AgentError::UnknownNode(agent.id()));
            }
            if !status_set.contains(&agent.status()) {
                return Err(AgentError::StatusNotAllowed {
                    node: index,
                    status: agent.status(),
                });
            }
        }
        Ok(Self {
            graph,
            agents,
            status_set,
        })
    }

    /// Create a store with `seed_count` random high performers
    ///
    /// Seeds are sampled uniformly without replacement; afterwards
    /// `draw_capacity` is called once per node in ascending id order.
    ///
    /// # Errors
    ///
    /// `ConfigError::SeedCount` if `seed_count` is 0 or exceeds the node count.
    pub fn seeded<F>(
        graph: Graph,
        status_set: &'static [Status],
        seed_count: usize,
        rng: &mut RngManager,
        mut draw_capacity: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(&mut RngManager) -> f64,
    {
        let node_count = graph.node_count();
        if seed_count == 0 || seed_count > node_count {
            return Err(ConfigError::SeedCount {
                requested: seed_count,
                node_count,
            });
        }

        let mut is_seed = vec![false; node_count];
        for node in rng.sample_distinct(node_count, seed_count) {
            is_seed[node] = true;
        }

        let agents = (0..node_count)
            .map(|node| {
                let status = if is_seed[node] {
                    Status::HighPerformer
                } else {
                    Status::Neutral
                };
                Agent::new(node, status, draw_capacity(rng))
            })
            .collect();

        Ok(Self {
            graph,
            agents,
            status_set,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.agents.len()
    }

    pub fn status_set(&self) -> &'static [Status] {
        self.status_set
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, node: NodeId) -> Result<&Agent, AgentError> {
        self.agents.get(node).ok_or(AgentError::UnknownNode(node))
    }

    pub fn status_of(&self, node: NodeId) -> Result<Status, AgentError> {
        self.agent(node).map(Agent::status)
    }

    pub fn capacity_of(&self, node: NodeId) -> Result<f64, AgentError> {
        self.agent(node).map(Agent::influence_capacity)
    }

    pub fn timer_of(&self, node: NodeId, kind: TimerKind) -> Result<u32, AgentError> {
        self.agent(node).map(|a| a.timer(kind))
    }

    /// Neighbors of `node`, ascending
    pub fn neighbors_of(&self, node: NodeId) -> Result<impl Iterator<Item = NodeId> + '_, AgentError> {
        if !self.graph.contains(node) {
            return Err(AgentError::UnknownNode(node));
        }
        Ok(self.graph.neighbors(node))
    }

    /// Status of every node, by id
    pub fn statuses(&self) -> Vec<Status> {
        self.agents.iter().map(Agent::status).collect()
    }

    /// Influence capacity of every node, by id
    pub fn capacities(&self) -> Vec<f64> {
        self.agents.iter().map(Agent::influence_capacity).collect()
    }

    /// Tally of the current statuses
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_statuses(self.agents.iter().map(Agent::status))
    }

    /// Copy of every agent, for read-only use while proposals are computed
    pub fn snapshot(&self) -> Vec<Agent> {
        self.agents.clone()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Change a node's status, returning the previous status
    pub fn set_status(&mut self, node: NodeId, status: Status) -> Result<Status, AgentError> {
        if !self.status_set.contains(&status) {
            return Err(AgentError::StatusNotAllowed { node, status });
        }
        let agent = self.agents.get_mut(node).ok_or(AgentError::UnknownNode(node))?;
        Ok(agent.set_status(status))
    }

    pub fn set_timer(&mut self, node: NodeId, kind: TimerKind, value: u32) -> Result<(), AgentError> {
        let agent = self.agents.get_mut(node).ok_or(AgentError::UnknownNode(node))?;
        agent.set_timer(kind, value);
        Ok(())
    }

    /// Count a timer down by one, returning the new value
    pub fn decrement_timer(&mut self, node: NodeId, kind: TimerKind) -> Result<u32, AgentError> {
        let agent = self.agents.get_mut(node).ok_or(AgentError::UnknownNode(node))?;
        agent.decrement_timer(kind)
    }
}
