//! Orchestrator - main simulation loop
//!
//! Owns every component of a run and advances it one step at a time.
//!
//! # Step Loop
//!
//! For step `t`:
//! 1. Freeze the agents into a snapshot
//! 2. Every node proposes changes against the snapshot (ascending node order)
//! 3. Pick one winner per node with several status claims, uniformly at random
//! 4. Commit proposals in order, discarding losing claims
//! 5. Retention over every node that is now a high performer
//! 6. Record metrics for `t`
//! 7. Advance the clock
//!
//! # Determinism
//!
//! All randomness goes through one seeded `RngManager`, consumed in a fixed
//! order: topology, seeds, capacities, then per step interactions, claim
//! resolution (contested nodes ascending) and retention. Same config + same seed = identical results.

use tracing::{debug, info, trace};

use crate::core::time::StepClock;
use crate::metrics::{MetricsHistory, MetricsRecorder, TransitionCounts};
use crate::models::agent::{AgentError, TimerKind};
use crate::models::event::{Event, EventLog, TransitionCause};
use crate::models::state::AgentStore;
use crate::models::status::{Status, StatusCounts};
use crate::orchestrator::config::{ConfigError, SimulationConfig};
use crate::rng::RngManager;
use crate::rules::{build_rule, InteractionRule, ProposedChange, RetentionPolicy, StepView};
use crate::topology::{Graph, NodeId, TopologyBuilder};

// ============================================================================
// Results
// ============================================================================

/// Result of a single step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Step number (1-based)
    pub step: usize,

    /// Status counts after the step
    pub counts: StatusCounts,

    /// Committed status changes this step
    pub transitions: TransitionCounts,

    /// Status changes plus influence starts committed this step
    pub num_changes: usize,

    /// Claims that lost to a competing claim on the same node
    pub num_superseded: usize,
}

/// Owned view handed to observers after each committed step
#[derive(Debug, Clone, PartialEq)]
pub struct StepSnapshot {
    pub step: usize,
    /// Status of every node, by id
    pub statuses: Vec<Status>,
    pub counts: StatusCounts,
    pub transitions: TransitionCounts,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub graph: Graph,
    pub statuses: Vec<Status>,
    pub capacities: Vec<f64>,
    pub history: MetricsHistory,
    pub events: EventLog,
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    InvalidConfig(ConfigError),

    /// Agent store rejected a change
    Agent(AgentError),

    /// `step()` called after the configured number of steps
    StepLimitReached { step_count: usize },

    /// An earlier step failed part way through its commit
    Aborted { step: usize },
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfig(err) => write!(f, "Invalid config: {}", err),
            SimulationError::Agent(err) => write!(f, "Agent error: {}", err),
            SimulationError::StepLimitReached { step_count } => {
                write!(f, "Step limit reached: all {} steps already ran", step_count)
            }
            SimulationError::Aborted { step } => {
                write!(f, "Simulation aborted: step {} failed mid-commit", step)
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidConfig(err) => Some(err),
            SimulationError::Agent(err) => Some(err),
            SimulationError::StepLimitReached { .. } | SimulationError::Aborted { .. } => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::InvalidConfig(err)
    }
}

impl From<AgentError> for SimulationError {
    fn from(err: AgentError) -> Self {
        SimulationError::Agent(err)
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator managing simulation state and the step loop
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::{Orchestrator, SimulationConfig};
///
/// let config = SimulationConfig {
///     node_count: 30,
///     step_count: 10,
///     ..SimulationConfig::default()
/// };
/// let mut orchestrator = Orchestrator::new(config).unwrap();
///
/// let first = orchestrator.step().unwrap();
/// assert_eq!(first.step, 1);
/// assert_eq!(first.counts.total(), 30);
///
/// orchestrator.run().unwrap();
/// assert_eq!(orchestrator.history().len(), 10);
/// ```
pub struct Orchestrator {
    config: SimulationConfig,

    /// Graph plus per-node state
    store: AgentStore,

    clock: StepClock,

    /// Deterministic RNG
    rng: RngManager,

    /// Selected diffusion model
    rule: Box<dyn InteractionRule>,

    /// `None` when no retention rate is configured
    retention: Option<RetentionPolicy>,

    metrics: MetricsRecorder,

    event_log: EventLog,

    /// Step whose commit failed; the store may be partly updated
    failed_step: Option<usize>,
}

impl Orchestrator {
    /// Validate `config`, then build graph, agents, rule and recorder
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidConfig` for any configuration problem; no step
    /// has run at that point.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = RngManager::new(config.rng_seed);

        let graph =
            TopologyBuilder::new(config.topology_kind, config.topology_param).build(config.node_count, &mut rng)?;

        let rule = build_rule(config.diffusion_model, config.base_influence_probability);
        let mut store = AgentStore::seeded(
            graph,
            rule.status_set(),
            config.initial_seed_count,
            &mut rng,
            |rng| rule.draw_capacity(rng),
        )?;

        for node in 0..store.node_count() {
            if let Some((kind, value)) = rule.initial_timer(store.status_of(node)?) {
                store.set_timer(node, kind, value)?;
            }
        }

        let orchestrator = Self::from_parts(config, store, rng, rule);

        info!(
            nodes = orchestrator.store.node_count(),
            edges = orchestrator.graph().edge_count(),
            isolated = orchestrator.graph().isolated_nodes().len(),
            model = %orchestrator.config.diffusion_model,
            topology = %orchestrator.config.topology_kind,
            seed = orchestrator.config.rng_seed,
            "simulation initialized"
        );

        Ok(orchestrator)
    }

    /// Assemble an orchestrator around an already initialized store
    ///
    /// `config` is not validated again; its step count and retention rate
    /// drive the run.
    pub(crate) fn from_parts(
        config: SimulationConfig,
        store: AgentStore,
        rng: RngManager,
        rule: Box<dyn InteractionRule>,
    ) -> Self {
        Self {
            clock: StepClock::new(config.step_count),
            retention: config.retention_rate.map(RetentionPolicy::new),
            metrics: MetricsRecorder::new(store.counts()),
            config,
            store,
            rng,
            rule,
            event_log: EventLog::new(),
            failed_step: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Steps committed so far
    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    pub fn store(&self) -> &AgentStore {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut AgentStore {
        &mut self.store
    }

    #[cfg(test)]
    pub(crate) fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    pub fn graph(&self) -> &Graph {
        self.store.graph()
    }

    pub fn history(&self) -> &MetricsHistory {
        self.metrics.history()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.store.statuses()
    }

    pub fn capacities(&self) -> Vec<f64> {
        self.store.capacities()
    }

    // ========================================================================
    // Step loop
    // ========================================================================

    /// Execute one step
    ///
    /// # Errors
    ///
    /// `StepLimitReached` once `step_count` steps have run. An agent store
    /// error aborts the run: the failing step is not retried and every later
    /// call returns `Aborted`.
    pub fn step(&mut self) -> Result<StepResult, SimulationError> {
        if let Some(step) = self.failed_step {
            return Err(SimulationError::Aborted { step });
        }
        let step = self.clock.next_step().ok_or(SimulationError::StepLimitReached {
            step_count: self.clock.total_steps(),
        })?;

        self.execute_step(step).map_err(|err| {
            self.failed_step = Some(step);
            err
        })
    }

    fn execute_step(&mut self, step: usize) -> Result<StepResult, SimulationError> {
        let node_count = self.store.node_count();

        // STEP 1-2: PROPOSE against a frozen snapshot
        let snapshot = self.store.snapshot();
        let mut proposals = Vec::new();
        {
            let view = StepView::new(step, self.store.graph(), &snapshot);
            for node in 0..node_count {
                self.rule.propose(node, &view, &mut self.rng, &mut proposals);
            }
        }

        // STEP 3: RESOLVE competing claims
        let winners = self.resolve_claims(&proposals, node_count);

        // STEP 4: COMMIT
        let mut pairs = Vec::new();
        let mut num_changes = 0;
        let mut num_superseded = 0;

        for (index, change) in proposals.into_iter().enumerate() {
            if change.claims_target() && winners[change.target()] != Some(index) {
                self.supersede(step, change);
                num_superseded += 1;
                continue;
            }

            match change {
                ProposedChange::Transition { node, to, cause } => {
                    if let Some(pair) = self.transition(step, node, to, cause)? {
                        pairs.push(pair);
                        num_changes += 1;
                    }
                }
                ProposedChange::StartInfluence { node, influencer, timer } => {
                    self.store.set_timer(node, TimerKind::Influence, timer)?;
                    self.event_log.log(Event::InfluenceStarted {
                        step,
                        node,
                        influencer,
                        timer,
                    });
                    num_changes += 1;
                }
                ProposedChange::DecrementTimer { node, kind } => {
                    self.store.decrement_timer(node, kind)?;
                }
            }
        }

        // STEP 5: RETENTION
        if let Some(policy) = self.retention {
            for node in 0..node_count {
                let agent = *self.store.agent(node)?;
                if let Some(to) = policy.apply(&agent, &mut self.rng) {
                    if let Some(pair) = self.transition(step, node, to, TransitionCause::Retention)? {
                        pairs.push(pair);
                        num_changes += 1;
                    }
                }
            }
        }

        // STEP 6: METRICS
        let transitions = TransitionCounts::from_pairs(pairs);
        let counts = self.metrics.record(step, &self.store, transitions.clone()).counts;

        // STEP 7: ADVANCE
        self.clock.advance();

        debug!(
            step,
            high_performer = counts.high_performer,
            neutral = counts.neutral,
            engaged = counts.engaged,
            disengaged = counts.disengaged,
            changes = num_changes,
            superseded = num_superseded,
            "step committed"
        );

        Ok(StepResult {
            step,
            counts,
            transitions,
            num_changes,
            num_superseded,
        })
    }

    /// Execute every remaining step
    pub fn run(&mut self) -> Result<Vec<StepResult>, SimulationError> {
        let mut results = Vec::with_capacity(self.clock.remaining());
        while !self.clock.is_finished() {
            results.push(self.step()?);
        }
        self.log_completion();
        Ok(results)
    }

    /// Execute every remaining step, handing `observer` a snapshot after each
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> Result<(), SimulationError>
    where
        F: FnMut(&StepSnapshot),
    {
        while !self.clock.is_finished() {
            let result = self.step()?;
            observer(&StepSnapshot {
                step: result.step,
                statuses: self.store.statuses(),
                counts: result.counts,
                transitions: result.transitions,
            });
        }
        self.log_completion();
        Ok(())
    }

    /// Consume the orchestrator into its final outputs
    pub fn into_result(self) -> SimulationResult {
        SimulationResult {
            statuses: self.store.statuses(),
            capacities: self.store.capacities(),
            graph: self.store.graph().clone(),
            history: self.metrics.into_history(),
            events: self.event_log,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Apply a status change, start the new status's timer and log it
    fn transition(
        &mut self,
        step: usize,
        node: NodeId,
        to: Status,
        cause: TransitionCause,
    ) -> Result<Option<(Status, Status)>, SimulationError> {
        let from = self.store.set_status(node, to)?;
        if from == to {
            return Ok(None);
        }
        if let Some((kind, value)) = self.rule.initial_timer(to) {
            self.store.set_timer(node, kind, value)?;
        }
        self.event_log.log(Event::StatusChanged {
            step,
            node,
            from,
            to,
            cause,
        });
        Ok(Some((from, to)))
    }

    /// Index of the winning proposal for every claimed node
    ///
    /// A node with several claims gets one winner drawn uniformly, visiting
    /// contested nodes in ascending id order.
    fn resolve_claims(&mut self, proposals: &[ProposedChange], node_count: usize) -> Vec<Option<usize>> {
        let mut claims: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (index, change) in proposals.iter().enumerate() {
            if change.claims_target() {
                claims[change.target()].push(index);
            }
        }

        claims
            .iter()
            .map(|candidates| match candidates.len() {
                0 => None,
                1 => Some(candidates[0]),
                n => Some(candidates[self.rng.range(0, n)]),
            })
            .collect()
    }

    fn supersede(&mut self, step: usize, change: ProposedChange) {
        let (node, proposed) = match change {
            ProposedChange::Transition { node, to, .. } => (node, to),
            ProposedChange::StartInfluence { node, .. } => (node, Status::Neutral),
            ProposedChange::DecrementTimer { .. } => return,
        };
        trace!(step, node, proposed = %proposed, "proposal superseded");
        self.event_log.log(Event::ProposalSuperseded { step, node, proposed });
    }

    fn log_completion(&self) {
        let counts = self.store.counts();
        info!(
            steps = self.clock.current_step(),
            high_performer = counts.high_performer,
            neutral = counts.neutral,
            engaged = counts.engaged,
            disengaged = counts.disengaged,
            events = self.event_log.len(),
            "simulation finished"
        );
    }
}

// Manual Debug implementation (rules don't implement Debug)
impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("current_step", &self.current_step())
            .field("total_steps", &self.clock.total_steps())
            .field("model", &self.config.diffusion_model)
            .field("num_agents", &self.store.node_count())
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Convenience entry points
// ============================================================================

/// Build and run a simulation to completion
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::{run, SimulationConfig};
///
/// let result = run(SimulationConfig::default()).unwrap();
/// assert_eq!(result.history.len(), 50);
/// assert_eq!(result.statuses.len(), 100);
/// ```
pub fn run(config: SimulationConfig) -> Result<SimulationResult, SimulationError> {
    let mut orchestrator = Orchestrator::new(config)?;
    orchestrator.run()?;
    Ok(orchestrator.into_result())
}

/// Like [`run`], calling `observer` after every step
pub fn run_with_observer<F>(config: SimulationConfig, observer: F) -> Result<SimulationResult, SimulationError>
where
    F: FnMut(&StepSnapshot),
{
    let mut orchestrator = Orchestrator::new(config)?;
    orchestrator.run_with_observer(observer)?;
    Ok(orchestrator.into_result())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DiffusionModel;
    use crate::topology::TopologyKind;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            node_count: 20,
            topology_kind: TopologyKind::RandomEdge,
            topology_param: 0.3,
            initial_seed_count: 2,
            base_influence_probability: 1.0,
            retention_rate: None,
            diffusion_model: DiffusionModel::SimpleProbabilistic,
            step_count: 5,
            rng_seed: 42,
        }
    }

    #[test]
    fn test_invalid_config_fails_before_any_step() {
        let config = SimulationConfig {
            initial_seed_count: 21,
            ..small_config()
        };
        assert!(matches!(
            Orchestrator::new(config),
            Err(SimulationError::InvalidConfig(ConfigError::SeedCount { .. }))
        ));
    }

    #[test]
    fn test_step_past_bound_is_an_error() {
        let mut orchestrator = Orchestrator::new(small_config()).unwrap();
        orchestrator.run().unwrap();
        assert_eq!(
            orchestrator.step(),
            Err(SimulationError::StepLimitReached { step_count: 5 })
        );
    }

    #[test]
    fn test_zero_steps_leaves_only_baseline() {
        let config = SimulationConfig {
            step_count: 0,
            ..small_config()
        };
        let result = run(config).unwrap();
        assert!(result.history.is_empty());
        assert_eq!(result.history.baseline().high_performer, 2);
    }

    #[test]
    fn test_timer_seeds_start_engagement_countdown() {
        let config = SimulationConfig {
            diffusion_model: DiffusionModel::TimerBased,
            ..small_config()
        };
        let orchestrator = Orchestrator::new(config).unwrap();
        for agent in orchestrator.store().agents() {
            let expected = if agent.is(Status::HighPerformer) {
                crate::rules::ENGAGEMENT_STEPS
            } else {
                0
            };
            assert_eq!(agent.timer(TimerKind::Engagement), expected);
        }
    }

    #[test]
    fn test_transitions_match_status_changed_events() {
        let config = SimulationConfig {
            retention_rate: Some(0.8),
            ..small_config()
        };
        let result = run(config).unwrap();
        for entry in result.history.entries() {
            let from_log = TransitionCounts::from_pairs(result.events.transitions_at_step(entry.step));
            assert_eq!(entry.transitions, from_log);
        }
    }
}
