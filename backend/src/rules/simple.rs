//! Simple probabilistic model
//!
//! Three statuses, no timers. Each step every high performer tries once per
//! eligible neighbor to:
//! - convert a neutral neighbor, with probability `base × capacity`
//! - rescue a disengaged neighbor back to neutral, at half that probability
//!
//! and every disengaged agent tries once per neutral neighbor to drag it down,
//! with probability `base × 0.3`. Neutral agents exert no influence.
//!
//! Capacities are uniform in `[0.5, 1.5)`.

use super::{InteractionRule, ProposedChange, StepView};
use crate::models::event::TransitionCause;
use crate::models::status::Status;
use crate::rng::RngManager;
use crate::topology::NodeId;

/// Factor applied to the conversion probability for a rescue
pub const RESCUE_FACTOR: f64 = 0.5;

/// Factor applied to the base probability for a drag
pub const DRAG_FACTOR: f64 = 0.3;

const STATUS_SET: &[Status] = &[Status::HighPerformer, Status::Neutral, Status::Disengaged];

/// Influencers push neighbors up (or back to neutral); disengaged agents pull them down
///
/// # Example
///
/// ```
/// use influence_simulator_core_rs::rules::{InteractionRule, SimpleProbabilisticRule, StepView};
/// use influence_simulator_core_rs::{Agent, Graph, RngManager, Status};
///
/// let rule = SimpleProbabilisticRule::new(1.0);
/// let graph = Graph::from_edges(2, &[(0, 1)]);
/// let agents = vec![
///     Agent::new(0, Status::HighPerformer, 1.0),
///     Agent::new(1, Status::Neutral, 1.0),
/// ];
/// let mut rng = RngManager::new(3);
/// let mut out = Vec::new();
///
/// rule.propose(0, &StepView::new(1, &graph, &agents), &mut rng, &mut out);
/// assert_eq!(out.len(), 1); // base × capacity = 1.0 always succeeds
/// ```
#[derive(Debug, Clone)]
pub struct SimpleProbabilisticRule {
    base_probability: f64,
}

impl SimpleProbabilisticRule {
    pub fn new(base_probability: f64) -> Self {
        Self { base_probability }
    }
}

impl InteractionRule for SimpleProbabilisticRule {
    fn status_set(&self) -> &'static [Status] {
        STATUS_SET
    }

    fn draw_capacity(&self, rng: &mut RngManager) -> f64 {
        rng.uniform(0.5, 1.5)
    }

    fn propose(&self, node: NodeId, view: &StepView<'_>, rng: &mut RngManager, out: &mut Vec<ProposedChange>) {
        let agent = view.agent(node);

        match agent.status() {
            Status::HighPerformer => {
                let convert = self.base_probability * agent.influence_capacity();
                let rescue = convert * RESCUE_FACTOR;

                for neighbor in view.neighbors(node) {
                    match view.status(neighbor) {
                        Status::Neutral => {
                            if rng.chance(convert) {
                                out.push(ProposedChange::Transition {
                                    node: neighbor,
                                    to: Status::HighPerformer,
                                    cause: TransitionCause::Influence,
                                });
                            }
                        }
                        Status::Disengaged => {
                            if rng.chance(rescue) {
                                out.push(ProposedChange::Transition {
                                    node: neighbor,
                                    to: Status::Neutral,
                                    cause: TransitionCause::Rescue,
                                });
                            }
                        }
                        _ => {}
                    }
                }
            }
            Status::Disengaged => {
                let drag = self.base_probability * DRAG_FACTOR;

                for neighbor in view.neighbors(node) {
                    if view.status(neighbor) == Status::Neutral && rng.chance(drag) {
                        out.push(ProposedChange::Transition {
                            node: neighbor,
                            to: Status::Disengaged,
                            cause: TransitionCause::Drag,
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agent::Agent;
    use crate::topology::Graph;

    fn propose_all(rule: &SimpleProbabilisticRule, graph: &Graph, agents: &[Agent], seed: u64) -> Vec<ProposedChange> {
        let view = StepView::new(1, graph, agents);
        let mut rng = RngManager::new(seed);
        let mut out = Vec::new();
        for node in 0..graph.node_count() {
            rule.propose(node, &view, &mut rng, &mut out);
        }
        out
    }

    #[test]
    fn test_certain_conversion_and_rescue() {
        // 1 <- 0 -> 2, capacity 2.0 pushes both probabilities to 1
        let graph = Graph::from_edges(3, &[(0, 1), (0, 2)]);
        let agents = vec![
            Agent::new(0, Status::HighPerformer, 2.0),
            Agent::new(1, Status::Neutral, 1.0),
            Agent::new(2, Status::Disengaged, 1.0),
        ];
        let out = propose_all(&SimpleProbabilisticRule::new(1.0), &graph, &agents, 9);

        // Node 2 also drags nobody: its only neighbor is the high performer
        assert_eq!(
            out,
            vec![
                ProposedChange::Transition {
                    node: 1,
                    to: Status::HighPerformer,
                    cause: TransitionCause::Influence,
                },
                ProposedChange::Transition {
                    node: 2,
                    to: Status::Neutral,
                    cause: TransitionCause::Rescue,
                },
            ]
        );
    }

    #[test]
    fn test_zero_base_probability_proposes_nothing() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)]);
        let agents = vec![
            Agent::new(0, Status::HighPerformer, 1.5),
            Agent::new(1, Status::Neutral, 1.0),
            Agent::new(2, Status::Disengaged, 1.0),
        ];
        assert!(propose_all(&SimpleProbabilisticRule::new(0.0), &graph, &agents, 1).is_empty());
    }

    #[test]
    fn test_neutral_agents_exert_no_influence() {
        let graph = Graph::from_edges(2, &[(0, 1)]);
        let agents = vec![Agent::new(0, Status::Neutral, 1.0), Agent::new(1, Status::Neutral, 1.0)];
        let mut rng = RngManager::new(5);
        let before = rng.get_state();
        let out = {
            let view = StepView::new(1, &graph, &agents);
            let mut out = Vec::new();
            SimpleProbabilisticRule::new(1.0).propose(0, &view, &mut rng, &mut out);
            out
        };
        assert!(out.is_empty());
        assert_eq!(rng.get_state(), before, "no draw for ineligible pairs");
    }

    #[test]
    fn test_capacity_range() {
        let rule = SimpleProbabilisticRule::new(0.5);
        let mut rng = RngManager::new(77);
        for _ in 0..1000 {
            let c = rule.draw_capacity(&mut rng);
            assert!((0.5..1.5).contains(&c));
        }
    }
}
