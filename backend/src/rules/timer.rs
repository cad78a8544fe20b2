//! Timer-based model
//!
//! Four statuses. Influence and engagement take time:
//!
//! ```text
//! Neutral --(influenced)--> Neutral[influence_timer = cap(influencer)]
//!         --(timer hits 0)--> HighPerformer[engagement_timer = ENGAGEMENT_STEPS]
//!         --(timer hits 0, coin)--> Engaged | Disengaged
//! ```
//!
//! A high performer influences every neutral neighbor that is not already
//! counting down, succeeding with probability `base / cap(neighbor)`.
//! Capacities are whole step counts drawn uniformly from `{1, 2, 3}`.
//! Engaged and disengaged agents are absorbing for this rule.

use super::{InteractionRule, ProposedChange, StepView, FOUR_STATUS};
use crate::models::agent::TimerKind;
use crate::models::event::TransitionCause;
use crate::models::status::Status;
use crate::rng::RngManager;
use crate::topology::NodeId;

/// Steps a new high performer spends before engagement is decided
pub const ENGAGEMENT_STEPS: u32 = 5;

/// Capacities are drawn from `MIN_CAPACITY..=MAX_CAPACITY`
const MIN_CAPACITY: usize = 1;
const MAX_CAPACITY: usize = 3;

/// Countdown-driven influence and engagement
#[derive(Debug, Clone)]
pub struct TimerRule {
    base_probability: f64,
}

impl TimerRule {
    pub fn new(base_probability: f64) -> Self {
        Self { base_probability }
    }

    fn propose_influence(&self, node: NodeId, view: &StepView<'_>, rng: &mut RngManager, out: &mut Vec<ProposedChange>) {
        let timer = view.agent(node).influence_capacity() as u32;

        for neighbor in view.neighbors(node) {
            let target = view.agent(neighbor);
            if !target.is(Status::Neutral) || target.timer(TimerKind::Influence) > 0 {
                continue;
            }
            if rng.chance(self.base_probability / target.influence_capacity()) {
                out.push(ProposedChange::StartInfluence {
                    node: neighbor,
                    influencer: node,
                    timer,
                });
            }
        }
    }
}

impl InteractionRule for TimerRule {
    fn status_set(&self) -> &'static [Status] {
        FOUR_STATUS
    }

    fn draw_capacity(&self, rng: &mut RngManager) -> f64 {
        rng.range(MIN_CAPACITY, MAX_CAPACITY + 1) as f64
    }

    fn initial_timer(&self, status: Status) -> Option<(TimerKind, u32)> {
        match status {
            Status::HighPerformer => Some((TimerKind::Engagement, ENGAGEMENT_STEPS)),
            _ => None,
        }
    }

    fn propose(&self, node: NodeId, view: &StepView<'_>, rng: &mut RngManager, out: &mut Vec<ProposedChange>) {
        let agent = view.agent(node);

        match agent.status() {
            Status::Neutral => {
                let remaining = agent.timer(TimerKind::Influence);
                if remaining > 0 {
                    out.push(ProposedChange::DecrementTimer {
                        node,
                        kind: TimerKind::Influence,
                    });
                    if remaining == 1 {
                        out.push(ProposedChange::Transition {
                            node,
                            to: Status::HighPerformer,
                            cause: TransitionCause::InfluenceMatured,
                        });
                    }
                }
            }
            Status::HighPerformer => {
                self.propose_influence(node, view, rng, out);

                let remaining = agent.timer(TimerKind::Engagement);
                if remaining > 0 {
                    out.push(ProposedChange::DecrementTimer {
                        node,
                        kind: TimerKind::Engagement,
                    });
                    if remaining == 1 {
                        let to = if rng.coin() {
                            Status::Engaged
                        } else {
                            Status::Disengaged
                        };
                        out.push(ProposedChange::Transition {
                            node,
                            to,
                            cause: TransitionCause::EngagementResolved,
                        });
                    }
                }
            }
            Status::Engaged | Status::Disengaged => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agent::Agent;
    use crate::topology::Graph;

    fn with_timer(mut agent: Agent, kind: TimerKind, value: u32) -> Agent {
        agent.set_timer(kind, value);
        agent
    }

    #[test]
    fn test_capacities_are_whole_steps() {
        let rule = TimerRule::new(0.5);
        let mut rng = RngManager::new(11);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let c = rule.draw_capacity(&mut rng);
            assert_eq!(c.fract(), 0.0);
            assert!((1.0..=3.0).contains(&c));
            seen[c as usize] = true;
        }
        assert!(seen[1] && seen[2] && seen[3]);
    }

    #[test]
    fn test_influence_skips_counting_down_neighbors() {
        let graph = Graph::from_edges(3, &[(0, 1), (0, 2)]);
        let agents = vec![
            Agent::new(0, Status::HighPerformer, 2.0),
            with_timer(Agent::new(1, Status::Neutral, 1.0), TimerKind::Influence, 2),
            Agent::new(2, Status::Neutral, 1.0),
        ];
        let view = StepView::new(1, &graph, &agents);
        let mut rng = RngManager::new(2);
        let mut out = Vec::new();

        TimerRule::new(1.0).propose(0, &view, &mut rng, &mut out);

        assert_eq!(
            out,
            vec![ProposedChange::StartInfluence {
                node: 2,
                influencer: 0,
                timer: 2,
            }]
        );
    }

    #[test]
    fn test_last_influence_step_matures() {
        let graph = Graph::from_edges(1, &[]);
        let agents = vec![with_timer(Agent::new(0, Status::Neutral, 1.0), TimerKind::Influence, 1)];
        let view = StepView::new(4, &graph, &agents);
        let mut out = Vec::new();

        TimerRule::new(0.5).propose(0, &view, &mut RngManager::new(1), &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(
            out[1],
            ProposedChange::Transition {
                node: 0,
                to: Status::HighPerformer,
                cause: TransitionCause::InfluenceMatured,
            }
        );
    }

    #[test]
    fn test_engagement_resolves_to_absorbing_status() {
        let graph = Graph::from_edges(1, &[]);
        let agents = vec![with_timer(
            Agent::new(0, Status::HighPerformer, 1.0),
            TimerKind::Engagement,
            1,
        )];
        let view = StepView::new(5, &graph, &agents);

        for seed in 1..20 {
            let mut out = Vec::new();
            TimerRule::new(0.5).propose(0, &view, &mut RngManager::new(seed), &mut out);
            match out.last() {
                Some(ProposedChange::Transition { to, .. }) => {
                    assert!(matches!(to, Status::Engaged | Status::Disengaged))
                }
                other => panic!("expected resolution, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_absorbing_statuses_propose_nothing() {
        let graph = Graph::from_edges(2, &[(0, 1)]);
        let agents = vec![Agent::new(0, Status::Engaged, 1.0), Agent::new(1, Status::Neutral, 1.0)];
        let view = StepView::new(1, &graph, &agents);
        let mut out = Vec::new();
        TimerRule::new(1.0).propose(0, &view, &mut RngManager::new(1), &mut out);
        assert!(out.is_empty());
    }
}
