//! Threshold-based model
//!
//! Four statuses, no timers, no retention. A node looks only at its own
//! neighbors and moves when strictly more than half of them share a status:
//!
//! | status | neighbor majority | result |
//! |---|---|---|
//! | Neutral | high performers | HighPerformer, probability `base / cap(self)` |
//! | Neutral | disengaged | Disengaged, probability `base × 0.3` |
//! | HighPerformer | high performers or engaged | Engaged |
//! | HighPerformer | disengaged | Disengaged |
//! | Disengaged | high performers | Engaged |
//! | Engaged | disengaged | Disengaged |
//!
//! Isolated nodes never change. Capacities are uniform in `[0.5, 1.5)`.

use super::simple::DRAG_FACTOR;
use super::{InteractionRule, ProposedChange, StepView, FOUR_STATUS};
use crate::models::event::TransitionCause;
use crate::models::status::Status;
use crate::rng::RngManager;
use crate::topology::NodeId;

/// Nodes follow a strict majority of their neighbors
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    base_probability: f64,
}

impl ThresholdRule {
    pub fn new(base_probability: f64) -> Self {
        Self { base_probability }
    }

    /// Target status for `node`, drawing where the move is probabilistic
    fn next_status(&self, node: NodeId, view: &StepView<'_>, rng: &mut RngManager) -> Option<Status> {
        let agent = view.agent(node);
        let mix = view.neighbor_mix(node);
        if mix.total() == 0 {
            return None;
        }

        match agent.status() {
            Status::Neutral => {
                if mix.majority(&[Status::HighPerformer]) {
                    let p = self.base_probability / agent.influence_capacity();
                    rng.chance(p).then_some(Status::HighPerformer)
                } else if mix.majority(&[Status::Disengaged]) {
                    rng.chance(self.base_probability * DRAG_FACTOR)
                        .then_some(Status::Disengaged)
                } else {
                    None
                }
            }
            Status::HighPerformer => {
                if mix.majority(&[Status::HighPerformer, Status::Engaged]) {
                    Some(Status::Engaged)
                } else if mix.majority(&[Status::Disengaged]) {
                    Some(Status::Disengaged)
                } else {
                    None
                }
            }
            Status::Disengaged => mix
                .majority(&[Status::HighPerformer])
                .then_some(Status::Engaged),
            Status::Engaged => mix
                .majority(&[Status::Disengaged])
                .then_some(Status::Disengaged),
        }
    }
}

impl InteractionRule for ThresholdRule {
    fn status_set(&self) -> &'static [Status] {
        FOUR_STATUS
    }

    fn draw_capacity(&self, rng: &mut RngManager) -> f64 {
        rng.uniform(0.5, 1.5)
    }

    fn propose(&self, node: NodeId, view: &StepView<'_>, rng: &mut RngManager, out: &mut Vec<ProposedChange>) {
        if let Some(to) = self.next_status(node, view, rng) {
            out.push(ProposedChange::Transition {
                node,
                to,
                cause: TransitionCause::ThresholdShift,
            });
        }
    }
}
