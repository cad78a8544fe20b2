//! Event logging for simulation replay and auditing.
//!
//! Every committed change is recorded, in commit order:
//! - **StatusChanged**: a node moved from one status to another
//! - **InfluenceStarted**: a neutral node began counting down to high performer
//! - **ProposalSuperseded**: a proposal lost to a competing claim on the same node
//!
//! Every `StatusChanged` event has a matching `(from, to)` pair in the step's
//! transition counts; the orchestrator collects both from the same commit.
//!
//! # Example
//!
//! ```rust
//! use influence_simulator_core_rs::models::{Event, EventLog, TransitionCause};
//! use influence_simulator_core_rs::Status;
//!
//! let mut log = EventLog::new();
//! log.log(Event::StatusChanged {
//!     step: 3,
//!     node: 12,
//!     from: Status::Neutral,
//!     to: Status::HighPerformer,
//!     cause: TransitionCause::Influence,
//! });
//!
//! assert_eq!(log.events_at_step(3).len(), 1);
//! ```

use serde::Serialize;
use std::fmt;

use crate::models::status::Status;
use crate::topology::NodeId;

/// Which rule produced a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// High performer converted a neutral neighbor
    Influence,
    /// High performer pulled a disengaged neighbor back to neutral
    Rescue,
    /// Disengaged neighbor dragged a neutral agent down
    Drag,
    /// Influence timer ran out
    InfluenceMatured,
    /// Engagement timer ran out and the coin was tossed
    EngagementResolved,
    /// Neighbor majority crossed the threshold
    ThresholdShift,
    /// High performer not retained
    Retention,
}

impl fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionCause::Influence => "influence",
            TransitionCause::Rescue => "rescue",
            TransitionCause::Drag => "drag",
            TransitionCause::InfluenceMatured => "influence_matured",
            TransitionCause::EngagementResolved => "engagement_resolved",
            TransitionCause::ThresholdShift => "threshold_shift",
            TransitionCause::Retention => "retention",
        };
        f.write_str(name)
    }
}

/// Simulation event capturing a committed change.
///
/// All events carry the step they were committed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StatusChanged {
        step: usize,
        node: NodeId,
        from: Status,
        to: Status,
        cause: TransitionCause,
    },

    /// Timer model: `node` will become a high performer after `timer` steps
    InfluenceStarted {
        step: usize,
        node: NodeId,
        influencer: NodeId,
        timer: u32,
    },

    /// A status claim discarded because `node` was already claimed this step
    ProposalSuperseded {
        step: usize,
        node: NodeId,
        /// Status the discarded proposal asked for (`Neutral` for an influence start)
        proposed: Status,
    },
}

impl Event {
    /// Step in which this event was committed
    pub fn step(&self) -> usize {
        match self {
            Event::StatusChanged { step, .. } => *step,
            Event::InfluenceStarted { step, .. } => *step,
            Event::ProposalSuperseded { step, .. } => *step,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::StatusChanged { .. } => "StatusChanged",
            Event::InfluenceStarted { .. } => "InfluenceStarted",
            Event::ProposalSuperseded { .. } => "ProposalSuperseded",
        }
    }

    /// Node whose state the event concerns
    pub fn node(&self) -> NodeId {
        match self {
            Event::StatusChanged { node, .. } => *node,
            Event::InfluenceStarted { node, .. } => *node,
            Event::ProposalSuperseded { node, .. } => *node,
        }
    }

    /// `(from, to)` for status changes
    pub fn transition(&self) -> Option<(Status, Status)> {
        match self {
            Event::StatusChanged { from, to, .. } => Some((*from, *to)),
            _ => None,
        }
    }
}

/// Event log for storing simulation events.
///
/// A thin wrapper around `Vec<Event>` with query helpers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in commit order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_step(&self, step: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.step() == step).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_node(&self, node: NodeId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.node() == node).collect()
    }

    /// `(from, to)` of every status change committed in `step`
    pub fn transitions_at_step(&self, step: usize) -> Vec<(Status, Status)> {
        self.events
            .iter()
            .filter(|e| e.step() == step)
            .filter_map(Event::transition)
            .collect()
    }
}
