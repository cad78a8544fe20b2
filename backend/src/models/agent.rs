//! Agent (employee) model
//!
//! One agent per graph node. Each agent has:
//! - a performance status
//! - an influence capacity drawn once at initialization
//! - two countdown timers used only by the timer-based model
//!
//! Mutators are crate-private: every change goes through `AgentStore`, which
//! checks status membership and timer bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::status::Status;
use crate::topology::NodeId;

/// Errors raised by agent store operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AgentError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("status {status} is not part of the configured status set (node {node})")]
    StatusNotAllowed { node: NodeId, status: Status },

    #[error("{kind} timer of node {node} is already zero")]
    TimerUnderflow { node: NodeId, kind: TimerKind },
}

/// Countdown timers of the timer-based model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Steps until an influenced neutral agent becomes a high performer
    Influence,
    /// Steps until a high performer settles as engaged or disengaged
    Engagement,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Influence => f.write_str("influence"),
            TimerKind::Engagement => f.write_str("engagement"),
        }
    }
}

/// Per-node simulation state
///
/// # Example
/// ```
/// use influence_simulator_core_rs::{Agent, Status, TimerKind};
///
/// let agent = Agent::new(7, Status::Neutral, 1.2);
/// assert_eq!(agent.id(), 7);
/// assert_eq!(agent.status(), Status::Neutral);
/// assert_eq!(agent.timer(TimerKind::Influence), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Node id, never reassigned
    id: NodeId,

    status: Status,

    /// Susceptibility / strength factor (> 0), constant for the run
    influence_capacity: f64,

    influence_timer: u32,

    engagement_timer: u32,
}

impl Agent {
    /// Create an agent with zeroed timers
    ///
    /// # Panics
    /// Panics if `influence_capacity` is not a positive finite number
    pub fn new(id: NodeId, status: Status, influence_capacity: f64) -> Self {
        assert!(
            influence_capacity.is_finite() && influence_capacity > 0.0,
            "influence_capacity must be positive"
        );
        Self {
            id,
            status,
            influence_capacity,
            influence_timer: 0,
            engagement_timer: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is(&self, status: Status) -> bool {
        self.status == status
    }

    pub fn influence_capacity(&self) -> f64 {
        self.influence_capacity
    }

    pub fn timer(&self, kind: TimerKind) -> u32 {
        match kind {
            TimerKind::Influence => self.influence_timer,
            TimerKind::Engagement => self.engagement_timer,
        }
    }

    /// Switch status, returning the previous one
    ///
    /// Leaving `Neutral` drops any pending influence; leaving `HighPerformer`
    /// drops the engagement countdown.
    pub(crate) fn set_status(&mut self, status: Status) -> Status {
        let previous = self.status;
        if previous != status {
            match previous {
                Status::Neutral => self.influence_timer = 0,
                Status::HighPerformer => self.engagement_timer = 0,
                _ => {}
            }
        }
        self.status = status;
        previous
    }

    pub(crate) fn set_timer(&mut self, kind: TimerKind, value: u32) {
        match kind {
            TimerKind::Influence => self.influence_timer = value,
            TimerKind::Engagement => self.engagement_timer = value,
        }
    }

    /// Count a timer down by one, returning the new value
    pub(crate) fn decrement_timer(&mut self, kind: TimerKind) -> Result<u32, AgentError> {
        let timer = match kind {
            TimerKind::Influence => &mut self.influence_timer,
            TimerKind::Engagement => &mut self.engagement_timer,
        };
        if *timer == 0 {
            return Err(AgentError::TimerUnderflow { node: self.id, kind });
        }
        *timer -= 1;
        Ok(*timer)
    }
}
