//! Performance status vocabulary
//!
//! One closed enumeration covers every diffusion model. Each model declares
//! which subset it uses (see `InteractionRule::status_set`), and the agent
//! store rejects any status outside that subset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical performance state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Seed / influencer status
    HighPerformer,
    /// Default status of non-seed agents
    Neutral,
    /// Sustained performer (timer and threshold models)
    Engaged,
    /// Burnt out or dragged down
    Disengaged,
}

impl Status {
    /// Every status, in counter order
    pub const ALL: [Status; 4] = [
        Status::HighPerformer,
        Status::Neutral,
        Status::Engaged,
        Status::Disengaged,
    ];

    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::HighPerformer => "high_performer",
            Status::Neutral => "neutral",
            Status::Engaged => "engaged",
            Status::Disengaged => "disengaged",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// Number of agents per status
///
/// # Example
/// ```
/// use influence_simulator_core_rs::{Status, StatusCounts};
///
/// let counts = StatusCounts::from_statuses([Status::Neutral, Status::Neutral, Status::HighPerformer]);
/// assert_eq!(counts.get(Status::Neutral), 2);
/// assert_eq!(counts.total(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub high_performer: usize,
    pub neutral: usize,
    pub engaged: usize,
    pub disengaged: usize,
}

impl StatusCounts {
    /// Tally an iterator of statuses
    pub fn from_statuses<I: IntoIterator<Item = Status>>(statuses: I) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.increment(status);
        }
        counts
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::HighPerformer => self.high_performer,
            Status::Neutral => self.neutral,
            Status::Engaged => self.engaged,
            Status::Disengaged => self.disengaged,
        }
    }

    pub fn increment(&mut self, status: Status) {
        match status {
            Status::HighPerformer => self.high_performer += 1,
            Status::Neutral => self.neutral += 1,
            Status::Engaged => self.engaged += 1,
            Status::Disengaged => self.disengaged += 1,
        }
    }

    /// Sum over all statuses (equals the node count for a full tally)
    pub fn total(&self) -> usize {
        self.high_performer + self.neutral + self.engaged + self.disengaged
    }
}
