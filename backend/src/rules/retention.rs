//! Retention policy
//!
//! After interactions are committed, every high performer is kept with
//! probability `retention_rate` and otherwise demoted to disengaged. Other
//! statuses are untouched and consume no draw.

use crate::models::agent::Agent;
use crate::models::status::Status;
use crate::rng::RngManager;

/// Stochastic demotion of high performers
///
/// # Example
///
/// ```
/// use influence_simulator_core_rs::{Agent, RetentionPolicy, RngManager, Status};
///
/// let policy = RetentionPolicy::new(0.0);
/// let agent = Agent::new(0, Status::HighPerformer, 1.0);
/// let mut rng = RngManager::new(4);
///
/// assert_eq!(policy.apply(&agent, &mut rng), Some(Status::Disengaged));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionPolicy {
    retention_rate: f64,
}

impl RetentionPolicy {
    /// `retention_rate` must already be validated into `[0, 1]`
    pub fn new(retention_rate: f64) -> Self {
        Self { retention_rate }
    }

    pub fn retention_rate(&self) -> f64 {
        self.retention_rate
    }

    /// Status `agent` is demoted to, if any
    pub fn apply(&self, agent: &Agent, rng: &mut RngManager) -> Option<Status> {
        if !agent.is(Status::HighPerformer) {
            return None;
        }
        if rng.chance(self.retention_rate) {
            None
        } else {
            Some(Status::Disengaged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_retention_keeps_everyone() {
        let policy = RetentionPolicy::new(1.0);
        let agent = Agent::new(0, Status::HighPerformer, 1.0);
        let mut rng = RngManager::new(99);
        for _ in 0..200 {
            assert_eq!(policy.apply(&agent, &mut rng), None);
        }
    }

    #[test]
    fn test_only_high_performers_draw() {
        let policy = RetentionPolicy::new(0.0);
        let mut rng = RngManager::new(5);
        let state = rng.get_state();
        for status in [Status::Neutral, Status::Engaged, Status::Disengaged] {
            assert_eq!(policy.apply(&Agent::new(0, status, 1.0), &mut rng), None);
        }
        assert_eq!(rng.get_state(), state);
    }

    #[test]
    fn test_demotion_rate_tracks_retention() {
        let policy = RetentionPolicy::new(0.7);
        let agent = Agent::new(0, Status::HighPerformer, 1.0);
        let mut rng = RngManager::new(2024);
        let demoted = (0..10_000)
            .filter(|_| policy.apply(&agent, &mut rng).is_some())
            .count();
        assert!((2_700..3_300).contains(&demoted), "demoted {}", demoted);
    }
}
