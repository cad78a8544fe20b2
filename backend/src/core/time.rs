//! Step clock for the simulation
//!
//! The simulation advances in abstract discrete steps. There is no calendar
//! time; the only bound is the caller-supplied step count.

use serde::{Deserialize, Serialize};

/// Counts elapsed steps against a hard upper bound
///
/// # Example
/// ```
/// use influence_simulator_core_rs::StepClock;
///
/// let mut clock = StepClock::new(3);
/// assert_eq!(clock.current_step(), 0);
/// assert_eq!(clock.next_step(), Some(1));
///
/// clock.advance();
/// clock.advance();
/// clock.advance();
/// assert!(clock.is_finished());
/// assert_eq!(clock.next_step(), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepClock {
    /// Steps fully committed so far
    current_step: usize,
    /// Total steps the run may execute
    total_steps: usize,
}

impl StepClock {
    /// Create a clock bounded at `total_steps` (zero is a valid, empty run)
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 0,
            total_steps,
        }
    }

    /// Number of steps committed so far (0 before the first step)
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Index of the step that would run next, or `None` once the bound is hit
    pub fn next_step(&self) -> Option<usize> {
        if self.is_finished() {
            None
        } else {
            Some(self.current_step + 1)
        }
    }

    /// Mark one more step as committed
    ///
    /// # Panics
    /// Panics if the clock is already finished
    pub fn advance(&mut self) {
        assert!(!self.is_finished(), "step clock already finished");
        self.current_step += 1;
    }

    /// True once `total_steps` steps have been committed
    pub fn is_finished(&self) -> bool {
        self.current_step >= self.total_steps
    }

    /// Steps still to run
    pub fn remaining(&self) -> usize {
        self.total_steps - self.current_step
    }

    /// Configured bound
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_step_clock_is_finished() {
        let clock = StepClock::new(0);
        assert!(clock.is_finished());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut clock = StepClock::new(5);
        clock.advance();
        clock.advance();
        assert_eq!(clock.remaining(), 3);
        assert_eq!(clock.next_step(), Some(3));
    }

    #[test]
    #[should_panic(expected = "step clock already finished")]
    fn test_advance_past_bound_panics() {
        let mut clock = StepClock::new(1);
        clock.advance();
        clock.advance();
    }
}
