//! Per-step metrics
//!
//! The recorder keeps two typed series, one entry per elapsed step:
//! - **counts**: how many agents hold each status after the step
//! - **transitions**: how many committed `from -> to` changes the step made
//!
//! plus the baseline counts at step 0 (after seeding, before any step).
//! Entries are append-only; nothing already recorded is ever rewritten.

pub mod smoothing;

pub use smoothing::{moving_average, moving_average_counts, DEFAULT_WINDOW};

use serde::Serialize;

use crate::models::state::AgentStore;
use crate::models::status::{Status, StatusCounts};

/// Number of committed changes for one `from -> to` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionCount {
    pub from: Status,
    pub to: Status,
    pub count: usize,
}

/// Committed status changes, sorted by `(from, to)`, zero pairs omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransitionCounts {
    entries: Vec<TransitionCount>,
}

impl TransitionCounts {
    /// Tally `(from, to)` pairs
    pub fn from_pairs<I: IntoIterator<Item = (Status, Status)>>(pairs: I) -> Self {
        let mut counts = Self::default();
        for (from, to) in pairs {
            counts.add(from, to, 1);
        }
        counts
    }

    fn add(&mut self, from: Status, to: Status, count: usize) {
        if count == 0 {
            return;
        }
        match self.entries.binary_search_by(|e| (e.from, e.to).cmp(&(from, to))) {
            Ok(index) => self.entries[index].count += count,
            Err(index) => self.entries.insert(index, TransitionCount { from, to, count }),
        }
    }

    pub fn get(&self, from: Status, to: Status) -> usize {
        self.entries
            .iter()
            .find(|e| e.from == from && e.to == to)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionCount> {
        self.entries.iter()
    }

    /// Element-wise sum
    pub fn merge(&mut self, other: &TransitionCounts) {
        for entry in &other.entries {
            self.add(entry.from, entry.to, entry.count);
        }
    }
}

/// Metrics of one elapsed step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepMetrics {
    pub step: usize,
    pub counts: StatusCounts,
    pub transitions: TransitionCounts,
}

/// Baseline plus one entry per elapsed step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsHistory {
    baseline: StatusCounts,
    entries: Vec<StepMetrics>,
}

impl MetricsHistory {
    /// Counts at step 0
    pub fn baseline(&self) -> StatusCounts {
        self.baseline
    }

    pub fn entries(&self) -> &[StepMetrics] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&StepMetrics> {
        self.entries.last()
    }

    /// Count of `status` after each step
    pub fn series(&self, status: Status) -> Vec<usize> {
        self.entries.iter().map(|e| e.counts.get(status)).collect()
    }

    /// Number of `from -> to` changes in each step
    pub fn transition_series(&self, from: Status, to: Status) -> Vec<usize> {
        self.entries.iter().map(|e| e.transitions.get(from, to)).collect()
    }

    /// Changes summed over every step
    pub fn transition_totals(&self) -> TransitionCounts {
        let mut totals = TransitionCounts::default();
        for entry in &self.entries {
            totals.merge(&entry.transitions);
        }
        totals
    }
}

/// Appends one `StepMetrics` per step
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::metrics::{MetricsRecorder, TransitionCounts};
/// use influence_simulator_core_rs::{Agent, AgentStore, Graph, Status};
///
/// let graph = Graph::from_edges(2, &[(0, 1)]);
/// let agents = vec![
///     Agent::new(0, Status::HighPerformer, 1.0),
///     Agent::new(1, Status::HighPerformer, 1.0),
/// ];
/// let statuses = &[Status::HighPerformer, Status::Neutral, Status::Disengaged];
/// let store = AgentStore::new(graph, agents, statuses).unwrap();
///
/// let mut recorder = MetricsRecorder::new(store.counts());
/// let transitions = TransitionCounts::from_pairs([(Status::Neutral, Status::HighPerformer)]);
/// recorder.record(1, &store, transitions);
///
/// assert_eq!(recorder.history().series(Status::HighPerformer), vec![2]);
/// ```
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    history: MetricsHistory,
}

impl MetricsRecorder {
    pub fn new(baseline: StatusCounts) -> Self {
        Self {
            history: MetricsHistory {
                baseline,
                entries: Vec::new(),
            },
        }
    }

    /// Append the metrics of `step`
    pub fn record(&mut self, step: usize, store: &AgentStore, transitions: TransitionCounts) -> &StepMetrics {
        debug_assert!(
            self.history.latest().map_or(true, |last| last.step < step),
            "steps must be recorded in increasing order"
        );
        self.history.entries.push(StepMetrics {
            step,
            counts: store.counts(),
            transitions,
        });
        &self.history.entries[self.history.entries.len() - 1]
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn into_history(self) -> MetricsHistory {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_counts_sorted_and_merged() {
        use Status::*;
        let mut counts = TransitionCounts::from_pairs([
            (Neutral, HighPerformer),
            (HighPerformer, Disengaged),
            (Neutral, HighPerformer),
        ]);
        assert_eq!(counts.get(Neutral, HighPerformer), 2);
        assert_eq!(counts.get(Neutral, Disengaged), 0);
        assert_eq!(counts.total(), 3);

        let pairs: Vec<_> = counts.iter().map(|e| (e.from, e.to)).collect();
        assert_eq!(pairs, vec![(HighPerformer, Disengaged), (Neutral, HighPerformer)]);

        counts.merge(&TransitionCounts::from_pairs([(HighPerformer, Disengaged)]));
        assert_eq!(counts.get(HighPerformer, Disengaged), 2);
    }

    #[test]
    fn test_history_series() {
        let mut recorder = MetricsRecorder::new(StatusCounts {
            high_performer: 1,
            neutral: 2,
            ..StatusCounts::default()
        });
        let store = {
            use crate::models::agent::Agent;
            use crate::topology::Graph;
            let agents = vec![
                Agent::new(0, Status::HighPerformer, 1.0),
                Agent::new(1, Status::HighPerformer, 1.0),
                Agent::new(2, Status::Neutral, 1.0),
            ];
            AgentStore::new(Graph::from_edges(3, &[]), agents, crate::rules::FOUR_STATUS).unwrap()
        };

        recorder.record(1, &store, TransitionCounts::from_pairs([(Status::Neutral, Status::HighPerformer)]));
        recorder.record(2, &store, TransitionCounts::default());

        let history = recorder.history();
        assert_eq!(history.baseline().high_performer, 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.series(Status::HighPerformer), vec![2, 2]);
        assert_eq!(
            history.transition_series(Status::Neutral, Status::HighPerformer),
            vec![1, 0]
        );
        assert_eq!(history.transition_totals().total(), 1);
    }

    #[test]
    fn test_transition_counts_serialize_as_list() {
        let counts = TransitionCounts::from_pairs([(Status::Neutral, Status::Disengaged)]);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json[0]["from"], "neutral");
        assert_eq!(json[0]["count"], 1);
    }
}
