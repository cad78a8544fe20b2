//! Integration tests for the Orchestrator step loop
//!
//! These tests drive complete runs through the public API: configuration
//! validation, the step bound, observers, metrics and the event log.

use influence_simulator_core_rs::{
    run, run_with_observer, ConfigError, DiffusionModel, Orchestrator, SimulationConfig, SimulationError,
    SimulationResult, Status, StepSnapshot, TopologyKind, TransitionCounts,
};

/// The 20-node scenario: random edge graph, two seeds, certain influence
fn scenario_config() -> SimulationConfig {
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

fn assert_series(result: &SimulationResult, expected: [(Status, &[usize]); 4]) {
    for (status, series) in expected {
        assert_eq!(result.history.series(status), series, "{} series", status);
    }
}

#[test]
fn test_scenario_is_reproducible_and_conserves_counts() {
    let first = run(scenario_config()).unwrap();
    let second = run(scenario_config()).unwrap();

    assert_eq!(first.history, second.history);
    assert_eq!(first.history.len(), 5);
    for entry in first.history.entries() {
        assert_eq!(entry.counts.total(), 20);
    }
}

#[test]
fn test_scenario_pinned_counts() {
    let result = run(scenario_config()).unwrap();

    assert_eq!(result.graph.edge_count(), 45);
    assert!(result.graph.isolated_nodes().is_empty());
    assert_eq!(result.history.baseline().high_performer, 2);
    assert_eq!(result.history.baseline().neutral, 18);

    assert_series(
        &result,
        [
            (Status::HighPerformer, &[7, 17, 20, 20, 20]),
            (Status::Neutral, &[13, 3, 0, 0, 0]),
            (Status::Engaged, &[0, 0, 0, 0, 0]),
            (Status::Disengaged, &[0, 0, 0, 0, 0]),
        ],
    );
    assert_eq!(result.statuses, vec![Status::HighPerformer; 20]);
    assert_eq!(
        result.history.transition_totals().get(Status::Neutral, Status::HighPerformer),
        18
    );
    assert_eq!(result.history.transition_totals().total(), 18);
}

#[test]
fn test_timer_scenario_pinned_counts() {
    let config = SimulationConfig {
        diffusion_model: DiffusionModel::TimerBased,
        retention_rate: Some(0.9),
        step_count: 10,
        ..scenario_config()
    };
    let result = run(config).unwrap();

    assert_series(
        &result,
        [
            (Status::HighPerformer, &[1, 1, 5, 6, 5, 6, 11, 9, 8, 11]),
            (Status::Neutral, &[18, 18, 14, 13, 13, 11, 6, 5, 4, 1]),
            (Status::Engaged, &[0, 0, 0, 0, 1, 1, 1, 4, 5, 5]),
            (Status::Disengaged, &[1, 1, 1, 1, 1, 2, 2, 2, 3, 3]),
        ],
    );

    let totals = result.history.transition_totals();
    assert_eq!(totals.get(Status::Neutral, Status::HighPerformer), 17);
    assert_eq!(totals.get(Status::HighPerformer, Status::Engaged), 5);
    assert_eq!(totals.get(Status::HighPerformer, Status::Disengaged), 3);
    assert_eq!(totals.total(), 25);
}

#[test]
fn test_threshold_scenario_pinned_counts() {
    let config = SimulationConfig {
        topology_kind: TopologyKind::PreferentialAttachment,
        topology_param: 2.0,
        initial_seed_count: 6,
        diffusion_model: DiffusionModel::ThresholdBased,
        step_count: 6,
        ..scenario_config()
    };
    let result = run(config).unwrap();

    assert_eq!(result.graph.edge_count(), 36);
    assert_eq!(result.history.baseline().high_performer, 6);
    assert_series(
        &result,
        [
            (Status::HighPerformer, &[7, 4, 1, 1, 1, 1]),
            (Status::Neutral, &[11, 9, 9, 9, 9, 9]),
            (Status::Engaged, &[2, 7, 10, 10, 10, 10]),
            (Status::Disengaged, &[0, 0, 0, 0, 0, 0]),
        ],
    );

    let totals = result.history.transition_totals();
    assert_eq!(totals.get(Status::Neutral, Status::HighPerformer), 5);
    assert_eq!(totals.get(Status::HighPerformer, Status::Engaged), 10);
    assert_eq!(totals.total(), 15);
}

#[test]
fn test_scenario_high_performers_never_shrink_without_retention() {
    // No disengaged agents exist and nothing demotes, so influence only grows
    let result = run(scenario_config()).unwrap();
    let series = result.history.series(Status::HighPerformer);
    assert!(series.windows(2).all(|w| w[0] <= w[1]), "{:?}", series);
    assert!(series[0] >= 2);
}

#[test]
fn test_influence_stays_inside_seed_components() {
    // Without retention nobody disengages, so a node outside every seed's
    // component has no way to change
    let config = SimulationConfig {
        step_count: 20,
        ..scenario_config()
    };
    let orchestrator = Orchestrator::new(config.clone()).unwrap();
    let seeds: Vec<usize> = orchestrator
        .statuses()
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == Status::HighPerformer)
        .map(|(i, _)| i)
        .collect();

    let result = run(config).unwrap();
    let graph = &result.graph;

    let mut reached = vec![false; graph.node_count()];
    let mut frontier = seeds.clone();
    for &s in &seeds {
        reached[s] = true;
    }
    while let Some(node) = frontier.pop() {
        for next in graph.neighbors(node) {
            if !reached[next] {
                reached[next] = true;
                frontier.push(next);
            }
        }
    }

    for (node, status) in result.statuses.iter().enumerate() {
        if reached[node] {
            assert!(matches!(status, Status::HighPerformer | Status::Neutral), "node {}", node);
        } else {
            assert_eq!(*status, Status::Neutral, "node {}", node);
        }
    }
}

#[test]
fn test_all_seeds_is_valid() {
    let config = SimulationConfig {
        initial_seed_count: 20,
        ..scenario_config()
    };
    let orchestrator = Orchestrator::new(config).unwrap();
    assert_eq!(orchestrator.history().baseline().high_performer, 20);
}

#[test]
fn test_too_many_seeds_is_invalid() {
    let config = SimulationConfig {
        initial_seed_count: 21,
        ..scenario_config()
    };
    assert_eq!(
        Orchestrator::new(config).unwrap_err(),
        SimulationError::InvalidConfig(ConfigError::SeedCount {
            requested: 21,
            node_count: 20
        })
    );
}

#[test]
fn test_step_limit() {
    let mut orchestrator = Orchestrator::new(scenario_config()).unwrap();
    let results = orchestrator.run().unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results.iter().map(|r| r.step).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert!(orchestrator.is_finished());
    assert!(matches!(
        orchestrator.step(),
        Err(SimulationError::StepLimitReached { step_count: 5 })
    ));
    // A finished run has nothing left to do
    assert!(orchestrator.run().unwrap().is_empty());
}

#[test]
fn test_observer_sees_every_step_in_order() {
    let mut seen: Vec<StepSnapshot> = Vec::new();
    let result = run_with_observer(scenario_config(), |snapshot| seen.push(snapshot.clone())).unwrap();

    assert_eq!(seen.len(), 5);
    for (snapshot, entry) in seen.iter().zip(result.history.entries()) {
        assert_eq!(snapshot.step, entry.step);
        assert_eq!(snapshot.counts, entry.counts);
        assert_eq!(snapshot.statuses.len(), 20);
    }
    assert_eq!(seen.last().unwrap().statuses, result.statuses);
}

#[test]
fn test_step_results_match_history() {
    let mut orchestrator = Orchestrator::new(SimulationConfig {
        retention_rate: Some(0.6),
        ..scenario_config()
    })
    .unwrap();
    let results = orchestrator.run().unwrap();

    for (result, entry) in results.iter().zip(orchestrator.history().entries()) {
        assert_eq!(result.counts, entry.counts);
        assert_eq!(result.transitions, entry.transitions);
        let logged = TransitionCounts::from_pairs(orchestrator.event_log().transitions_at_step(result.step));
        assert_eq!(result.transitions, logged);
    }
}

#[test]
fn test_history_counts_follow_transitions() {
    // counts(t) = counts(t - 1) + incoming(t) - outgoing(t)
    let result = run(SimulationConfig::default()).unwrap();
    let mut previous = result.history.baseline();
    for entry in result.history.entries() {
        for status in Status::ALL {
            let incoming: usize = entry.transitions.iter().filter(|t| t.to == status).map(|t| t.count).sum();
            let outgoing: usize = entry.transitions.iter().filter(|t| t.from == status).map(|t| t.count).sum();
            assert_eq!(
                entry.counts.get(status) + outgoing,
                previous.get(status) + incoming,
                "step {} status {}",
                entry.step,
                status
            );
        }
        previous = entry.counts;
    }
}

#[test]
fn test_result_exposes_capacities_and_edges() {
    let result = run(SimulationConfig::default()).unwrap();
    assert_eq!(result.capacities.len(), 100);
    assert!(result.capacities.iter().all(|&c| (0.5..1.5).contains(&c)));
    assert_eq!(result.graph.edges().len(), result.graph.edge_count());
}

#[test]
fn test_config_from_json_drives_a_run() {
    let json = r#"{
        "node_count": 40,
        "topology_kind": "random_edge",
        "topology_param": 0.1,
        "initial_seed_count": 4,
        "base_influence_probability": 0.7,
        "diffusion_model": "threshold_based",
        "step_count": 8,
        "rng_seed": 3
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();
    let result = run(config).unwrap();
    assert_eq!(result.history.len(), 8);
}
