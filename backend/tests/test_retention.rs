//! Tests for RetentionPolicy and its place in the step loop

use influence_simulator_core_rs::{
    run, Agent, DiffusionModel, Orchestrator, RetentionPolicy, RngManager, SimulationConfig, SimulationError,
    ConfigError, Status, TopologyKind, TransitionCause, Event,
};

fn isolated_config(retention_rate: Option<f64>) -> SimulationConfig {
    // No edges: only retention can change anything
    SimulationConfig {
        node_count: 10,
        topology_kind: TopologyKind::RandomEdge,
        topology_param: 0.0,
        initial_seed_count: 10,
        base_influence_probability: 1.0,
        retention_rate,
        diffusion_model: DiffusionModel::SimpleProbabilistic,
        step_count: 3,
        rng_seed: 8,
    }
}

#[test]
fn test_zero_retention_demotes_every_high_performer() {
    let result = run(isolated_config(Some(0.0))).unwrap();
    let first = &result.history.entries()[0];
    assert_eq!(first.counts.high_performer, 0);
    assert_eq!(first.counts.disengaged, 10);
    assert_eq!(first.transitions.get(Status::HighPerformer, Status::Disengaged), 10);

    assert!(result.events.events().iter().all(|e| matches!(
        e,
        Event::StatusChanged {
            cause: TransitionCause::Retention,
            ..
        }
    )));
}

#[test]
fn test_full_retention_changes_nothing() {
    let result = run(isolated_config(Some(1.0))).unwrap();
    assert_eq!(result.history.series(Status::HighPerformer), vec![10, 10, 10]);
    assert!(result.events.is_empty());
}

#[test]
fn test_no_retention_rate_means_no_retention() {
    let result = run(isolated_config(None)).unwrap();
    assert_eq!(result.history.series(Status::HighPerformer), vec![10, 10, 10]);
}

#[test]
fn test_retention_only_touches_high_performers() {
    let policy = RetentionPolicy::new(0.0);
    let mut rng = RngManager::new(1);
    assert_eq!(policy.apply(&Agent::new(0, Status::Neutral, 1.0), &mut rng), None);
    assert_eq!(policy.apply(&Agent::new(0, Status::Disengaged, 1.0), &mut rng), None);
    assert_eq!(
        policy.apply(&Agent::new(0, Status::HighPerformer, 1.0), &mut rng),
        Some(Status::Disengaged)
    );
}

#[test]
fn test_threshold_model_rejects_retention() {
    let config = SimulationConfig {
        diffusion_model: DiffusionModel::ThresholdBased,
        ..isolated_config(Some(0.5))
    };
    assert_eq!(
        Orchestrator::new(config).unwrap_err(),
        SimulationError::InvalidConfig(ConfigError::RetentionUnsupported(DiffusionModel::ThresholdBased))
    );
}

#[test]
fn test_retention_rate_out_of_range_rejected() {
    assert!(matches!(
        Orchestrator::new(isolated_config(Some(1.2))),
        Err(SimulationError::InvalidConfig(ConfigError::ProbabilityOutOfRange {
            field: "retention_rate",
            ..
        }))
    ));
}
