//! Influence Simulator Core - Rust Engine
//!
//! Agent-based simulation of how a performance status spreads across a fixed
//! social graph, with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Step clock
//! - **topology**: Graph generators (preferential attachment, random edge)
//! - **models**: Domain types (Agent, Status, AgentStore, Event)
//! - **rules**: Interaction rules (simple, timer, threshold) and retention
//! - **metrics**: Per-step counts, transition counts, smoothing
//! - **orchestrator**: Configuration and the main step loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (one seeded RNG per run)
//! 2. Status counts always sum to the node count
//! 3. Rules read a snapshot; only the orchestrator mutates agents
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod core;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod rules;
pub mod topology;

// Re-exports for convenience
pub use core::time::StepClock;
pub use metrics::{moving_average, moving_average_counts, MetricsHistory, MetricsRecorder, StepMetrics, TransitionCounts};
pub use models::{
    agent::{Agent, AgentError, TimerKind},
    event::{Event, EventLog, TransitionCause},
    state::AgentStore,
    status::{Status, StatusCounts},
};
pub use orchestrator::{
    run, run_with_observer, ConfigError, Orchestrator, SimulationConfig, SimulationError, SimulationResult,
    StepResult, StepSnapshot,
};
pub use rng::RngManager;
pub use rules::{DiffusionModel, InteractionRule, RetentionPolicy};
pub use topology::{Graph, NodeId, TopologyBuilder, TopologyKind};

// FFI module (when feature enabled)
#[cfg(feature = "python")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn influence_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::orchestrator::PySimulation>()?;
    m.add_function(wrap_pyfunction!(ffi::orchestrator::moving_average, m)?)?;
    Ok(())
}
