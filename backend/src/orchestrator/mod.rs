//! Orchestrator - main simulation loop
//!
//! Validated configuration in, step results and a final `SimulationResult`
//! out. See `engine.rs` for the step loop.

pub mod config;
pub mod engine;


// Re-export main types for convenience
pub use config::{ConfigError, SimulationConfig};
pub use engine::{
    run, run_with_observer, Orchestrator, SimulationError, SimulationResult, StepResult, StepSnapshot,
};
