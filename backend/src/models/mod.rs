//! Domain models for the influence simulator

pub mod agent;
pub mod event;
pub mod state;
pub mod status;

// Re-exports
pub use agent::{Agent, AgentError, TimerKind};
pub use event::{Event, EventLog, TransitionCause};
pub use state::AgentStore;
pub use status::{Status, StatusCounts};
