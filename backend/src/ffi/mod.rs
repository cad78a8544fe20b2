//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings for the presentation layer (dashboards, notebooks).
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: Only expose what a renderer needs
//! 2. **Simple types**: Primitives, strings, lists and dicts at the boundary
//! 3. **Validate inputs**: The config dict is fully validated before any step
//! 4. **Safe errors**: Every Rust error becomes a Python exception
//! 5. **No references**: Python gets copies, never references to Rust state

pub mod orchestrator;
pub mod types;
