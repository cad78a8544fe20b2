//! PyO3 wrapper for Orchestrator
//!
//! This module provides the Python interface to the simulation engine.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{history_to_py, parse_simulation_config, step_result_to_py};
use crate::metrics::smoothing;
use crate::orchestrator::{Orchestrator as RustOrchestrator, SimulationError};

fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::InvalidConfig(e) => PyValueError::new_err(e.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Python wrapper for Rust Orchestrator
///
/// # Example (from Python)
///
/// ```python
/// from influence_simulator_core_rs import Simulation, moving_average
///
/// sim = Simulation.new({
///     "node_count": 100,
///     "topology_kind": "preferential_attachment",
///     "topology_param": 3,
///     "initial_seed_count": 3,
///     "base_influence_probability": 0.5,
///     "retention_rate": 0.7,
///     "diffusion_model": "simple_probabilistic",
///     "step_count": 50,
///     "rng_seed": 12345,
/// })
/// for result in sim.run():
///     print(result["step"], result["counts"]["high_performer"])
///
/// smoothed = moving_average(sim.history()["high_performer"], 10)
/// ```
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: RustOrchestrator,
}

#[pymethods]
impl PySimulation {
    /// Create a new simulation from a configuration dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if a required field is missing or any value is out
    /// of range
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;
        let inner = RustOrchestrator::new(rust_config).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    /// Execute one step and return its result dict
    ///
    /// Raises RuntimeError once every configured step has run.
    fn step(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let result = self.inner.step().map_err(to_py_err)?;
        step_result_to_py(py, &result)
    }

    /// Execute every remaining step
    fn run(&mut self, py: Python<'_>) -> PyResult<Py<PyList>> {
        let results = self.inner.run().map_err(to_py_err)?;
        let list = PyList::empty(py);
        for result in &results {
            list.append(step_result_to_py(py, result)?)?;
        }
        Ok(list.unbind())
    }

    fn current_step(&self) -> usize {
        self.inner.current_step()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Status name of every node, by id
    fn statuses(&self) -> Vec<&'static str> {
        self.inner.statuses().iter().map(|s| s.as_str()).collect()
    }

    /// Influence capacity of every node (for node sizing)
    fn capacities(&self) -> Vec<f64> {
        self.inner.capacities()
    }

    /// Every undirected edge once, as `(a, b)` with `a < b`
    fn edges(&self) -> Vec<(usize, usize)> {
        self.inner.graph().edges()
    }

    fn history(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        history_to_py(py, self.inner.history())
    }
}

/// Moving average over full windows; short series come back unchanged
#[pyfunction]
pub fn moving_average(data: Vec<f64>, window: usize) -> PyResult<Vec<f64>> {
    smoothing::moving_average(&data, window).map_err(|e| PyValueError::new_err(e.to_string()))
}
