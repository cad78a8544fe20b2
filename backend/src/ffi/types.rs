//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList, etc.)

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::metrics::{MetricsHistory, TransitionCounts};
use crate::models::status::{Status, StatusCounts};
use crate::orchestrator::{SimulationConfig, StepResult};
use crate::rules::DiffusionModel;
use crate::topology::TopologyKind;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing or has the wrong type
fn extract_required<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    let value = dict
        .get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?;
    value
        .extract()
        .map_err(|e| PyValueError::new_err(format!("Invalid value for '{}': {}", key, e)))
}

/// Extract an optional field; a missing key and Python `None` both give `None`.
fn extract_optional<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<T>>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => value
            .extract()
            .map(Some)
            .map_err(|e| PyValueError::new_err(format!("Invalid value for '{}': {}", key, e))),
        _ => Ok(None),
    }
}

// ========================================================================
// Configuration Parser
// ========================================================================

/// Convert a Python config dict into a validated `SimulationConfig`
///
/// Keys are the `SimulationConfig` field names; `retention_rate` may be
/// omitted or `None`.
pub fn parse_simulation_config(dict: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let topology_kind: String = extract_required(dict, "topology_kind")?;
    let diffusion_model: String = extract_required(dict, "diffusion_model")?;

    let config = SimulationConfig {
        node_count: extract_required(dict, "node_count")?,
        topology_kind: topology_kind
            .parse::<TopologyKind>()
            .map_err(|e| PyValueError::new_err(e.to_string()))?,
        topology_param: extract_required(dict, "topology_param")?,
        initial_seed_count: extract_required(dict, "initial_seed_count")?,
        base_influence_probability: extract_required(dict, "base_influence_probability")?,
        retention_rate: extract_optional(dict, "retention_rate")?,
        diffusion_model: diffusion_model
            .parse::<DiffusionModel>()
            .map_err(|e| PyValueError::new_err(e.to_string()))?,
        step_count: extract_required(dict, "step_count")?,
        rng_seed: extract_required(dict, "rng_seed")?,
    };

    config
        .validate()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(config)
}

// ========================================================================
// Result Conversion
// ========================================================================

/// `{status_name: count}` for every status
pub fn counts_to_py<'py>(py: Python<'py>, counts: &StatusCounts) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for status in Status::ALL {
        dict.set_item(status.as_str(), counts.get(status))?;
    }
    Ok(dict)
}

/// List of `{"from", "to", "count"}` dicts
pub fn transitions_to_py<'py>(py: Python<'py>, transitions: &TransitionCounts) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for entry in transitions.iter() {
        let item = PyDict::new(py);
        item.set_item("from", entry.from.as_str())?;
        item.set_item("to", entry.to.as_str())?;
        item.set_item("count", entry.count)?;
        list.append(item)?;
    }
    Ok(list)
}

/// Convert StepResult to Python dict
///
/// Keys: `step`, `counts`, `transitions`, `num_changes`, `num_superseded`
pub fn step_result_to_py(py: Python<'_>, result: &StepResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("step", result.step)?;
    dict.set_item("counts", counts_to_py(py, &result.counts)?)?;
    dict.set_item("transitions", transitions_to_py(py, &result.transitions)?)?;
    dict.set_item("num_changes", result.num_changes)?;
    dict.set_item("num_superseded", result.num_superseded)?;

    Ok(dict.unbind())
}

/// Convert MetricsHistory to Python dict
///
/// Keys: `baseline` (counts dict), `steps` (list of step numbers), one count
/// series per status name, and `transitions` (one list per step).
pub fn history_to_py(py: Python<'_>, history: &MetricsHistory) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("baseline", counts_to_py(py, &history.baseline())?)?;

    let steps: Vec<usize> = history.entries().iter().map(|e| e.step).collect();
    dict.set_item("steps", steps)?;

    for status in Status::ALL {
        dict.set_item(status.as_str(), history.series(status))?;
    }

    let transitions = PyList::empty(py);
    for entry in history.entries() {
        transitions.append(transitions_to_py(py, &entry.transitions)?)?;
    }
    dict.set_item("transitions", transitions)?;

    Ok(dict.unbind())
}
