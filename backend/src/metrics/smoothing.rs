//! Moving-average smoothing for display series

use crate::orchestrator::ConfigError;

/// Window used by the dashboard plots
pub const DEFAULT_WINDOW: usize = 10;

/// Simple moving average over full windows
///
/// Returns `data.len() - window + 1` means, in order. A series shorter than
/// the window is returned unchanged.
///
/// # Errors
///
/// `ConfigError::SmoothingWindow` if `window` is 0.
///
/// # Example
///
/// ```rust
/// use influence_simulator_core_rs::moving_average;
///
/// let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
/// assert_eq!(smoothed, vec![1.5, 2.5, 3.5]);
///
/// // Too short to smooth
/// assert_eq!(moving_average(&[1.0, 2.0], 3).unwrap(), vec![1.0, 2.0]);
/// ```
pub fn moving_average(data: &[f64], window: usize) -> Result<Vec<f64>, ConfigError> {
    if window == 0 {
        return Err(ConfigError::SmoothingWindow);
    }
    if data.len() < window {
        return Ok(data.to_vec());
    }
    Ok(data
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect())
}

/// `moving_average` over a count series
pub fn moving_average_counts(data: &[usize], window: usize) -> Result<Vec<f64>, ConfigError> {
    let data: Vec<f64> = data.iter().map(|&c| c as f64).collect();
    moving_average(&data, window)
}
