//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used as the single random source of a run.
//!
//! # Determinism
//!
//! Same seed → same sequence of draws → same topology, same seeds, same
//! per-step transitions. Reruns and parallel test runs never interfere
//! because every stochastic call receives the run's `RngManager` explicitly.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use influence_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let index = rng.range(0, 100); // [0, 100)
/// assert!(index < 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the all-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random index in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    ///
    /// # Example
    /// ```
    /// use influence_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let node = rng.range(10, 20);
    /// assert!((10..20).contains(&node));
    /// ```
    pub fn range(&mut self, min: usize, max: usize) -> usize {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as usize
    }

    /// Get current RNG state (a new manager seeded with it continues the sequence)
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Generate random f64 in range [lo, hi)
    ///
    /// # Example
    /// ```
    /// use influence_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// let capacity = rng.uniform(0.5, 1.5);
    /// assert!(capacity >= 0.5 && capacity < 1.5);
    /// ```
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: true with probability `p` (clamped to [0, 1])
    ///
    /// Always consumes exactly one draw, so the sequence position does not
    /// depend on the probability value.
    pub fn chance(&mut self, p: f64) -> bool {
        let u = self.next_f64();
        u < p.clamp(0.0, 1.0)
    }

    /// Fair coin
    pub fn coin(&mut self) -> bool {
        self.chance(0.5)
    }

    /// Sample `k` distinct indices from `0..n` uniformly without replacement
    ///
    /// Partial Fisher–Yates: consumes exactly `k` draws. Returned indices are
    /// in selection order.
    ///
    /// # Panics
    /// Panics if `k > n`
    pub fn sample_distinct(&mut self, n: usize, k: usize) -> Vec<usize> {
        assert!(k <= n, "cannot sample {} distinct values from {}", k, n);

        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = self.range(i, n);
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }
}
