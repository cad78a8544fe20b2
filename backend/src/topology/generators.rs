//! Random graph generators
//!
//! Both generators draw from the caller's `RngManager` only; given the same
//! RNG state they produce the same graph.

use super::graph::{Graph, NodeId};
use crate::rng::RngManager;

/// Preferential attachment (Barabási–Albert) graph
///
/// Starts from a star on nodes `0..=m` (node 0 joined to `1..=m`). Every
/// later node `s` attaches to `m` distinct existing nodes, each drawn
/// uniformly from the repeated-nodes list where a node appears once per
/// incident edge end, so high-degree nodes attract more edges.
///
/// Caller guarantees `1 <= m < node_count`.
pub(crate) fn preferential_attachment(node_count: usize, m: usize, rng: &mut RngManager) -> Graph {
    debug_assert!(m >= 1 && m < node_count);

    let mut graph = Graph::empty(node_count);
    let mut repeated: Vec<NodeId> = Vec::with_capacity(2 * m * node_count);

    for leaf in 1..=m {
        graph.add_edge(0, leaf);
        repeated.push(0);
        repeated.push(leaf);
    }

    for source in (m + 1)..node_count {
        let targets = distinct_from_repeated(&repeated, m, rng);
        for &target in &targets {
            graph.add_edge(source, target);
        }
        repeated.extend(targets.iter().copied());
        repeated.extend(std::iter::repeat(source).take(m));
    }

    graph
}

/// Draw until `m` distinct ids have been seen; returned in first-seen order
fn distinct_from_repeated(repeated: &[NodeId], m: usize, rng: &mut RngManager) -> Vec<NodeId> {
    let mut targets: Vec<NodeId> = Vec::with_capacity(m);
    while targets.len() < m {
        let pick = repeated[rng.range(0, repeated.len())];
        if !targets.contains(&pick) {
            targets.push(pick);
        }
    }
    targets
}

/// Random edge (Erdős–Rényi G(n, p)) graph
///
/// One draw per unordered pair `i < j`, visited in ascending order.
pub(crate) fn random_edge(node_count: usize, p: f64, rng: &mut RngManager) -> Graph {
    let mut graph = Graph::empty(node_count);
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            if rng.chance(p) {
                graph.add_edge(i, j);
            }
        }
    }
    graph
}
