//! Immutable interaction graph
//!
//! Undirected simple graph over node ids `0..N-1`.
//!
//! # Determinism
//!
//! - Adjacency is a `BTreeSet` per node, so neighbor iteration is ascending
//! - `edges()` yields each undirected edge once as `(a, b)` with `a < b`,
//!   in lexicographic order
//! - No mutation is exposed once a builder has handed the graph out

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Node identity (index into the agent store)
pub type NodeId = usize;

/// Fixed graph of who can influence whom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Node id → sorted neighbor ids
    adj: Vec<BTreeSet<NodeId>>,
}

impl Graph {
    /// Graph with `node_count` nodes and no edges
    pub(crate) fn empty(node_count: usize) -> Self {
        Self {
            adj: vec![BTreeSet::new(); node_count],
        }
    }

    /// Insert undirected edge; self-loops and duplicates are ignored
    ///
    /// Returns true if a new edge was added.
    pub(crate) fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let inserted = self.adj[a].insert(b);
        self.adj[b].insert(a);
        inserted
    }

    /// Build from an explicit edge list (mainly for tests and fixtures)
    ///
    /// Edges naming a node `>= node_count` are ignored.
    ///
    /// # Example
    /// ```
    /// use influence_simulator_core_rs::Graph;
    ///
    /// let g = Graph::from_edges(3, &[(0, 1), (1, 2), (1, 1)]);
    /// assert_eq!(g.edge_count(), 2);
    /// assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
    /// ```
    pub fn from_edges(node_count: usize, edges: &[(NodeId, NodeId)]) -> Self {
        let mut graph = Self::empty(node_count);
        for &(a, b) in edges {
            if a < node_count && b < node_count {
                graph.add_edge(a, b);
            }
        }
        graph
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Check if edge exists (either direction)
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adj.get(a).map(|n| n.contains(&b)).unwrap_or(false)
    }

    /// Neighbors of `node` in ascending order (empty for unknown ids)
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adj.get(node).into_iter().flat_map(|n| n.iter().copied())
    }

    /// Degree of `node` (0 for unknown ids)
    pub fn degree(&self, node: NodeId) -> usize {
        self.adj.get(node).map(|n| n.len()).unwrap_or(0)
    }

    /// True if `node` is a valid id
    pub fn contains(&self, node: NodeId) -> bool {
        node < self.adj.len()
    }

    /// Each undirected edge once, `(low, high)`, sorted
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(a, ns)| ns.range(a + 1..).map(move |&b| (a, b)))
            .collect()
    }

    /// Nodes without any edge; they never send or receive influence
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        self.adj
            .iter()
            .enumerate()
            .filter(|(_, ns)| ns.is_empty())
            .map(|(id, _)| id)
            .collect()
    }
}
