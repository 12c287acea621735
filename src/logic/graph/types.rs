//! Graph Types
//!
//! Undirected attack graph: asset nodes plus hop-weighted edges.
//! Edges are kept as a set of unordered pairs, so insertion order never matters.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::policy::ClusterMode;
use crate::constants::HOP_WEIGHT;
use crate::logic::catalog::AssetId;

// ============================================================================
// EDGE
// ============================================================================

/// Unordered attack edge, stored with `a < b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: AssetId,
    pub b: AssetId,
    pub weight: f64,
    /// Applications that justified the connection
    pub shared_apps: Vec<String>,
}

impl Edge {
    pub fn new(x: AssetId, y: AssetId, shared_apps: Vec<String>) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            a,
            b,
            weight: HOP_WEIGHT,
            shared_apps,
        }
    }

    pub fn key(&self) -> (AssetId, AssetId) {
        (self.a, self.b)
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

// ============================================================================
// ATTACK GRAPH
// ============================================================================

#[derive(Debug, Clone)]
pub struct AttackGraph {
    mode: ClusterMode,
    nodes: BTreeSet<AssetId>,
    adjacency: BTreeMap<AssetId, BTreeSet<AssetId>>,
    edges: BTreeMap<(AssetId, AssetId), Edge>,
}

impl AttackGraph {
    pub fn new<I>(mode: ClusterMode, nodes: I) -> Self
    where
        I: IntoIterator<Item = AssetId>,
    {
        Self {
            mode,
            nodes: nodes.into_iter().collect(),
            adjacency: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> ClusterMode {
        self.mode
    }

    /// Insert an edge. Self-loops, unknown endpoints and duplicates are ignored.
    /// Returns true when the edge is new.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.is_self_loop()
            || !self.nodes.contains(&edge.a)
            || !self.nodes.contains(&edge.b)
            || self.edges.contains_key(&edge.key())
        {
            return false;
        }

        self.adjacency.entry(edge.a).or_default().insert(edge.b);
        self.adjacency.entry(edge.b).or_default().insert(edge.a);
        self.edges.insert(edge.key(), edge);
        true
    }

    pub fn contains_node(&self, id: AssetId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn has_edge(&self, x: AssetId, y: AssetId) -> bool {
        let key = if x <= y { (x, y) } else { (y, x) };
        self.edges.contains_key(&key)
    }

    /// Neighbors in ascending id order
    pub fn neighbors(&self, id: AssetId) -> impl Iterator<Item = AssetId> + '_ {
        self.adjacency.get(&id).into_iter().flat_map(|set| set.iter().copied())
    }

    pub fn degree(&self, id: AssetId) -> usize {
        self.adjacency.get(&id).map_or(0, |set| set.len())
    }

    pub fn nodes(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.nodes.iter().copied()
    }

    /// Edges in ascending `(a, b)` order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn isolated_count(&self) -> usize {
        self.nodes.iter().filter(|&&n| self.degree(n) == 0).count()
    }

    pub fn stats(&self, reachable_to_target: usize) -> GraphStats {
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            isolated: self.isolated_count(),
            reachable_to_target,
        }
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Nodes without any attack edge
    pub isolated: usize,
    /// Nodes with a route to the target (target excluded)
    pub reachable_to_target: usize,
}
