//! SPG Extractor
//!
//! Unions every shortest route into one directed subgraph oriented toward
//! the target. Edges are presence markers; inserting one twice is a no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::router::RouteMap;
use crate::logic::catalog::AssetId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathSubgraph {
    pub target: AssetId,
    pub nodes: BTreeSet<AssetId>,
    /// Directed `(from, to)` steps
    pub edges: BTreeSet<(AssetId, AssetId)>,
}

impl ShortestPathSubgraph {
    pub fn new(target: AssetId) -> Self {
        Self {
            target,
            nodes: BTreeSet::from([target]),
            edges: BTreeSet::new(),
        }
    }

    /// Nodes on any route plus the target, edges from every route step
    pub fn extract(routes: &RouteMap, target: AssetId) -> Self {
        let mut spg = Self::new(target);
        for route in routes.values() {
            spg.nodes.extend(route.path.iter().copied());
            for (from, to) in route.steps() {
                spg.insert_edge(from, to);
            }
        }

        tracing::debug!(
            "SPG toward {}: {} nodes, {} directed edges",
            target,
            spg.nodes.len(),
            spg.edges.len()
        );
        spg
    }

    /// Returns true when the edge is new
    pub fn insert_edge(&mut self, from: AssetId, to: AssetId) -> bool {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.edges.insert((from, to))
    }

    /// Add nodes that sit on no route (for full-fleet layouts)
    pub fn include_nodes<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = AssetId>,
    {
        self.nodes.extend(nodes);
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
