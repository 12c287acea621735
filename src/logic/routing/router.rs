//! Shortest-Path Router
//!
//! All edges weigh one hop, so minimum-weight equals minimum-hop. A single
//! BFS rooted at the target yields the shortest route from every origin.
//!
//! Ties between equal-length routes are broken by discovery order: neighbors
//! are visited in ascending id order and each node keeps the first parent
//! that reached it. Same graph in, same routes out.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::constants::HOP_WEIGHT;
use crate::logic::catalog::AssetId;
use crate::logic::graph::AttackGraph;

// ============================================================================
// ROUTE
// ============================================================================

/// Minimum-hop route from an origin to the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin: AssetId,
    /// Asset ids from origin to target, both included
    pub path: Vec<AssetId>,
    pub hops: u32,
}

impl Route {
    pub fn weight(&self) -> f64 {
        self.hops as f64 * HOP_WEIGHT
    }

    /// Consecutive `(from, to)` steps toward the target
    pub fn steps(&self) -> impl Iterator<Item = (AssetId, AssetId)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Routes keyed by origin. Origins without a route are absent.
pub type RouteMap = BTreeMap<AssetId, Route>;

// ============================================================================
// BFS TREE
// ============================================================================

/// BFS tree rooted at the target: depth and first-discovered parent per node
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    target: AssetId,
    depth: BTreeMap<AssetId, u32>,
    parent: BTreeMap<AssetId, AssetId>,
}

impl ShortestPathTree {
    /// Run the BFS. `None` when the target is not a graph node.
    pub fn from_target(graph: &AttackGraph, target: AssetId) -> Option<Self> {
        if !graph.contains_node(target) {
            return None;
        }

        let mut depth = BTreeMap::new();
        let mut parent = BTreeMap::new();
        let mut queue = VecDeque::new();

        depth.insert(target, 0u32);
        queue.push_back(target);

        while let Some(current) = queue.pop_front() {
            let next_depth = depth[&current] + 1;
            for neighbor in graph.neighbors(current) {
                if depth.contains_key(&neighbor) {
                    continue;
                }
                depth.insert(neighbor, next_depth);
                parent.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }

        tracing::debug!(
            "BFS from {}: {} nodes reached, max depth {}",
            target,
            depth.len(),
            depth.values().max().copied().unwrap_or(0)
        );

        Some(Self { target, depth, parent })
    }

    /// Hop distance to the target, if reachable
    pub fn depth(&self, id: AssetId) -> Option<u32> {
        self.depth.get(&id).copied()
    }

    /// Route from `origin` to the target, following parents
    pub fn route(&self, origin: AssetId) -> Option<Route> {
        if origin == self.target {
            return None;
        }
        let hops = self.depth(origin)?;

        let mut path = Vec::with_capacity(hops as usize + 1);
        let mut current = origin;
        path.push(current);
        while current != self.target {
            current = *self.parent.get(&current)?;
            path.push(current);
        }

        Some(Route { origin, path, hops })
    }

    /// Routes for every reachable origin
    pub fn routes(&self) -> RouteMap {
        self.depth
            .keys()
            .filter_map(|&origin| self.route(origin).map(|r| (origin, r)))
            .collect()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Shortest route from every node to `target`.
///
/// Empty when the target is absent from the graph.
pub fn shortest_routes(graph: &AttackGraph, target: AssetId) -> RouteMap {
    let routes = ShortestPathTree::from_target(graph, target)
        .map(|tree| tree.routes())
        .unwrap_or_default();

    tracing::info!(
        "Routes ({}): {} of {} origins reach target {}",
        graph.mode(),
        routes.len(),
        graph.node_count().saturating_sub(1),
        target
    );
    routes
}
