//! Graph Builder
//!
//! Applies the [`EdgePolicy`] over asset pairs to materialize an [`AttackGraph`].
//!
//! Two candidate strategies, same output:
//! - pairwise: every unordered pair once, O(n²)
//! - indexed: inverted index app -> assets, only pairs sharing an app

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use super::policy::EdgePolicy;
use super::types::{AttackGraph, Edge};
use crate::constants::INDEXED_BUILD_CUTOFF;
use crate::logic::catalog::{Asset, AssetCatalog, AssetId};

/// Build the attack graph, picking the candidate strategy by catalog size
pub fn build_graph(catalog: &AssetCatalog, policy: &EdgePolicy) -> AttackGraph {
    let graph = if catalog.len() > INDEXED_BUILD_CUTOFF {
        build_indexed(catalog, policy)
    } else {
        build_pairwise(catalog, policy)
    };

    tracing::info!(
        "Graph built ({}): {} nodes, {} edges, threshold {:.2}",
        policy.mode,
        graph.node_count(),
        graph.edge_count(),
        policy.severity_threshold
    );
    graph
}

/// Evaluate every unordered pair of distinct assets exactly once
pub fn build_pairwise(catalog: &AssetCatalog, policy: &EdgePolicy) -> AttackGraph {
    let assets: Vec<&Asset> = catalog.iter().collect();
    let slice: &[&Asset] = &assets;
    let policy = *policy;

    let edges: Vec<Edge> = (0..slice.len())
        .into_par_iter()
        .flat_map_iter(move |i| {
            let a = slice[i];
            slice[i + 1..]
                .iter()
                .filter_map(move |b| policy.evaluate(a, b).map(|shared| Edge::new(a.id, b.id, shared)))
        })
        .collect();

    let n = slice.len();
    tracing::debug!(
        "Pairwise build ({}): {} pairs evaluated, {} admitted",
        policy.mode,
        n * n.saturating_sub(1) / 2,
        edges.len()
    );

    assemble(catalog, &policy, edges)
}

/// Evaluate only pairs that share at least one application
pub fn build_indexed(catalog: &AssetCatalog, policy: &EdgePolicy) -> AttackGraph {
    let candidates: Vec<(AssetId, AssetId)> = candidate_pairs(catalog).into_iter().collect();
    let policy = *policy;

    let edges: Vec<Edge> = candidates
        .par_iter()
        .filter_map(|&(x, y)| {
            let a = catalog.get(x)?;
            let b = catalog.get(y)?;
            policy.evaluate(a, b).map(|shared| Edge::new(x, y, shared))
        })
        .collect();

    tracing::debug!(
        "Indexed build ({}): {} candidate pairs, {} admitted",
        policy.mode,
        candidates.len(),
        edges.len()
    );

    assemble(catalog, &policy, edges)
}

/// Pairs `(x, y)` with `x < y` appearing together in some app's posting list
fn candidate_pairs(catalog: &AssetCatalog) -> BTreeSet<(AssetId, AssetId)> {
    let mut index: BTreeMap<&str, Vec<AssetId>> = BTreeMap::new();
    for asset in catalog.iter() {
        for app in &asset.apps {
            index.entry(app.as_str()).or_default().push(asset.id);
        }
    }

    let mut pairs = BTreeSet::new();
    for postings in index.values() {
        // Postings are in ascending id order since the catalog iterates by id
        for (i, &x) in postings.iter().enumerate() {
            for &y in &postings[i + 1..] {
                pairs.insert((x, y));
            }
        }
    }
    pairs
}

fn assemble(catalog: &AssetCatalog, policy: &EdgePolicy, edges: Vec<Edge>) -> AttackGraph {
    let mut graph = AttackGraph::new(policy.mode, catalog.ids());
    for edge in edges {
        graph.add_edge(edge);
    }
    graph
}
