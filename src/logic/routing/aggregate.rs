//! Route Aggregator
//!
//! Ranks routes by hop count and tabulates which shared applications
//! recur along route steps. Pure aggregation over computed routes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::router::RouteMap;
use crate::logic::catalog::{AssetCatalog, AssetId};

// ============================================================================
// ROUTE RANKING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRoute {
    /// 1-based position in the ranking
    pub rank: usize,
    pub origin: AssetId,
    pub path: Vec<AssetId>,
    pub hops: u32,
}

/// Routes ordered by hops, then origin id, truncated to `top_k`
pub fn rank_routes(routes: &RouteMap, top_k: usize) -> Vec<RankedRoute> {
    let mut ordered: Vec<_> = routes.values().collect();
    ordered.sort_by_key(|r| (r.hops, r.origin));

    ordered
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(i, r)| RankedRoute {
            rank: i + 1,
            origin: r.origin,
            path: r.path.clone(),
            hops: r.hops,
        })
        .collect()
}

// ============================================================================
// APPLICATION FREQUENCY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFrequency {
    pub app: String,
    pub count: usize,
}

/// Count shared apps over every step of every route.
///
/// Labels are recomputed from the catalog; each distinct app on a step
/// counts once for that step.
pub fn count_route_apps(routes: &RouteMap, catalog: &AssetCatalog) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for route in routes.values() {
        for (from, to) in route.steps() {
            for app in catalog.shared_apps(from, to) {
                *counts.entry(app).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Most frequent apps: count descending, name ascending, truncated to `top_k`
pub fn app_frequency(routes: &RouteMap, catalog: &AssetCatalog, top_k: usize) -> Vec<AppFrequency> {
    let mut table: Vec<AppFrequency> = count_route_apps(routes, catalog)
        .into_iter()
        .map(|(app, count)| AppFrequency { app, count })
        .collect();

    table.sort_by(|x, y| y.count.cmp(&x.count).then_with(|| x.app.cmp(&y.app)));
    table.truncate(top_k);
    table
}
