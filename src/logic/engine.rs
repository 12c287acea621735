//! Attack-Path Engine
//!
//! Catalog -> Graph Builder -> Router -> SPG Extractor + Route Aggregator,
//! once per selected cluster mode. Both modes share the same code path and
//! differ only in the [`ClusterMode`] handed to the edge policy.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::constants::APP_VERSION;
use crate::error::{EngineError, EngineResult};
use crate::logic::catalog::{AssetCatalog, AssetId, ClusterId, LoadReport};
use crate::logic::graph::{build_graph, ClusterMode, Edge, EdgePolicy, GraphStats, SeverityGate};
use crate::logic::routing::{
    app_frequency, rank_routes, shortest_routes, AppFrequency, RankedRoute, RouteMap,
    ShortestPathSubgraph,
};

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Node attributes handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: AssetId,
    pub cluster: ClusterId,
    pub severity: f64,
    pub is_target: bool,
}

/// Everything computed for one cluster mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeReport {
    pub mode: ClusterMode,
    pub stats: GraphStats,
    pub edges: Vec<Edge>,
    pub routes: RouteMap,
    pub top_routes: Vec<RankedRoute>,
    pub top_apps: Vec<AppFrequency>,
    pub spg: ShortestPathSubgraph,
}

/// Result of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub target: AssetId,
    pub severity_threshold: f64,
    pub severity_gate: SeverityGate,
    pub top_k: usize,
    pub catalog_fingerprint: String,
    pub assets_loaded: usize,
    pub rows_skipped: usize,
    pub nodes: Vec<NodeSummary>,
    pub modes: Vec<ModeReport>,
}

impl EngineReport {
    pub fn mode(&self, mode: ClusterMode) -> Option<&ModeReport> {
        self.modes.iter().find(|m| m.mode == mode)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct AttackPathEngine {
    catalog: AssetCatalog,
    config: RunConfig,
    load_report: LoadReport,
}

impl AttackPathEngine {
    pub fn new(catalog: AssetCatalog, config: RunConfig) -> Self {
        Self {
            catalog,
            config,
            load_report: LoadReport::default(),
        }
    }

    /// Attach the loader's outcome so the skip count lands in the report
    pub fn with_load_report(mut self, report: LoadReport) -> Self {
        self.load_report = report;
        self
    }

    /// Run every selected mode.
    ///
    /// Fails before any graph is built when the config is invalid or the
    /// target is not in the catalog.
    pub fn run(&self) -> EngineResult<EngineReport> {
        self.config.validate_all()?;
        self.ensure_target()?;

        let modes = self.config.cluster_mode.modes();
        tracing::info!(
            "Engine run: target {}, threshold {:.2}, gate {}, modes {}",
            self.config.target,
            self.config.severity_threshold,
            self.config.severity_gate,
            self.config.cluster_mode
        );

        let reports = match modes.as_slice() {
            [first, second] => {
                let (a, b) = rayon::join(|| self.run_mode(*first), || self.run_mode(*second));
                vec![a, b]
            }
            _ => modes.iter().map(|&m| self.run_mode(m)).collect(),
        };

        Ok(EngineReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: APP_VERSION.to_string(),
            target: self.config.target,
            severity_threshold: self.config.severity_threshold,
            severity_gate: self.config.severity_gate,
            top_k: self.config.top_k,
            catalog_fingerprint: self.catalog.fingerprint(),
            assets_loaded: self.catalog.len(),
            rows_skipped: self.load_report.skipped,
            nodes: self.node_summaries(),
            modes: reports,
        })
    }

    /// [`AttackPathEngine::run`] on a blocking task, bounded by the configured deadline
    pub async fn run_with_deadline(self) -> EngineResult<EngineReport> {
        let deadline = self.config.deadline_secs;
        with_deadline(deadline, move || self.run()).await
    }

    /// One full pipeline for a single cluster mode
    pub fn run_mode(&self, mode: ClusterMode) -> ModeReport {
        let target = self.config.target;
        let policy = EdgePolicy::new(target, self.config.severity_threshold, mode)
            .with_gate(self.config.severity_gate);

        let graph = build_graph(&self.catalog, &policy);
        let routes = shortest_routes(&graph, target);

        let mut spg = ShortestPathSubgraph::extract(&routes, target);
        spg.include_nodes(graph.nodes());

        let top_routes = rank_routes(&routes, self.config.top_k);
        let top_apps = app_frequency(&routes, &self.catalog, self.config.top_k);

        ModeReport {
            mode,
            stats: graph.stats(routes.len()),
            edges: graph.edges().cloned().collect(),
            routes,
            top_routes,
            top_apps,
            spg,
        }
    }

    fn ensure_target(&self) -> EngineResult<()> {
        if self.catalog.contains(self.config.target) {
            Ok(())
        } else {
            tracing::error!(
                "Target {} not in catalog of {} assets",
                self.config.target,
                self.catalog.len()
            );
            Err(EngineError::TargetNotFound {
                target: self.config.target,
                catalog_size: self.catalog.len(),
            })
        }
    }

    fn node_summaries(&self) -> Vec<NodeSummary> {
        self.catalog
            .iter()
            .map(|a| NodeSummary {
                id: a.id,
                cluster: a.cluster,
                severity: a.severity,
                is_target: a.id == self.config.target,
            })
            .collect()
    }
}

/// Run blocking work off the async runtime.
///
/// Past the deadline the task is abandoned, not joined, and the caller gets
/// `DeadlineExceeded`.
pub async fn with_deadline<T, F>(deadline_secs: Option<u64>, job: F) -> EngineResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> EngineResult<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);

    let joined = match deadline_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), task)
            .await
            .map_err(|_| {
                tracing::error!("Run exceeded {}s deadline", secs);
                EngineError::DeadlineExceeded { secs }
            })?,
        None => task.await,
    };

    joined?
}

// ============================================================================
// TESTS
// ============================================================================
