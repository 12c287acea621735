//! Catalog Types
//!
//! Core types for the asset catalog.
//! No loading logic here - only data structures and their accessors.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable asset identifier (positive)
pub type AssetId = u32;

/// Cluster label assigned by the upstream grouping step
pub type ClusterId = i64;

// ============================================================================
// ASSET
// ============================================================================

/// One host tracked for vulnerability exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Lowercase, trimmed application identifiers
    pub apps: BTreeSet<String>,
    /// Lowercase, trimmed OS string
    pub os: String,
    /// Mean vulnerability severity (0.0 - 10.0)
    pub severity: f64,
    pub cluster: ClusterId,
}

impl Asset {
    /// Build an asset, normalizing app names and OS.
    pub fn new<I, S>(id: AssetId, apps: I, os: &str, severity: f64, cluster: ClusterId) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id,
            apps: apps
                .into_iter()
                .filter_map(|a| normalize_app(a.as_ref()))
                .collect(),
            os: os.trim().to_lowercase(),
            severity,
            cluster,
        }
    }

    /// Applications installed on both assets, sorted
    pub fn shared_apps(&self, other: &Asset) -> Vec<String> {
        self.apps.intersection(&other.apps).cloned().collect()
    }

    pub fn shares_any_app(&self, other: &Asset) -> bool {
        self.apps.intersection(&other.apps).next().is_some()
    }
}

/// Trim and lowercase one app name; `None` when nothing is left
pub fn normalize_app(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Split a comma-joined app list into a normalized set
pub fn parse_app_list(raw: &str) -> BTreeSet<String> {
    raw.split(',').filter_map(normalize_app).collect()
}

// ============================================================================
// ASSET CATALOG
// ============================================================================

/// Immutable in-memory view of the fleet, ordered by asset id
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetCatalog {
    /// Build a catalog. The first asset seen for an id wins.
    pub fn from_assets<I>(assets: I) -> Self
    where
        I: IntoIterator<Item = Asset>,
    {
        let mut map = BTreeMap::new();
        for asset in assets {
            map.entry(asset.id).or_insert(asset);
        }
        Self { assets: map }
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.assets.keys().copied()
    }

    /// Shared applications of two catalog assets (empty if either is unknown)
    pub fn shared_apps(&self, a: AssetId, b: AssetId) -> Vec<String> {
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x.shared_apps(y),
            _ => Vec::new(),
        }
    }

    /// Number of assets per cluster label
    pub fn cluster_sizes(&self) -> BTreeMap<ClusterId, usize> {
        let mut sizes = BTreeMap::new();
        for asset in self.assets.values() {
            *sizes.entry(asset.cluster).or_insert(0) += 1;
        }
        sizes
    }

    /// SHA-256 over the catalog contents in id order, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for asset in self.assets.values() {
            hasher.update(asset.id.to_le_bytes());
            for app in &asset.apps {
                hasher.update(app.as_bytes());
                hasher.update([0x1fu8]);
            }
            hasher.update([0x1eu8]);
            hasher.update(asset.os.as_bytes());
            hasher.update(asset.severity.to_le_bytes());
            hasher.update(asset.cluster.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

// ============================================================================
// ROW ERRORS (InputError)
// ============================================================================

/// Why an input row was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    Malformed,
    MissingApps,
    BadSeverity,
    SeverityOutOfRange,
    BadId,
    DuplicateId,
    MissingCluster,
    BadCluster,
}

impl RowErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowErrorKind::Malformed => "malformed row",
            RowErrorKind::MissingApps => "missing apps",
            RowErrorKind::BadSeverity => "unparseable severity",
            RowErrorKind::SeverityOutOfRange => "severity outside 0-10",
            RowErrorKind::BadId => "invalid id",
            RowErrorKind::DuplicateId => "duplicate id",
            RowErrorKind::MissingCluster => "missing cluster",
            RowErrorKind::BadCluster => "unparseable cluster",
        }
    }
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A skipped input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based line in the source table (header is line 1)
    pub line: u64,
    pub kind: RowErrorKind,
    pub detail: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "line {}: {}", self.line, self.kind)
        } else {
            write!(f, "line {}: {} ({})", self.line, self.kind, self.detail)
        }
    }
}

/// Outcome of loading a catalog table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
    /// True when ids were assigned from row order
    pub synthesized_ids: bool,
}

impl LoadReport {
    pub fn record_skip(&mut self, error: RowError) {
        self.skipped += 1;
        self.errors.push(error);
    }

    /// Skip counts grouped by reason
    pub fn skips_by_kind(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.errors {
            *counts.entry(e.kind.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }
}
