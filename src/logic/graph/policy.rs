//! Edge Policy
//!
//! Pure predicate deciding whether an attack edge joins two assets.
//! Input: two assets + policy parameters. Output: the shared app labels, or nothing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logic::catalog::{Asset, AssetId};

// ============================================================================
// MODES
// ============================================================================

/// Whether edges are restricted to assets in the same cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClusterMode {
    /// Only same-cluster pairs may connect
    #[serde(rename = "cluster_aware")]
    Aware,
    /// Cluster labels are ignored
    #[serde(rename = "cluster_agnostic")]
    Agnostic,
}

impl ClusterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterMode::Aware => "cluster_aware",
            ClusterMode::Agnostic => "cluster_agnostic",
        }
    }

    pub fn is_cluster_aware(&self) -> bool {
        matches!(self, ClusterMode::Aware)
    }
}

impl fmt::Display for ClusterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for ClusterMode {
    fn from(cluster_aware: bool) -> Self {
        if cluster_aware {
            ClusterMode::Aware
        } else {
            ClusterMode::Agnostic
        }
    }
}

/// How the severity threshold applies when one endpoint is the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityGate {
    /// The target's own severity is not checked, only the other endpoint's
    #[default]
    TargetExempt,
    /// Both endpoints must meet the threshold, target included
    Symmetric,
}

impl SeverityGate {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityGate::TargetExempt => "target-exempt",
            SeverityGate::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for SeverityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SeverityGate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "target-exempt" | "target_exempt" | "exempt" => Ok(SeverityGate::TargetExempt),
            "symmetric" => Ok(SeverityGate::Symmetric),
            _ => Err(format!("Invalid severity gate: {}", s)),
        }
    }
}

// ============================================================================
// EDGE POLICY
// ============================================================================

/// Parameters of the edge rule for one graph build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePolicy {
    pub target: AssetId,
    pub severity_threshold: f64,
    pub mode: ClusterMode,
    pub gate: SeverityGate,
}

impl EdgePolicy {
    pub fn new(target: AssetId, severity_threshold: f64, mode: ClusterMode) -> Self {
        Self {
            target,
            severity_threshold,
            mode,
            gate: SeverityGate::default(),
        }
    }

    pub fn with_gate(mut self, gate: SeverityGate) -> Self {
        self.gate = gate;
        self
    }

    /// Evaluate the rule for a pair.
    ///
    /// Returns the sorted shared applications when an edge exists.
    /// Self-pairs never form an edge.
    pub fn evaluate(&self, a: &Asset, b: &Asset) -> Option<Vec<String>> {
        if a.id == b.id {
            return None;
        }

        if self.mode.is_cluster_aware() && a.cluster != b.cluster {
            return None;
        }

        if !a.shares_any_app(b) || !self.passes_threshold(a, b) {
            return None;
        }

        Some(a.shared_apps(b))
    }

    fn passes_threshold(&self, a: &Asset, b: &Asset) -> bool {
        let meets = |asset: &Asset| asset.severity >= self.severity_threshold;

        match self.gate {
            SeverityGate::TargetExempt if a.id == self.target => meets(b),
            SeverityGate::TargetExempt if b.id == self.target => meets(a),
            _ => meets(a) && meets(b),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
