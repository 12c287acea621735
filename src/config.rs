//! Configuration module

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{
    self, DEFAULT_SEVERITY_THRESHOLD, DEFAULT_TOP_K, ENV_CLUSTER_MODE, ENV_DEADLINE_SECS,
    ENV_SEVERITY_GATE, ENV_SEVERITY_THRESHOLD, ENV_TARGET, ENV_TOP_K, MAX_SEVERITY,
};
use crate::error::{EngineError, EngineResult};
use crate::logic::catalog::AssetId;
use crate::logic::graph::{ClusterMode, SeverityGate};

/// Which edge-policy pipelines to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSelection {
    Aware,
    Agnostic,
    #[default]
    Both,
}

impl ModeSelection {
    pub fn modes(&self) -> Vec<ClusterMode> {
        match self {
            ModeSelection::Aware => vec![ClusterMode::Aware],
            ModeSelection::Agnostic => vec![ClusterMode::Agnostic],
            ModeSelection::Both => vec![ClusterMode::Aware, ClusterMode::Agnostic],
        }
    }
}

impl fmt::Display for ModeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModeSelection::Aware => "aware",
            ModeSelection::Agnostic => "agnostic",
            ModeSelection::Both => "both",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ModeSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aware" | "cluster-aware" | "true" => Ok(ModeSelection::Aware),
            "agnostic" | "cluster-agnostic" | "false" => Ok(ModeSelection::Agnostic),
            "both" | "all" => Ok(ModeSelection::Both),
            _ => Err(format!("Invalid cluster mode: {}", s)),
        }
    }
}

/// Values given on the command line; `None` falls through to the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub target: Option<AssetId>,
    pub severity_threshold: Option<f64>,
    pub cluster_mode: Option<ModeSelection>,
    pub top_k: Option<usize>,
    pub severity_gate: Option<SeverityGate>,
    pub deadline_secs: Option<u64>,
}

/// CLI value when given, else the parsed environment variable
fn layer<T, F>(cli: Option<T>, name: &str, lookup: &F) -> EngineResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match cli {
        Some(value) => Ok(Some(value)),
        None => constants::read_var(name, lookup),
    }
}

/// Runtime parameters for one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    /// Asset to route toward
    #[validate(range(min = 1))]
    pub target: AssetId,

    /// Minimum severity for a stepping-stone asset
    #[validate(range(min = 0.0, max = 10.0))]
    pub severity_threshold: f64,

    /// Cluster-aware, cluster-agnostic, or both
    pub cluster_mode: ModeSelection,

    /// Bound for the route ranking and application table
    #[validate(range(min = 1))]
    pub top_k: usize,

    /// Whether the target's own severity is checked
    pub severity_gate: SeverityGate,

    /// Wall-clock bound for the whole run (seconds)
    #[validate(range(min = 1))]
    pub deadline_secs: Option<u64>,
}

impl RunConfig {
    pub fn new(target: AssetId) -> Self {
        Self {
            target,
            severity_threshold: DEFAULT_SEVERITY_THRESHOLD,
            cluster_mode: ModeSelection::default(),
            top_k: DEFAULT_TOP_K,
            severity_gate: SeverityGate::default(),
            deadline_secs: None,
        }
    }

    /// Merge CLI flags over the process environment over the defaults
    pub fn resolve(cli: &CliOverrides) -> EngineResult<Self> {
        Self::resolve_with(cli, constants::env_var)
    }

    /// Same as [`RunConfig::resolve`], reading variables through `lookup`.
    ///
    /// Each field takes the CLI value when present, else the environment
    /// value, else the default. An env value shadowed by a flag is never parsed.
    pub fn resolve_with<F>(cli: &CliOverrides, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target = layer(cli.target, ENV_TARGET, &lookup)?.ok_or_else(|| {
            EngineError::InvalidConfig(format!(
                "no target given: pass --target or set {}",
                ENV_TARGET
            ))
        })?;

        let mut config = Self::new(target);
        if let Some(v) = layer(cli.severity_threshold, ENV_SEVERITY_THRESHOLD, &lookup)? {
            config.severity_threshold = v;
        }
        if let Some(v) = layer(cli.cluster_mode, ENV_CLUSTER_MODE, &lookup)? {
            config.cluster_mode = v;
        }
        if let Some(v) = layer(cli.top_k, ENV_TOP_K, &lookup)? {
            config.top_k = v;
        }
        if let Some(v) = layer(cli.severity_gate, ENV_SEVERITY_GATE, &lookup)? {
            config.severity_gate = v;
        }
        config.deadline_secs = layer(cli.deadline_secs, ENV_DEADLINE_SECS, &lookup)?;

        Ok(config)
    }

    /// Validate ranges; NaN thresholds are rejected too
    pub fn validate_all(&self) -> EngineResult<()> {
        self.validate()?;
        if !self.severity_threshold.is_finite() || self.severity_threshold > MAX_SEVERITY {
            return Err(EngineError::InvalidConfig(format!(
                "severity_threshold must be within 0-{}",
                MAX_SEVERITY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn cli_target(target: AssetId) -> CliOverrides {
        CliOverrides {
            target: Some(target),
            ..Default::default()
        }
    }

    #[test]
    fn test_cli_target_keeps_env_layers() {
        let lookup = env(&[
            ("ATTACKPATH_SEVERITY_THRESHOLD", "8.0"),
            ("ATTACKPATH_CLUSTER_MODE", "aware"),
            ("ATTACKPATH_TOP_K", "3"),
            ("ATTACKPATH_SEVERITY_GATE", "symmetric"),
            ("ATTACKPATH_DEADLINE_SECS", "30"),
        ]);
        let config = RunConfig::resolve_with(&cli_target(3), lookup).unwrap();

        assert_eq!(config.target, 3);
        assert_eq!(config.severity_threshold, 8.0);
        assert_eq!(config.cluster_mode, ModeSelection::Aware);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.severity_gate, SeverityGate::Symmetric);
        assert_eq!(config.deadline_secs, Some(30));
    }

    #[test]
    fn test_cli_flags_override_env() {
        let lookup = env(&[
            ("ATTACKPATH_TARGET", "5"),
            ("ATTACKPATH_SEVERITY_THRESHOLD", "8.0"),
            ("ATTACKPATH_TOP_K", "4"),
        ]);
        let cli = CliOverrides {
            target: Some(3),
            severity_threshold: Some(7.0),
            ..Default::default()
        };
        let config = RunConfig::resolve_with(&cli, lookup).unwrap();

        assert_eq!(config.target, 3);
        assert_eq!(config.severity_threshold, 7.0);
        assert_eq!(config.top_k, 4);
        assert_eq!(config.cluster_mode, ModeSelection::Both);
    }

    #[test]
    fn test_env_target_used_without_cli_target() {
        let lookup = env(&[("ATTACKPATH_TARGET", " 29 ")]);
        let config = RunConfig::resolve_with(&CliOverrides::default(), lookup).unwrap();
        assert_eq!(config, RunConfig::new(29));
    }

    #[test]
    fn test_missing_target_is_rejected() {
        match RunConfig::resolve_with(&CliOverrides::default(), env(&[])) {
            Err(EngineError::InvalidConfig(msg)) => assert!(msg.contains("ATTACKPATH_TARGET")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_env_values_are_rejected() {
        let lookup = env(&[("ATTACKPATH_SEVERITY_THRESHOLD", "abc")]);
        match RunConfig::resolve_with(&cli_target(3), lookup) {
            Err(EngineError::InvalidConfig(msg)) => {
                assert!(msg.contains("ATTACKPATH_SEVERITY_THRESHOLD"));
                assert!(msg.contains("abc"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        let lookup = env(&[("ATTACKPATH_TARGET", "three")]);
        match RunConfig::resolve_with(&CliOverrides::default(), lookup) {
            Err(EngineError::InvalidConfig(msg)) => assert!(msg.contains("'three'")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        for (name, raw) in [
            ("ATTACKPATH_TOP_K", "-1"),
            ("ATTACKPATH_DEADLINE_SECS", "soon"),
            ("ATTACKPATH_CLUSTER_MODE", "sideways"),
            ("ATTACKPATH_SEVERITY_GATE", "lenient"),
        ] {
            let result = RunConfig::resolve_with(&cli_target(3), env(&[(name, raw)]));
            assert!(matches!(result, Err(EngineError::InvalidConfig(_))), "{} accepted", name);
        }
    }

    #[test]
    fn test_shadowed_env_value_is_not_parsed() {
        let lookup = env(&[
            ("ATTACKPATH_TARGET", "not-a-number"),
            ("ATTACKPATH_CLUSTER_MODE", "sideways"),
        ]);
        let cli = CliOverrides {
            target: Some(3),
            cluster_mode: Some(ModeSelection::Agnostic),
            ..Default::default()
        };
        let config = RunConfig::resolve_with(&cli, lookup).unwrap();
        assert_eq!(config.cluster_mode, ModeSelection::Agnostic);
    }

    #[test]
    fn test_blank_env_value_keeps_default() {
        let lookup = env(&[("ATTACKPATH_SEVERITY_THRESHOLD", "  ")]);
        let config = RunConfig::resolve_with(&cli_target(3), lookup).unwrap();
        assert_eq!(config.severity_threshold, DEFAULT_SEVERITY_THRESHOLD);
    }

    #[test]
    fn test_resolve_reads_process_env() {
        // Only test in the crate that touches this variable
        std::env::set_var("ATTACKPATH_TOP_K", "7");
        let result = RunConfig::resolve(&cli_target(3));
        std::env::remove_var("ATTACKPATH_TOP_K");

        assert_eq!(result.unwrap().top_k, 7);
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::new(29);
        assert_eq!(config.severity_threshold, 6.3);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.cluster_mode, ModeSelection::Both);
        assert_eq!(config.severity_gate, SeverityGate::TargetExempt);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let mut config = RunConfig::new(29);
        config.severity_threshold = 12.0;
        match config.validate_all() {
            Err(EngineError::InvalidConfig(msg)) => assert!(msg.contains("severity_threshold")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let mut config = RunConfig::new(29);
        config.severity_threshold = f64::NAN;
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_rejects_zero_top_k_and_target() {
        let mut config = RunConfig::new(0);
        config.top_k = 0;
        match config.validate_all() {
            Err(EngineError::InvalidConfig(msg)) => {
                assert!(msg.contains("target"));
                assert!(msg.contains("top_k"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_selection_parsing() {
        assert_eq!("both".parse::<ModeSelection>(), Ok(ModeSelection::Both));
        assert_eq!("Aware".parse::<ModeSelection>(), Ok(ModeSelection::Aware));
        assert_eq!("false".parse::<ModeSelection>(), Ok(ModeSelection::Agnostic));
        assert!("sideways".parse::<ModeSelection>().is_err());
        assert_eq!(ModeSelection::Both.modes(), vec![ClusterMode::Aware, ClusterMode::Agnostic]);
    }
}
