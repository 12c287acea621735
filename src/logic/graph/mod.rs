//! Attack Graph Module
//!
//! Decides which asset pairs are connected and materializes the undirected
//! attack graph. One builder, parameterized by [`ClusterMode`], serves both
//! the cluster-aware and the cluster-agnostic pipelines.
//!
//! ## Structure
//! - `policy`: Edge rule (shared apps, severity gate, cluster membership)
//! - `types`: Edge, AttackGraph, GraphStats
//! - `builder`: Pairwise and app-indexed graph construction

pub mod policy;
pub mod types;
pub mod builder;


pub use policy::{ClusterMode, EdgePolicy, SeverityGate};
pub use types::{AttackGraph, Edge, GraphStats};
pub use builder::{build_graph, build_indexed, build_pairwise};
