//! Asset Catalog Module
//!
//! Immutable view of the fleet: id, normalized apps, OS, mean severity and
//! cluster label per asset. Built once from the upstream tabular export.
//!
//! ## Structure
//! - `types`: Asset, AssetCatalog, row errors and the load report
//! - `loader`: CSV reader with row-level skip accounting

pub mod types;
pub mod loader;

#[cfg(test)]
mod tests;

pub use types::{
    normalize_app, parse_app_list, Asset, AssetCatalog, AssetId, ClusterId, LoadReport,
    RowError, RowErrorKind,
};
pub use loader::{load_catalog, read_catalog};
