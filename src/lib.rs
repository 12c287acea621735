//! Attack-path graph engine.
//!
//! Models lateral movement across a fleet of assets that share exploitable
//! software, then surfaces the shortest routes toward a designated target.
//!
//! ```ignore
//! use attackpath::{AttackPathEngine, RunConfig, load_catalog};
//!
//! let (catalog, load) = load_catalog(path)?;
//! let report = AttackPathEngine::new(catalog, RunConfig::new(29))
//!     .with_load_report(load)
//!     .run()?;
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use config::{CliOverrides, ModeSelection, RunConfig};
pub use error::{EngineError, EngineResult};
pub use logic::catalog::{load_catalog, read_catalog, Asset, AssetCatalog, AssetId, LoadReport};
pub use logic::engine::{AttackPathEngine, EngineReport, ModeReport};
pub use logic::graph::{ClusterMode, SeverityGate};
