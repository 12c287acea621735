//! Report Module
//!
//! Consumers of the engine's structured output. The core never formats
//! text; these sinks do.
//!
//! ## Structure
//! - `export`: JSON report and per-mode CSV tables
//! - `summary`: Printable top-K tables

pub mod export;
pub mod summary;

pub use export::{export_report, write_json};
