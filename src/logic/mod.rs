//! Logic Module - Attack-Path Engines
//!
//! Catalog -> Graph -> Routing -> Report, plus the engine that runs the
//! pipeline per cluster mode.

pub mod catalog;
pub mod graph;
pub mod routing;
pub mod engine;
pub mod report;
