//! Routing Module
//!
//! Everything downstream of a built graph: shortest routes toward the
//! target, their union as a directed subgraph, and route-level rankings.
//!
//! ## Structure
//! - `router`: BFS from the target, deterministic tie-breaking
//! - `spg`: Shortest-path subgraph extractor
//! - `aggregate`: Route ranking and shared-application frequency

pub mod router;
pub mod spg;
pub mod aggregate;


pub use router::{shortest_routes, Route, RouteMap, ShortestPathTree};
pub use spg::ShortestPathSubgraph;
pub use aggregate::{app_frequency, count_route_apps, rank_routes, AppFrequency, RankedRoute};
