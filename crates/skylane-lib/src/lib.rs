//! Skylane library entry points.
//!
//! This crate exposes the city atlas and plane catalog, builds per-query
//! flight graphs, runs A* pathfinding over them, and resolves unit
//! conversions through a graph-backed lookup table. Higher-level consumers
//! (the CLI) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod atlas;
pub mod error;
pub mod flight;
pub mod graph;
pub mod plane;
pub mod route;
pub mod units;

pub use atlas::{City, CityAtlas};
pub use error::{Error, Result};
pub use flight::{compute_flight_stats, FlightStats, FlightStatsRequest, Upgrades};
pub use graph::{DirectedGraph, VertexId};
pub use plane::{Plane, PlaneCatalog, UpgradeLevel};
pub use route::{a_star, build_flight_graph, plan_flight, FlightPlan, FlightRequest, Waypoint};
pub use units::{apply, Conversion, ConvertFn, Unit, UnitStore};
