//! Osmpath library entry points.
//!
//! This crate exposes helpers to fetch OpenStreetMap road data for a bounding
//! box, build an undirected weighted road graph from it, and run pathfinding
//! algorithms over that graph. Higher-level consumers (the HTTP service)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.

#![deny(warnings)]

pub mod compare;
pub mod error;
pub mod geo;
pub mod graph;
pub mod nearest;
pub mod overpass;
pub mod routing;
pub mod search;

pub use compare::{compare_algorithms, AlgorithmOutcome, Comparison, ComparisonSummary};
pub use error::{Error, Result};
pub use geo::{haversine_distance, Coordinate};
pub use graph::{build_graph, Edge, NodeId, RoadGraph};
pub use nearest::nearest_node;
pub use overpass::{BoundingBox, OsmData, OsmElement, OverpassClient};
pub use routing::{
    compare_routes, compare_routes_with_data, plan_route, plan_route_with_data, RouteComparison,
    RoutePlan, RouteQuery,
};
pub use search::{SearchAlgorithm, SearchResult, SearchStats};
