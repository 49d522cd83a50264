//! High-level route planning entry points.
//!
//! These functions tie the pipeline together: fetch raw records for a
//! bounding box, build the road graph, snap the requested endpoints to graph
//! nodes, and run one algorithm ([`plan_route`]) or all four
//! ([`compare_routes`]). The `_with_data` variants accept a pre-fetched
//! record set so callers and tests can bypass the network.

use serde::Serialize;
use tracing::info;

use crate::compare::{compare_algorithms, AlgorithmOutcome, ComparisonSummary};
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{build_graph, NodeId, RoadGraph};
use crate::nearest::nearest_node;
use crate::overpass::{BoundingBox, OsmData, OverpassClient};
use crate::search::SearchAlgorithm;

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub start: Coordinate,
    pub end: Coordinate,
    pub bbox: BoundingBox,
    pub algorithm: SearchAlgorithm,
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: SearchAlgorithm,
    /// Graph node the requested start was snapped to.
    pub start_node: Coordinate,
    /// Graph node the requested end was snapped to.
    pub end_node: Coordinate,
    pub length_m: f64,
    /// Coordinate sequence from start to end inclusive.
    pub path: Vec<Coordinate>,
}

/// Comparison of all four algorithms over one request.
#[derive(Debug, Clone, Serialize)]
pub struct RouteComparison {
    pub start_node: Coordinate,
    pub end_node: Coordinate,
    pub outcomes: Vec<AlgorithmOutcome>,
    pub summary: ComparisonSummary,
}

/// Compute a route with the requested algorithm.
pub fn plan_route(client: &OverpassClient, query: &RouteQuery) -> Result<RoutePlan> {
    let data = client.fetch(&query.bbox)?;
    plan_route_with_data(&data, query)
}

/// Compute a route over a pre-fetched record set.
pub fn plan_route_with_data(data: &OsmData, query: &RouteQuery) -> Result<RoutePlan> {
    let graph = build_graph(data)?;
    let (start, start_node) = snap(&graph, query.start, "start")?;
    let (end, end_node) = snap(&graph, query.end, "end")?;

    info!(algorithm = %query.algorithm, start, end, "searching for route");
    let result = query.algorithm.search(&graph, start, end, false);
    if result.path.is_empty() {
        return Err(Error::RouteNotFound);
    }

    Ok(RoutePlan {
        algorithm: query.algorithm,
        start_node,
        end_node,
        length_m: graph.path_length(&result.path),
        path: graph.path_coordinates(&result.path),
    })
}

/// Run all four algorithms over one request and rank the outcomes.
///
/// Unlike [`plan_route`], an unreachable goal is not an error here: it shows
/// up as a zero-success summary.
pub fn compare_routes(client: &OverpassClient, query: &RouteQuery) -> Result<RouteComparison> {
    let data = client.fetch(&query.bbox)?;
    compare_routes_with_data(&data, query)
}

/// Compare all four algorithms over a pre-fetched record set.
pub fn compare_routes_with_data(data: &OsmData, query: &RouteQuery) -> Result<RouteComparison> {
    let graph = build_graph(data)?;
    let (start, start_node) = snap(&graph, query.start, "start")?;
    let (end, end_node) = snap(&graph, query.end, "end")?;

    info!(start, end, "comparing all algorithms");
    let comparison = compare_algorithms(&graph, start, end);

    Ok(RouteComparison {
        start_node,
        end_node,
        outcomes: comparison.outcomes,
        summary: comparison.summary,
    })
}

/// Snap a requested coordinate to the nearest graph node.
fn snap(
    graph: &RoadGraph,
    target: Coordinate,
    which: &'static str,
) -> Result<(NodeId, Coordinate)> {
    let node = nearest_node(graph.coordinates(), target)
        .ok_or(Error::UnresolvableEndpoint { which })?;
    let coordinate = graph
        .coordinate(node)
        .ok_or(Error::UnresolvableEndpoint { which })?;
    Ok((node, coordinate))
}
