//! Nearest-node lookup over the graph coordinate mapping.

use std::collections::HashMap;

use crate::geo::Coordinate;
use crate::graph::NodeId;

/// Find the graph node closest to `query` by great-circle distance.
///
/// Exhaustive linear scan using the same metric as edge weights. Returns
/// `None` when the mapping is empty. Exact ties resolve to the smaller node
/// identifier so map iteration order cannot leak into results.
pub fn nearest_node(
    coordinates: &HashMap<NodeId, Coordinate>,
    query: Coordinate,
) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;

    for (&node, &coordinate) in coordinates {
        let distance = coordinate.distance_to(&query);
        let better = match best {
            None => true,
            Some((best_node, best_distance)) => {
                distance < best_distance || (distance == best_distance && node < best_node)
            }
        };
        if better {
            best = Some((node, distance));
        }
    }

    best.map(|(node, _)| node)
}
