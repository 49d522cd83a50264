// Shared fixtures for `osmpath-lib` integration tests.
#![allow(dead_code)]

use osmpath_lib::{OsmData, OsmElement};

/// Meters per degree of latitude on the mean sphere.
pub const METERS_PER_DEGREE: f64 = 111_194.926;

pub fn node(id: i64, lat: f64, lon: f64) -> OsmElement {
    OsmElement::Node { id, lat, lon }
}

pub fn way(id: i64, nodes: &[i64]) -> OsmElement {
    OsmElement::Way {
        id,
        nodes: nodes.to_vec(),
    }
}

pub fn osm(elements: Vec<OsmElement>) -> OsmData {
    OsmData { elements }
}

/// Three colinear nodes 10 m apart on one road: 1 - 2 - 3.
pub fn chain_fixture() -> OsmData {
    let step = 10.0 / METERS_PER_DEGREE;
    osm(vec![
        node(1, 0.0, 0.0),
        node(2, step, 0.0),
        node(3, 2.0 * step, 0.0),
        way(100, &[1, 2, 3]),
    ])
}

/// Two triangles roughly 150 km apart with no connecting road.
///
/// Component X: nodes 1, 2, 3. Component Y: nodes 11, 12, 13.
pub fn disconnected_fixture() -> OsmData {
    osm(vec![
        node(1, 0.0, 0.0),
        node(2, 0.001, 0.0),
        node(3, 0.0, 0.001),
        node(11, 1.0, 1.0),
        node(12, 1.001, 1.0),
        node(13, 1.0, 1.001),
        way(100, &[1, 2, 3, 1]),
        way(101, &[11, 12, 13, 11]),
    ])
}

/// Start node 1 and end node 3 roughly 200 m apart, connected by a two-hop
/// dog-leg detour (~283 m via node 5) and a three-hop straight route
/// (~200 m via nodes 6 and 7).
///
/// BFS prefers the detour (fewer edges); Dijkstra and A* prefer the longer
/// hop count with the shorter total distance.
pub fn detour_fixture() -> OsmData {
    osm(vec![
        node(1, 0.0, 0.0),
        node(3, 0.0018, 0.0),
        node(5, 0.0009, 0.0009),
        node(6, 0.0006, 0.0),
        node(7, 0.0012, 0.0),
        way(100, &[1, 5, 3]),
        way(101, &[1, 6, 7, 3]),
    ])
}
