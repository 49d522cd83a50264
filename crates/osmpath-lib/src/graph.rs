//! Road graph construction from raw Overpass records.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{haversine_distance, Coordinate};
use crate::overpass::{OsmData, OsmElement};

/// OpenStreetMap node identifier.
pub type NodeId = i64;

/// One directed half of an undirected road edge.
#[derive(Debug, Clone)]
pub struct Edge {
    pub target: NodeId,
    /// Great-circle length of the edge in meters.
    pub distance: f64,
}

/// Undirected weighted graph over OSM road nodes.
///
/// Built once per request and immutable afterwards; searches borrow it and
/// never mutate it.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    adjacency: HashMap<NodeId, Vec<Edge>>,
    coordinates: HashMap<NodeId, Coordinate>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with an empty adjacency list.
    pub fn add_node(&mut self, node: NodeId, coordinate: Coordinate) {
        self.coordinates.insert(node, coordinate);
        self.adjacency.entry(node).or_default();
    }

    /// Append an undirected edge between two registered nodes.
    ///
    /// The caller is responsible for deduplication; [`build_graph`] keys
    /// edges by canonical unordered pair before calling this.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, distance: f64) {
        self.adjacency.entry(u).or_default().push(Edge {
            target: v,
            distance,
        });
        self.adjacency.entry(v).or_default().push(Edge {
            target: u,
            distance,
        });
    }

    /// Return the neighbours reachable in one hop from `node`.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Coordinate of a graph node, if registered.
    pub fn coordinate(&self, node: NodeId) -> Option<Coordinate> {
        self.coordinates.get(&node).copied()
    }

    /// Full node-to-coordinate mapping.
    pub fn coordinates(&self) -> &HashMap<NodeId, Coordinate> {
        &self.coordinates
    }

    pub fn node_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Great-circle length of a node path in meters.
    ///
    /// Zero for empty and single-node paths.
    pub fn path_length(&self, path: &[NodeId]) -> f64 {
        path.windows(2)
            .filter_map(|pair| {
                let a = self.coordinate(pair[0])?;
                let b = self.coordinate(pair[1])?;
                Some(haversine_distance(a, b))
            })
            .sum()
    }

    /// Map a node path to its coordinate sequence.
    ///
    /// Nodes without a registered coordinate are dropped; paths produced by
    /// the search engine only ever contain registered nodes.
    pub fn path_coordinates(&self, path: &[NodeId]) -> Vec<Coordinate> {
        path.iter()
            .filter_map(|&node| self.coordinate(node))
            .collect()
    }
}

/// Build the road graph from a raw Overpass record set.
///
/// Every node record becomes a graph node; every consecutive pair of node
/// identifiers within a way becomes one undirected edge weighted by
/// great-circle distance. Duplicate unordered pairs are collapsed, self-loops
/// are skipped, and way references to unknown nodes produce no edge.
pub fn build_graph(data: &OsmData) -> Result<RoadGraph> {
    let mut graph = RoadGraph::new();

    for element in &data.elements {
        if let OsmElement::Node { id, lat, lon } = element {
            graph.add_node(*id, Coordinate::new(*lat, *lon));
        }
    }

    if graph.is_empty() {
        return Err(Error::EmptyRegion);
    }

    let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();
    let mut edges = 0usize;

    for element in &data.elements {
        let OsmElement::Way { nodes, .. } = element else {
            continue;
        };
        for pair in nodes.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            if u == v {
                continue;
            }
            let key = (u.min(v), u.max(v));
            if seen.contains(&key) {
                continue;
            }
            let (Some(a), Some(b)) = (graph.coordinate(u), graph.coordinate(v)) else {
                continue;
            };
            seen.insert(key);
            graph.add_edge(u, v, haversine_distance(a, b));
            edges += 1;
        }
    }

    debug!(nodes = graph.node_count(), edges, "road graph built");
    Ok(graph)
}
