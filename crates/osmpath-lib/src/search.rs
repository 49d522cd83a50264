//! Graph search algorithms.
//!
//! Four interchangeable traversals share the same contract: borrow the graph,
//! walk from `start` until the goal node is *popped from the frontier* (not
//! merely discovered as a neighbour), and reconstruct the path from recorded
//! predecessors. An empty path means "no path found", never a partial one.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::geo::haversine_distance;
use crate::graph::{NodeId, RoadGraph};

/// Supported search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    /// Weighted shortest path via a min-priority queue.
    #[default]
    Dijkstra,
    /// Weighted shortest path guided by the great-circle heuristic.
    AStar,
    /// Fewest-edge path; ignores edge weights.
    Bfs,
    /// Depth-first exploration; no optimality guarantee.
    Dfs,
}

impl SearchAlgorithm {
    /// Fixed iteration order used by the comparison layer and for ranking
    /// tie-breaks.
    pub const ALL: [SearchAlgorithm; 4] = [
        SearchAlgorithm::Dijkstra,
        SearchAlgorithm::AStar,
        SearchAlgorithm::Bfs,
        SearchAlgorithm::Dfs,
    ];

    /// Parse an algorithm selector; unrecognized names fall back to Dijkstra.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "astar" => SearchAlgorithm::AStar,
            "bfs" => SearchAlgorithm::Bfs,
            "dfs" => SearchAlgorithm::Dfs,
            _ => SearchAlgorithm::Dijkstra,
        }
    }

    /// Run this algorithm over `graph` from `start` to `goal`.
    ///
    /// Both endpoints must be registered graph nodes; the nearest-node
    /// locator guarantees that upstream. When `want_stats` is set the result
    /// carries the count of nodes expanded during the search.
    pub fn search(
        self,
        graph: &RoadGraph,
        start: NodeId,
        goal: NodeId,
        want_stats: bool,
    ) -> SearchResult {
        let (path, explored) = match self {
            SearchAlgorithm::Dijkstra => dijkstra(graph, start, goal),
            SearchAlgorithm::AStar => a_star(graph, start, goal),
            SearchAlgorithm::Bfs => bfs(graph, start, goal),
            SearchAlgorithm::Dfs => dfs(graph, start, goal),
        };
        SearchResult {
            path,
            stats: want_stats.then_some(SearchStats {
                nodes_explored: explored,
            }),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchAlgorithm::Dijkstra => "dijkstra",
            SearchAlgorithm::AStar => "astar",
            SearchAlgorithm::Bfs => "bfs",
            SearchAlgorithm::Dfs => "dfs",
        };
        f.write_str(name)
    }
}

/// Exploration statistics produced alongside a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Distinct nodes expanded (popped from the frontier and processed),
    /// counted once each regardless of how often they were enqueued.
    pub nodes_explored: usize,
}

/// Outcome of a single search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Node sequence from start to goal inclusive; empty when no path exists.
    pub path: Vec<NodeId>,
    pub stats: Option<SearchStats>,
}

fn dijkstra(graph: &RoadGraph, start: NodeId, goal: NodeId) -> (Vec<NodeId>, usize) {
    let mut distances: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut frontier = BinaryHeap::new();
    let mut explored = 0usize;

    distances.insert(start, 0.0);
    parents.insert(start, None);
    frontier.push(FrontierEntry::new(start, 0.0, 0.0));

    while let Some(entry) = frontier.pop() {
        let best = *distances.get(&entry.node).unwrap_or(&f64::INFINITY);
        if entry.cost.0 > best {
            // Lazily deleted entry superseded by a cheaper one.
            continue;
        }
        explored += 1;

        if entry.node == goal {
            return (reconstruct_path(&parents, start, goal), explored);
        }

        for edge in graph.neighbours(entry.node) {
            let next_cost = best + edge.distance;
            if next_cost < *distances.get(&edge.target).unwrap_or(&f64::INFINITY) {
                distances.insert(edge.target, next_cost);
                parents.insert(edge.target, Some(entry.node));
                frontier.push(FrontierEntry::new(edge.target, next_cost, next_cost));
            }
        }
    }

    (Vec::new(), explored)
}

fn a_star(graph: &RoadGraph, start: NodeId, goal: NodeId) -> (Vec<NodeId>, usize) {
    let goal_coordinate = graph.coordinate(goal);
    let heuristic = |node: NodeId| -> f64 {
        match (graph.coordinate(node), goal_coordinate) {
            (Some(from), Some(to)) => haversine_distance(from, to),
            _ => 0.0,
        }
    };

    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut frontier = BinaryHeap::new();
    let mut explored = 0usize;

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    frontier.push(FrontierEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = frontier.pop() {
        let best = *g_score.get(&entry.node).unwrap_or(&f64::INFINITY);
        if entry.cost.0 > best {
            continue;
        }
        explored += 1;

        if entry.node == goal {
            return (reconstruct_path(&parents, start, goal), explored);
        }

        for edge in graph.neighbours(entry.node) {
            let tentative = best + edge.distance;
            if tentative < *g_score.get(&edge.target).unwrap_or(&f64::INFINITY) {
                g_score.insert(edge.target, tentative);
                parents.insert(edge.target, Some(entry.node));
                frontier.push(FrontierEntry::new(
                    edge.target,
                    tentative,
                    tentative + heuristic(edge.target),
                ));
            }
        }
    }

    (Vec::new(), explored)
}

fn bfs(graph: &RoadGraph, start: NodeId, goal: NodeId) -> (Vec<NodeId>, usize) {
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut queue = VecDeque::new();
    let mut explored = 0usize;

    parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        explored += 1;

        if current == goal {
            return (reconstruct_path(&parents, start, goal), explored);
        }

        for edge in graph.neighbours(current) {
            if !parents.contains_key(&edge.target) {
                parents.insert(edge.target, Some(current));
                queue.push_back(edge.target);
            }
        }
    }

    (Vec::new(), explored)
}

fn dfs(graph: &RoadGraph, start: NodeId, goal: NodeId) -> (Vec<NodeId>, usize) {
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![start];
    let mut explored = 0usize;

    parents.insert(start, None);

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        explored += 1;

        if current == goal {
            return (reconstruct_path(&parents, start, goal), explored);
        }

        for edge in graph.neighbours(current) {
            if !visited.contains(&edge.target) {
                parents.insert(edge.target, Some(current));
                stack.push(edge.target);
            }
        }
    }

    (Vec::new(), explored)
}

/// Walk predecessor links backwards from `goal` and reverse.
///
/// Returns the empty path when the chain does not reach `start`; correct
/// predecessor bookkeeping never triggers this, but it guards against a
/// disconnected chain.
fn reconstruct_path(
    parents: &HashMap<NodeId, Option<NodeId>>,
    start: NodeId,
    goal: NodeId,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            path.reverse();
            return path;
        }
        current = parents.get(&node).copied().flatten();
    }
    Vec::new()
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Priority-queue entry shared by Dijkstra and A*.
///
/// `cost` is the tentative distance from the start used for the stale-entry
/// check; `priority` is what the heap orders on (equal to `cost` for
/// Dijkstra, `cost` plus the heuristic for A*).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeId,
    cost: FloatOrd,
    priority: FloatOrd,
}

impl FrontierEntry {
    fn new(node: NodeId, cost: f64, priority: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            priority: FloatOrd(priority),
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
