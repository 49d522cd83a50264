//! Run all four algorithms over the same graph and rank the outcomes.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use serde::Serialize;
use tracing::warn;

use crate::geo::Coordinate;
use crate::graph::{NodeId, RoadGraph};
use crate::search::{SearchAlgorithm, SearchResult};

/// Per-algorithm outcome of a comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmOutcome {
    pub algorithm: SearchAlgorithm,
    pub success: bool,
    /// Wall-clock time of the search call only.
    pub elapsed_ms: f64,
    pub nodes_explored: usize,
    /// Sum of great-circle distances along the returned path; absent on
    /// failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_length_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<usize>,
    pub path: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Derived rankings over the successful outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub total_algorithms: usize,
    pub successful_algorithms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest: Option<SearchAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fewest_nodes_explored: Option<SearchAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest_path: Option<SearchAlgorithm>,
}

/// Outcomes for all four algorithms plus their summary.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub outcomes: Vec<AlgorithmOutcome>,
    pub summary: ComparisonSummary,
}

/// Run every algorithm over the same graph and endpoints, timing each run
/// independently.
///
/// Runs are isolated: a panic inside one search is captured as that
/// algorithm's failure outcome and the remaining runs proceed.
pub fn compare_algorithms(graph: &RoadGraph, start: NodeId, goal: NodeId) -> Comparison {
    compare_with(graph, |algorithm| {
        algorithm.search(graph, start, goal, true)
    })
}

/// Comparison core with an injectable per-algorithm runner; the runner
/// captures the endpoints.
fn compare_with<F>(graph: &RoadGraph, run: F) -> Comparison
where
    F: Fn(SearchAlgorithm) -> SearchResult,
{
    let outcomes: Vec<AlgorithmOutcome> = SearchAlgorithm::ALL
        .into_iter()
        .map(|algorithm| run_algorithm(graph, algorithm, &run))
        .collect();
    let summary = summarize(&outcomes);
    Comparison { outcomes, summary }
}

fn run_algorithm<F>(graph: &RoadGraph, algorithm: SearchAlgorithm, run: &F) -> AlgorithmOutcome
where
    F: Fn(SearchAlgorithm) -> SearchResult,
{
    let started = Instant::now();
    let result = catch_unwind(AssertUnwindSafe(|| run(algorithm)));
    let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;

    match result {
        Ok(result) => {
            let nodes_explored = result.stats.map(|s| s.nodes_explored).unwrap_or(0);
            if result.path.is_empty() {
                AlgorithmOutcome {
                    algorithm,
                    success: false,
                    elapsed_ms,
                    nodes_explored,
                    path_length_m: None,
                    node_count: None,
                    path: Vec::new(),
                    error: None,
                }
            } else {
                AlgorithmOutcome {
                    algorithm,
                    success: true,
                    elapsed_ms,
                    nodes_explored,
                    path_length_m: Some(graph.path_length(&result.path)),
                    node_count: Some(result.path.len()),
                    path: graph.path_coordinates(&result.path),
                    error: None,
                }
            }
        }
        Err(panic) => {
            let message = panic_message(panic);
            warn!(%algorithm, error = %message, "search run panicked");
            AlgorithmOutcome {
                algorithm,
                success: false,
                elapsed_ms,
                nodes_explored: 0,
                path_length_m: None,
                node_count: None,
                path: Vec::new(),
                error: Some(message),
            }
        }
    }
}

fn summarize(outcomes: &[AlgorithmOutcome]) -> ComparisonSummary {
    let successful: Vec<&AlgorithmOutcome> = outcomes.iter().filter(|o| o.success).collect();

    ComparisonSummary {
        total_algorithms: outcomes.len(),
        successful_algorithms: successful.len(),
        fastest: rank_by(&successful, |o| o.elapsed_ms),
        fewest_nodes_explored: rank_by(&successful, |o| o.nodes_explored as f64),
        shortest_path: rank_by(&successful, |o| o.path_length_m.unwrap_or(f64::INFINITY)),
    }
}

/// Strict-minimum selection; on ties the earlier outcome wins.
fn rank_by<F>(successful: &[&AlgorithmOutcome], key: F) -> Option<SearchAlgorithm>
where
    F: Fn(&AlgorithmOutcome) -> f64,
{
    let mut best: Option<(SearchAlgorithm, f64)> = None;
    for outcome in successful {
        let value = key(outcome);
        if best.map_or(true, |(_, best_value)| value < best_value) {
            best = Some((outcome.algorithm, value));
        }
    }
    best.map(|(algorithm, _)| algorithm)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "search run panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three colinear nodes 10 m apart: 1 - 2 - 3.
    fn chain_graph() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_node(1, Coordinate::new(0.0, 0.0));
        graph.add_node(2, Coordinate::new(0.00009, 0.0));
        graph.add_node(3, Coordinate::new(0.00018, 0.0));
        graph.add_edge(1, 2, 10.0);
        graph.add_edge(2, 3, 10.0);
        graph
    }

    #[test]
    fn a_panicking_run_does_not_abort_the_others() {
        let graph = chain_graph();
        let comparison = compare_with(&graph, |algorithm| {
            if algorithm == SearchAlgorithm::Bfs {
                panic!("frontier corrupted");
            }
            algorithm.search(&graph, 1, 3, true)
        });

        assert_eq!(comparison.outcomes.len(), 4);
        assert_eq!(comparison.summary.successful_algorithms, 3);

        for outcome in &comparison.outcomes {
            if outcome.algorithm == SearchAlgorithm::Bfs {
                assert!(!outcome.success);
                assert_eq!(outcome.error.as_deref(), Some("frontier corrupted"));
                assert!(outcome.path.is_empty());
            } else {
                assert!(outcome.success, "{}", outcome.algorithm);
                assert!(outcome.error.is_none());
            }
        }
    }

    #[test]
    fn rankings_skip_the_panicked_algorithm() {
        let graph = chain_graph();
        let comparison = compare_with(&graph, |algorithm| {
            if algorithm == SearchAlgorithm::Dijkstra {
                panic!("frontier corrupted");
            }
            algorithm.search(&graph, 1, 3, true)
        });

        let summary = comparison.summary;
        assert_ne!(summary.fastest, Some(SearchAlgorithm::Dijkstra));
        assert_ne!(summary.fewest_nodes_explored, Some(SearchAlgorithm::Dijkstra));
        assert_ne!(summary.shortest_path, Some(SearchAlgorithm::Dijkstra));
        assert!(summary.shortest_path.is_some());
    }

    #[test]
    fn panic_message_handles_common_payloads() {
        assert_eq!(panic_message(Box::new("static message")), "static message");
        assert_eq!(
            panic_message(Box::new(String::from("owned message"))),
            "owned message"
        );
        // Payloads that are neither &str nor String fall back to a fixed text.
        assert_eq!(panic_message(Box::new(42u32)), "search run panicked");
    }
}
