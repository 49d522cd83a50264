mod common;

use common::{chain_fixture, detour_fixture, disconnected_fixture};
use osmpath_lib::{build_graph, compare_algorithms, SearchAlgorithm};

#[test]
fn outcomes_follow_the_fixed_algorithm_order() {
    let graph = build_graph(&chain_fixture()).expect("graph builds");
    let comparison = compare_algorithms(&graph, 1, 3);

    let order: Vec<SearchAlgorithm> = comparison.outcomes.iter().map(|o| o.algorithm).collect();
    assert_eq!(order, SearchAlgorithm::ALL.to_vec());
}

#[test]
fn all_algorithms_succeed_on_a_connected_graph() {
    let graph = build_graph(&chain_fixture()).expect("graph builds");
    let comparison = compare_algorithms(&graph, 1, 3);

    assert_eq!(comparison.summary.total_algorithms, 4);
    assert_eq!(comparison.summary.successful_algorithms, 4);

    for outcome in &comparison.outcomes {
        assert!(outcome.success, "{}", outcome.algorithm);
        assert!(outcome.elapsed_ms >= 0.0);
        assert!(outcome.nodes_explored >= 1);
        assert_eq!(outcome.node_count, Some(3));
        assert_eq!(outcome.path.len(), 3);
        assert!(outcome.error.is_none());
        let length = outcome.path_length_m.expect("length present on success");
        assert!((length - 20.0).abs() < 0.1);
    }
}

#[test]
fn rankings_are_present_when_any_algorithm_succeeds() {
    let graph = build_graph(&chain_fixture()).expect("graph builds");
    let summary = compare_algorithms(&graph, 1, 3).summary;

    assert!(summary.fastest.is_some());
    assert!(summary.fewest_nodes_explored.is_some());
    assert!(summary.shortest_path.is_some());
}

#[test]
fn zero_successes_omit_all_rankings() {
    let graph = build_graph(&disconnected_fixture()).expect("graph builds");
    let comparison = compare_algorithms(&graph, 1, 11);

    assert_eq!(comparison.summary.successful_algorithms, 0);
    assert!(comparison.summary.fastest.is_none());
    assert!(comparison.summary.fewest_nodes_explored.is_none());
    assert!(comparison.summary.shortest_path.is_none());

    for outcome in &comparison.outcomes {
        assert!(!outcome.success);
        assert!(outcome.path_length_m.is_none());
        assert!(outcome.node_count.is_none());
        assert!(outcome.path.is_empty());
        assert!(outcome.elapsed_ms >= 0.0);
        assert!(outcome.nodes_explored >= 1);
    }
}

#[test]
fn shortest_path_tie_goes_to_the_first_seen_algorithm() {
    // Dijkstra and A* produce equally short paths; the fixed iteration order
    // makes Dijkstra win the tie.
    let graph = build_graph(&detour_fixture()).expect("graph builds");
    let summary = compare_algorithms(&graph, 1, 3).summary;
    assert_eq!(summary.shortest_path, Some(SearchAlgorithm::Dijkstra));
}

#[test]
fn ranking_winners_actually_minimize_their_criterion() {
    let graph = build_graph(&detour_fixture()).expect("graph builds");
    let comparison = compare_algorithms(&graph, 1, 3);

    let winner = comparison
        .summary
        .fewest_nodes_explored
        .expect("ranking present");
    let winning = comparison
        .outcomes
        .iter()
        .find(|o| o.algorithm == winner)
        .unwrap();
    for outcome in comparison.outcomes.iter().filter(|o| o.success) {
        assert!(winning.nodes_explored <= outcome.nodes_explored);
    }
}

#[test]
fn single_node_route_reports_zero_length() {
    let graph = build_graph(&chain_fixture()).expect("graph builds");
    let comparison = compare_algorithms(&graph, 2, 2);

    assert_eq!(comparison.summary.successful_algorithms, 4);
    for outcome in &comparison.outcomes {
        assert_eq!(outcome.node_count, Some(1));
        assert_eq!(outcome.path_length_m, Some(0.0));
    }
}
