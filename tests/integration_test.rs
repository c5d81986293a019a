// Integration tests for roadflow
use rand::prelude::*;
use rand::rngs::StdRng;
use roadflow::prelude::*;
use roadflow::build_directed;
use std::io::Write;

const EXTRACT: &str = r#"{
    "nodes": [
        {"id": 1, "lat": 10.800, "lon": 106.700},
        {"id": 2, "lat": 10.801, "lon": 106.701},
        {"id": 3, "lat": 10.799, "lon": 106.701},
        {"id": 4, "lat": 10.800, "lon": 106.702},
        {"id": 5, "lat": 10.802, "lon": 106.702},
        {"id": 6, "lat": 10.800, "lon": 106.703}
    ],
    "edges": [
        {"from": 1, "to": 2, "highway": "primary", "lanes": "2"},
        {"from": 1, "to": 3, "highway": "secondary"},
        {"from": 2, "to": 4, "highway": "tertiary", "oneway": "yes"},
        {"from": 3, "to": 4, "highway": "residential"},
        {"from": 2, "to": 5, "highway": "service", "oneway": true},
        {"from": 4, "to": 6, "highway": "trunk", "lanes": 2},
        {"u": 5, "v": 6}
    ]
}"#;

const LOCATIONS: &str = r#"{
    "map_radius_m": 1000,
    "locations": {
        "depot": { "name": "Bus Depot", "coords": [10.800, 106.700] },
        "airport": { "name": "Airport Gate", "coords": [10.8001, 106.7031] }
    }
}"#;

fn extract_graph() -> Graph {
    NetworkExtract::from_json(EXTRACT).unwrap().build_graph().unwrap()
}

fn nodes(ids: impl IntoIterator<Item = NodeId>) -> Vec<RawNode> {
    ids.into_iter()
        .map(|id| RawNode { id, lat: 0.0, lon: id as f64 * 1e-3 })
        .collect()
}

/// Random street grid with mixed road classes, lane counts and one-way segments
fn random_grid(rows: u64, cols: u64, seed: u64) -> Graph {
    const CLASSES: [&str; 6] = ["primary", "secondary", "tertiary", "residential", "service", "trunk_link"];
    let mut rng = StdRng::seed_from_u64(seed);
    let id = |r: u64, c: u64| r * cols + c + 1;

    let mut raw_nodes = Vec::new();
    let mut raw_edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            raw_nodes.push(RawNode {
                id: id(r, c),
                lat: 10.78 + r as f64 * 1e-3,
                lon: 106.65 + c as f64 * 1e-3,
            });
            let mut neighbours = Vec::new();
            if r + 1 < rows {
                neighbours.push(id(r + 1, c));
            }
            if c + 1 < cols {
                neighbours.push(id(r, c + 1));
            }
            for to in neighbours {
                let class = CLASSES[rng.random_range(0..CLASSES.len())];
                let mut edge = RawEdge::new(id(r, c), to, class).with_lanes(rng.random_range(1..=3));
                if rng.random_bool(0.3) {
                    edge = edge.one_way();
                }
                raw_edges.push(edge);
            }
        }
    }
    build(&raw_nodes, &raw_edges).unwrap()
}

#[test]
fn test_extract_to_flow_pipeline() {
    let graph = extract_graph();
    let config = LocationsConfig::from_json(LOCATIONS).unwrap();

    let resolved = resolve_locations(&graph, &config.key_locations()).unwrap();
    let airport = resolved.iter().find(|r| r.key == "airport").unwrap();
    let depot = resolved.iter().find(|r| r.key == "depot").unwrap();
    assert_eq!(depot.node, 1);
    assert_eq!(depot.distance_m, 0.0);
    assert_eq!(airport.node, 6);
    assert!(airport.distance_m > 0.0 && airport.distance_m < 50.0);

    for algorithm in Algorithm::ALL {
        let (result, cut) = min_cut(&graph, depot.node, airport.node, algorithm).unwrap();
        // Bottleneck is 2->4 tertiary, 3->4 residential and 2->5 service
        assert_eq!(result.value, 1200.0 + 800.0 + 500.0, "{}", algorithm);
        assert_eq!(cut.capacity, result.value);
        assert_eq!(cut.source_side, vec![1, 2, 3]);
        let cut_pairs: Vec<(NodeId, NodeId)> = cut
            .edges
            .iter()
            .map(|&e| (graph.edges()[e].from, graph.edges()[e].to))
            .collect();
        assert_eq!(cut_pairs, vec![(2, 4), (2, 5), (3, 4)]);

        assert!(result.assignment.conservation_error(&graph, 1, 6) < 1e-9);
        assert_eq!(result.assignment.capacity_violation(&graph), 0.0);
        assert_eq!(result.assignment.between(&graph, 2, 4), 1200.0);
        assert_eq!(result.assignment.outflow(&graph, 1), result.value);
        assert_eq!(result.assignment.inflow(&graph, 6), result.value);
    }
}

#[test]
fn test_single_road_segment() {
    let graph = build(&nodes([1, 2]), &[RawEdge::new(1, 2, "primary").one_way()]).unwrap();
    let result = max_flow(&graph, 1, 2, Algorithm::Dinic).unwrap();
    assert_eq!(result.value, 1600.0);
    assert_eq!(result.assignment.between(&graph, 1, 2), 1600.0);
}

#[test]
fn test_chain_limited_by_narrowest_road() {
    let graph = build(
        &nodes([1, 2, 3]),
        &[
            RawEdge::new(1, 2, "motorway").with_lanes(3),
            RawEdge::new(2, 3, "living_street"),
        ],
    )
    .unwrap();
    for algorithm in Algorithm::ALL {
        let result = max_flow(&graph, 1, 3, algorithm).unwrap();
        assert_eq!(result.value, 400.0);
        assert_eq!(result.assignment.between(&graph, 1, 2), 400.0);
        assert_eq!(result.assignment.between(&graph, 2, 1), 0.0);
    }
}

#[test]
fn test_one_way_against_flow_direction() {
    let graph = build(&nodes([1, 2]), &[RawEdge::new(2, 1, "primary").one_way()]).unwrap();
    let result = max_flow(&graph, 1, 2, Algorithm::EdmondsKarp).unwrap();
    assert_eq!(result.value, 0.0);
    assert!(result.assignment.is_all_zero());
    assert!(result.paths.is_empty());
}

#[test]
fn test_diamond() {
    let graph = build_directed(
        &nodes([1, 2, 3, 4]),
        &[(1, 2, 4.0), (1, 3, 6.0), (2, 4, 5.0), (3, 4, 5.0)],
    )
    .unwrap();
    for algorithm in Algorithm::ALL {
        let result = max_flow(&graph, 1, 4, algorithm).unwrap();
        assert_eq!(result.value, 9.0);
        let pushed: f64 = result.paths.iter().map(|p| p.flow).sum();
        assert_eq!(pushed, 9.0);
        for path in &result.paths {
            assert_eq!(path.nodes.first(), Some(&1));
            assert_eq!(path.nodes.last(), Some(&4));
        }
    }
}

#[test]
fn test_random_grids_agree_and_stay_feasible() {
    for seed in 0..8 {
        let graph = random_grid(6, 7, seed);
        let (source, sink) = (1, graph.node_count() as NodeId);

        let values: Vec<f64> = Algorithm::ALL
            .iter()
            .map(|&algorithm| {
                let (result, cut) = min_cut(&graph, source, sink, algorithm).unwrap();
                assert!(result.assignment.conservation_error(&graph, source, sink) < 1e-6);
                assert!(result.assignment.capacity_violation(&graph) < 1e-6);
                assert!((cut.capacity - result.value).abs() < 1e-6);
                assert!(cut.on_source_side(source));
                assert!(!cut.on_source_side(sink));
                result.value
            })
            .collect();

        for value in &values[1..] {
            assert!((value - values[0]).abs() < 1e-9, "seed {}: {:?}", seed, values);
        }
    }
}

#[test]
fn test_solve_many_matches_single_solves() {
    let graph = random_grid(5, 5, 42);
    let requests: Vec<FlowRequest> = [(1, 25), (25, 1), (3, 21), (5, 5)]
        .iter()
        .map(|&(s, t)| FlowRequest::new(s, t, Algorithm::Dinic))
        .collect();

    let results = solve_many(&graph, &requests, &SolveOptions::default());
    for (request, result) in requests.iter().zip(&results).take(3) {
        let expected = max_flow(&graph, request.source, request.sink, Algorithm::EdmondsKarp).unwrap();
        assert!((result.as_ref().unwrap().value - expected.value).abs() < 1e-9);
    }
    assert!(matches!(results[3], Err(Error::InvalidEndpoints { .. })));
}

#[test]
fn test_cancelled_solve() {
    let graph = random_grid(4, 4, 7);
    let token = CancelToken::new();
    token.cancel();
    let options = SolveOptions::default().with_cancel(token);
    for algorithm in Algorithm::ALL {
        assert!(matches!(
            max_flow_with(&graph, 1, 16, algorithm, &options),
            Err(Error::Cancelled)
        ));
    }
}

#[test]
fn test_unknown_endpoint() {
    let graph = extract_graph();
    assert!(matches!(
        max_flow(&graph, 1, 99, Algorithm::Dinic),
        Err(Error::InvalidEndpoints { sink_id: 99, .. })
    ));
}

#[test]
fn test_load_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let network_path = dir.path().join("extract.json");
    let locations_path = dir.path().join("locations.json");
    std::fs::File::create(&network_path)
        .unwrap()
        .write_all(EXTRACT.as_bytes())
        .unwrap();
    std::fs::write(&locations_path, LOCATIONS).unwrap();

    let graph = load_network(&network_path).unwrap().build_graph().unwrap();
    let config = load_locations(&locations_path).unwrap();
    assert_eq!(config.map_radius_m, 1000.0);

    let depot = config.get("depot").unwrap();
    let airport = config.get("airport").unwrap();
    let source = resolve(&graph, depot.coordinate).unwrap();
    let sink = resolve(&graph, airport.coordinate).unwrap();
    let result = max_flow(&graph, source, sink, Algorithm::FordFulkerson).unwrap();
    assert_eq!(result.value, 2500.0);
}
