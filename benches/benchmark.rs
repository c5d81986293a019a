// Performance benchmarks for graph construction, nearest-node resolution and the max-flow solvers
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use roadflow::prelude::*;

const CLASSES: [&str; 8] = [
    "motorway", "trunk", "primary", "secondary", "tertiary", "residential", "service", "unclassified",
];

/// Square street grid of `side` x `side` intersections with random road classes
fn generate_grid(side: u64, seed: u64) -> (Vec<RawNode>, Vec<RawEdge>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let id = |r: u64, c: u64| r * side + c + 1;

    let mut nodes = Vec::with_capacity((side * side) as usize);
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            nodes.push(RawNode {
                id: id(r, c),
                lat: 10.75 + r as f64 * 5e-4,
                lon: 106.62 + c as f64 * 5e-4,
            });
            for (dr, dc) in [(1, 0), (0, 1)] {
                if r + dr < side && c + dc < side {
                    let class = CLASSES[rng.random_range(0..CLASSES.len())];
                    let mut edge = RawEdge::new(id(r, c), id(r + dr, c + dc), class)
                        .with_lanes(rng.random_range(1..=4));
                    if rng.random_bool(0.25) {
                        edge = edge.one_way();
                    }
                    edges.push(edge);
                }
            }
        }
    }
    (nodes, edges)
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for side in [20u64, 50, 100].iter() {
        let (nodes, edges) = generate_grid(*side, 1);
        group.bench_with_input(BenchmarkId::new("grid", side * side), side, |b, _| {
            b.iter(|| {
                let graph = build(black_box(&nodes), black_box(&edges)).unwrap();
                black_box(graph);
            });
        });
    }

    group.finish();
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let (nodes, edges) = generate_grid(100, 2);
    let graph = build(&nodes, &edges).unwrap();
    let locator = NodeLocator::new(&graph);
    let mut rng = StdRng::seed_from_u64(3);
    let targets: Vec<Coordinate> = (0..100)
        .map(|_| Coordinate::new(rng.random_range(10.75..10.80), rng.random_range(106.62..106.67)))
        .collect();

    group.bench_function("locator_100_targets", |b| {
        b.iter(|| {
            for target in &targets {
                black_box(locator.nearest(black_box(*target)).unwrap());
            }
        });
    });

    group.bench_function("locator_build", |b| {
        b.iter(|| black_box(NodeLocator::new(&graph)));
    });

    group.finish();
}

fn benchmark_max_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_flow");
    group.sample_size(20);

    for side in [20u64, 40].iter() {
        let (nodes, edges) = generate_grid(*side, 4);
        let graph = build(&nodes, &edges).unwrap();
        let (source, sink) = (1, side * side);
        let options = SolveOptions {
            record_paths: false,
            ..SolveOptions::default()
        };

        for algorithm in Algorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.as_str(), side * side),
                &algorithm,
                |b, &algorithm| {
                    b.iter(|| {
                        let result = max_flow_with(&graph, source, sink, algorithm, &options).unwrap();
                        black_box(result.value);
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_solve_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_many");
    group.sample_size(10);

    let side = 30u64;
    let (nodes, edges) = generate_grid(side, 5);
    let graph = build(&nodes, &edges).unwrap();
    let requests: Vec<FlowRequest> = (1..=16)
        .map(|i| FlowRequest::new(i, side * side + 1 - i, Algorithm::Dinic))
        .collect();
    let options = SolveOptions::default();

    group.bench_function("dinic_16_pairs", |b| {
        b.iter(|| black_box(solve_many(&graph, black_box(&requests), &options)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_resolve, benchmark_max_flow, benchmark_solve_many);
criterion_main!(benches);
