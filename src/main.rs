use clap::{Args as ClapArgs, Parser, Subcommand};
use roadflow::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Maximum traffic flow between key locations of a road network
#[derive(Parser, Debug)]
#[command(name = "roadflow")]
#[command(about = "Maximum traffic flow between locations of a road network", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one source/sink pair and print a flow report
    Solve(SolveArgs),
    /// Resolve every configured key location to its nearest node
    Locate {
        /// Road network extract (JSON)
        #[arg(short, long)]
        network: PathBuf,

        /// Key-location configuration (JSON)
        #[arg(short, long)]
        locations: PathBuf,
    },
    /// Run every algorithm on the same pair and report values and timings
    Compare(PairArgs),
}

#[derive(ClapArgs, Debug)]
struct PairArgs {
    /// Road network extract (JSON)
    #[arg(short, long)]
    network: PathBuf,

    /// Key-location configuration (JSON), needed for key references
    #[arg(short, long)]
    locations: Option<PathBuf>,

    /// Source: a location key, `node:<id>` or `lat,lon`
    #[arg(long)]
    source: String,

    /// Sink: a location key, `node:<id>` or `lat,lon`
    #[arg(long)]
    sink: String,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct SolveArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// edmonds-karp, dinic or ford-fulkerson
    #[arg(short, long, default_value = "dinic")]
    algorithm: String,
}

/// How an endpoint is named on the command line
#[derive(Debug, Clone, PartialEq)]
enum EndpointRef {
    Key(String),
    Node(NodeId),
    Coordinate(Coordinate),
}

impl FromStr for EndpointRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix("node:") {
            let id = id
                .trim()
                .parse::<NodeId>()
                .map_err(|e| anyhow::anyhow!("invalid node id in {:?}: {}", s, e))?;
            return Ok(EndpointRef::Node(id));
        }
        if let Some((lat, lon)) = s.split_once(',') {
            let lat = lat.trim().parse::<f64>();
            let lon = lon.trim().parse::<f64>();
            return match (lat, lon) {
                (Ok(lat), Ok(lon)) => Ok(EndpointRef::Coordinate(Coordinate::new(lat, lon))),
                _ => anyhow::bail!("invalid coordinate {:?}, expected lat,lon", s),
            };
        }
        if s.is_empty() {
            anyhow::bail!("empty endpoint reference");
        }
        Ok(EndpointRef::Key(s.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct Endpoint {
    reference: String,
    node: NodeId,
    /// Snapping distance, absent for `node:<id>` references
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_m: Option<f64>,
}

#[derive(Debug, Serialize)]
struct EdgeFlow {
    from: NodeId,
    to: NodeId,
    road_class: RoadClass,
    capacity: f64,
    flow: f64,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    algorithm: Algorithm,
    value: f64,
    source: Endpoint,
    sink: Endpoint,
    flows: Vec<EdgeFlow>,
    paths: Vec<AugmentingPath>,
    cut_capacity: f64,
    cut: Vec<EdgeFlow>,
}

#[derive(Debug, Serialize)]
struct AlgorithmRun {
    algorithm: Algorithm,
    value: f64,
    augmenting_paths: usize,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct CompareReport {
    source: Endpoint,
    sink: Endpoint,
    runs: Vec<AlgorithmRun>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so reports on stdout stay machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("roadflow v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Solve(solve) => run_solve(solve).await,
        Command::Locate { network, locations } => run_locate(&network, &locations),
        Command::Compare(pair) => run_compare(pair).await,
    }
}

async fn run_solve(args: SolveArgs) -> anyhow::Result<()> {
    let algorithm: Algorithm = args.algorithm.parse()?;
    let pair = args.pair;
    let graph = load_graph(&pair.network)?;
    let config = pair.locations.as_deref().map(load_locations).transpose()?;

    let source = resolve_endpoint(&graph, config.as_ref(), &pair.source)?;
    let sink = resolve_endpoint(&graph, config.as_ref(), &pair.sink)?;
    info!(
        "Solving {} -> {} with {} on {} nodes, {} edges",
        source.node,
        sink.node,
        algorithm,
        graph.node_count(),
        graph.edge_count()
    );

    let token = CancelToken::new();
    let options = SolveOptions::default().with_cancel(token.clone());
    let (source_id, sink_id) = (source.node, sink.node);
    let (result, cut, graph) = run_cancellable(token, move || {
        let (result, cut) = min_cut_with(&graph, source_id, sink_id, algorithm, &options)?;
        Ok((result, cut, graph))
    })
    .await?;

    info!("Maximum flow {} -> {}: {:.1} vehicles/hour", source.node, sink.node, result.value);

    let report = SolveReport {
        algorithm,
        value: result.value,
        flows: result
            .assignment
            .nonzero()
            .map(|(e, flow)| edge_flow(&graph, e, flow))
            .collect(),
        paths: result.paths,
        cut_capacity: cut.capacity,
        cut: cut
            .edges
            .iter()
            .map(|&e| edge_flow(&graph, e, result.assignment.flow(e)))
            .collect(),
        source,
        sink,
    };
    write_report(&report, pair.output.as_deref())
}

fn run_locate(network: &Path, locations: &Path) -> anyhow::Result<()> {
    let graph = load_graph(network)?;
    let config = load_locations(locations)?;
    if let Some(centre) = config.centroid() {
        info!(
            "Map centre ({:.6}, {:.6}), radius {} m",
            centre.lat, centre.lon, config.map_radius_m
        );
    }
    let resolved = resolve_locations(&graph, &config.key_locations())?;
    write_report(&resolved, None)
}

async fn run_compare(pair: PairArgs) -> anyhow::Result<()> {
    let graph = load_graph(&pair.network)?;
    let config = pair.locations.as_deref().map(load_locations).transpose()?;
    let source = resolve_endpoint(&graph, config.as_ref(), &pair.source)?;
    let sink = resolve_endpoint(&graph, config.as_ref(), &pair.sink)?;

    let token = CancelToken::new();
    let options = SolveOptions::default().with_cancel(token.clone());
    let (source_id, sink_id) = (source.node, sink.node);
    let runs = run_cancellable(token, move || {
        Algorithm::ALL
            .iter()
            .map(|&algorithm| -> roadflow::Result<AlgorithmRun> {
                let started = Instant::now();
                let result = max_flow_with(&graph, source_id, sink_id, algorithm, &options)?;
                Ok(AlgorithmRun {
                    algorithm,
                    value: result.value,
                    augmenting_paths: result.paths.len(),
                    elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                })
            })
            .collect::<roadflow::Result<Vec<_>>>()
    })
    .await?;

    if let Some(first) = runs.first() {
        for run in &runs[1..] {
            if (run.value - first.value).abs() > 1e-6 * first.value.abs().max(1.0) {
                warn!(
                    "{} found {} but {} found {}",
                    run.algorithm, run.value, first.algorithm, first.value
                );
            }
        }
    }

    let report = CompareReport { source, sink, runs };
    write_report(&report, pair.output.as_deref())
}

/// Run a solve on the blocking pool, cancelling it on Ctrl-C
async fn run_cancellable<T, F>(token: CancelToken, job: F) -> anyhow::Result<T>
where
    F: FnOnce() -> roadflow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let mut handle = tokio::task::spawn_blocking(job);
    tokio::select! {
        joined = &mut handle => Ok(joined??),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, cancelling");
            token.cancel();
            Ok(handle.await??)
        }
    }
}

fn load_graph(path: &Path) -> anyhow::Result<Graph> {
    let extract = load_network(path)?;
    let graph = extract.build_graph()?;
    info!(
        "Loaded {:?}: {} nodes, {} directed edges",
        path,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn resolve_endpoint(
    graph: &Graph,
    config: Option<&LocationsConfig>,
    reference: &str,
) -> anyhow::Result<Endpoint> {
    let parsed: EndpointRef = reference.parse()?;
    let target = match parsed {
        EndpointRef::Node(node) => {
            return Ok(Endpoint {
                reference: reference.to_string(),
                node,
                distance_m: None,
            })
        }
        EndpointRef::Coordinate(coordinate) => coordinate,
        EndpointRef::Key(key) => {
            config
                .and_then(|c| c.get(&key))
                .ok_or(Error::UnknownLocation(key))?
                .coordinate
        }
    };
    let nearest = NodeLocator::new(graph).nearest(target)?;
    info!(
        "{} resolved to node {} at {:.1} m",
        reference, nearest.node, nearest.distance_m
    );
    Ok(Endpoint {
        reference: reference.to_string(),
        node: nearest.node,
        distance_m: Some(nearest.distance_m),
    })
}

fn edge_flow(graph: &Graph, edge: EdgeIndex, flow: f64) -> EdgeFlow {
    let e = &graph.edges()[edge];
    EdgeFlow {
        from: e.from,
        to: e.to,
        road_class: e.road_class,
        capacity: e.capacity,
        flow,
    }
}

fn write_report<T: Serialize>(report: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Report written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
