//! # roadflow Flow
//!
//! Maximum-flow solvers over a [`roadflow_core::Graph`].
//!
//! Every algorithm is an independent function over the same
//! [`ResidualNetwork`], selected by an [`Algorithm`] tag:
//!
//! - [`Algorithm::EdmondsKarp`] - BFS shortest augmenting paths, O(V * E^2)
//! - [`Algorithm::Dinic`] - level graphs and blocking flows, O(V^2 * E)
//! - [`Algorithm::FordFulkerson`] - DFS augmenting paths
//!
//! All variants agree on the flow value. The per-edge assignment is not
//! unique and may differ between variants.
//!
//! ## Example
//!
//! ```rust
//! use roadflow_core::{build, RawEdge, RawNode};
//! use roadflow_flow::{max_flow, Algorithm};
//!
//! let nodes: Vec<RawNode> = (1..=3).map(|id| RawNode { id, lat: 0.0, lon: 0.0 }).collect();
//! let edges = vec![
//!     RawEdge::new(1, 2, "primary").one_way(),
//!     RawEdge::new(2, 3, "residential").one_way(),
//! ];
//! let graph = build(&nodes, &edges).unwrap();
//!
//! let result = max_flow(&graph, 1, 3, Algorithm::Dinic).unwrap();
//! assert_eq!(result.value, 800.0);
//! ```

pub mod assignment;
pub mod batch;
pub mod cut;
mod dinic;
mod edmonds_karp;
mod ford_fulkerson;
pub mod residual;

use roadflow_core::{CancelToken, Error, Graph, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

pub use assignment::FlowAssignment;
pub use batch::{solve_many, FlowRequest};
pub use cut::MinCut;
pub use residual::ResidualNetwork;

/// Residual capacities at or below this are treated as saturated
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    EdmondsKarp,
    Dinic,
    FordFulkerson,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::EdmondsKarp,
        Algorithm::Dinic,
        Algorithm::FordFulkerson,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::EdmondsKarp => "edmonds_karp",
            Algorithm::Dinic => "dinic",
            Algorithm::FordFulkerson => "ford_fulkerson",
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Dinic
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "edmonds_karp" | "ek" => Ok(Algorithm::EdmondsKarp),
            "dinic" | "dinics" => Ok(Algorithm::Dinic),
            "ford_fulkerson" | "ff" => Ok(Algorithm::FordFulkerson),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Options for a single solve
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub tolerance: f64,
    /// Checked between augmentations and phases
    pub cancel: Option<CancelToken>,
    pub record_paths: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            cancel: None,
            record_paths: true,
        }
    }
}

impl SolveOptions {
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// One augmentation: the node sequence from source to sink and the flow pushed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentingPath {
    pub nodes: Vec<NodeId>,
    pub flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    pub algorithm: Algorithm,
    pub source: NodeId,
    pub sink: NodeId,
    pub value: f64,
    pub assignment: FlowAssignment,
    /// Empty unless [`SolveOptions::record_paths`] was set
    pub paths: Vec<AugmentingPath>,
}

/// Maximum flow from `source` to `sink` with default options
pub fn max_flow(graph: &Graph, source: NodeId, sink: NodeId, algorithm: Algorithm) -> Result<FlowResult> {
    max_flow_with(graph, source, sink, algorithm, &SolveOptions::default())
}

pub fn max_flow_with(
    graph: &Graph,
    source: NodeId,
    sink: NodeId,
    algorithm: Algorithm,
    options: &SolveOptions,
) -> Result<FlowResult> {
    solve(graph, source, sink, algorithm, options).map(|solved| solved.result)
}

/// Maximum flow together with the minimum cut it certifies
pub fn min_cut(graph: &Graph, source: NodeId, sink: NodeId, algorithm: Algorithm) -> Result<(FlowResult, MinCut)> {
    min_cut_with(graph, source, sink, algorithm, &SolveOptions::default())
}

pub fn min_cut_with(
    graph: &Graph,
    source: NodeId,
    sink: NodeId,
    algorithm: Algorithm,
    options: &SolveOptions,
) -> Result<(FlowResult, MinCut)> {
    let solved = solve(graph, source, sink, algorithm, options)?;
    let cut = MinCut::from_residual(graph, &solved.network, solved.source);
    Ok((solved.result, cut))
}

struct Solved {
    result: FlowResult,
    network: ResidualNetwork,
    source: usize,
}

fn endpoints(graph: &Graph, source: NodeId, sink: NodeId) -> Result<(usize, usize)> {
    let invalid = |reason: String| Error::InvalidEndpoints {
        source_id: source,
        sink_id: sink,
        reason,
    };
    if source == sink {
        return Err(invalid("source and sink are the same node".to_string()));
    }
    let s = graph
        .node_index(source)
        .ok_or_else(|| invalid(format!("source node {} is not in the graph", source)))?;
    let t = graph
        .node_index(sink)
        .ok_or_else(|| invalid(format!("sink node {} is not in the graph", sink)))?;
    Ok((s, t))
}

fn solve(
    graph: &Graph,
    source: NodeId,
    sink: NodeId,
    algorithm: Algorithm,
    options: &SolveOptions,
) -> Result<Solved> {
    let (s, t) = endpoints(graph, source, sink)?;
    let started = Instant::now();

    let mut network = ResidualNetwork::new(graph, options.tolerance);
    let mut augmenter = residual::Augmenter::new(options.cancel.as_ref(), options.record_paths);
    let value = match algorithm {
        Algorithm::EdmondsKarp => edmonds_karp::run(&mut network, s, t, &mut augmenter)?,
        Algorithm::Dinic => dinic::run(&mut network, s, t, &mut augmenter)?,
        Algorithm::FordFulkerson => ford_fulkerson::run(&mut network, s, t, &mut augmenter)?,
    };

    debug!(
        %algorithm,
        source,
        sink,
        value,
        augmentations = augmenter.augmentations,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Max flow solved"
    );

    let assignment = network.assignment(graph);
    let paths = augmenter.into_paths(&network, graph);
    Ok(Solved {
        result: FlowResult {
            algorithm,
            source,
            sink,
            value,
            assignment,
            paths,
        },
        network,
        source: s,
    })
}
