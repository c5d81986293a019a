// Parallel solving of independent requests over one shared graph
use rayon::prelude::*;
use roadflow_core::{Graph, NodeId, Result};
use serde::{Deserialize, Serialize};

use crate::{max_flow_with, Algorithm, FlowResult, SolveOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRequest {
    pub source: NodeId,
    pub sink: NodeId,
    pub algorithm: Algorithm,
}

impl FlowRequest {
    pub fn new(source: NodeId, sink: NodeId, algorithm: Algorithm) -> Self {
        Self {
            source,
            sink,
            algorithm,
        }
    }
}

/// Solve every request in parallel. Each solve owns its residual state;
/// results come back in request order.
pub fn solve_many(graph: &Graph, requests: &[FlowRequest], options: &SolveOptions) -> Vec<Result<FlowResult>> {
    requests
        .par_iter()
        .map(|req| max_flow_with(graph, req.source, req.sink, req.algorithm, options))
        .collect()
}
