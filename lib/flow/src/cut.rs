use roadflow_core::{EdgeIndex, Graph, NodeId};
use serde::{Deserialize, Serialize};

use crate::residual::ResidualNetwork;

/// Minimum source/sink edge cut read off a maximum-flow residual network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinCut {
    /// Nodes still reachable from the source through unsaturated arcs
    pub source_side: Vec<NodeId>,
    /// Edges leaving the source side, all saturated
    pub edges: Vec<EdgeIndex>,
    pub capacity: f64,
}

impl MinCut {
    pub(crate) fn from_residual(graph: &Graph, net: &ResidualNetwork, source: usize) -> Self {
        let reachable = net.reachable(source);
        let source_side = graph
            .nodes()
            .iter()
            .zip(&reachable)
            .filter(|(_, r)| **r)
            .map(|(n, _)| n.id)
            .collect();
        let edges: Vec<EdgeIndex> = (0..graph.edge_count())
            .filter(|&e| {
                let (tail, head) = graph.endpoints(e);
                reachable[tail] && !reachable[head]
            })
            .collect();
        let capacity = edges.iter().map(|&e| graph.edges()[e].capacity).sum();
        Self {
            source_side,
            edges,
            capacity,
        }
    }

    /// True when `node` sits on the source side of the cut
    pub fn on_source_side(&self, node: NodeId) -> bool {
        self.source_side.binary_search(&node).is_ok()
    }
}
