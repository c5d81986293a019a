use roadflow_core::{EdgeIndex, Graph, NodeId};
use serde::{Deserialize, Serialize};

/// Flow carried by each edge of a graph, indexed like [`Graph::edges`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAssignment {
    flows: Vec<f64>,
}

impl FlowAssignment {
    #[inline]
    #[must_use]
    pub fn new(flows: Vec<f64>) -> Self {
        Self { flows }
    }

    /// All-zero assignment for `graph`
    pub fn zero(graph: &Graph) -> Self {
        Self::new(vec![0.0; graph.edge_count()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    #[inline]
    pub fn flow(&self, edge: EdgeIndex) -> f64 {
        self.flows.get(edge).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.flows
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeIndex, f64)> + '_ {
        self.flows.iter().copied().enumerate()
    }

    /// Edges carrying strictly positive flow
    pub fn nonzero(&self) -> impl Iterator<Item = (EdgeIndex, f64)> + '_ {
        self.iter().filter(|&(_, f)| f > 0.0)
    }

    pub fn is_all_zero(&self) -> bool {
        self.flows.iter().all(|&f| f == 0.0)
    }

    /// Flow on the edge `from -> to`, zero if the edge does not exist
    pub fn between(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64 {
        graph.find_edge(from, to).map_or(0.0, |e| self.flow(e))
    }

    pub fn outflow(&self, graph: &Graph, node: NodeId) -> f64 {
        match graph.node_index(node) {
            Some(i) => graph.out_edge_range(i).map(|e| self.flow(e)).sum(),
            None => 0.0,
        }
    }

    pub fn inflow(&self, graph: &Graph, node: NodeId) -> f64 {
        graph
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.to == node)
            .map(|(e, _)| self.flow(e))
            .sum()
    }

    /// Outflow minus inflow at every node position, in one pass
    pub fn net_outflows(&self, graph: &Graph) -> Vec<f64> {
        let mut net = vec![0.0; graph.node_count()];
        for (e, flow) in self.iter() {
            let (tail, head) = graph.endpoints(e);
            net[tail] += flow;
            net[head] -= flow;
        }
        net
    }

    /// Largest |inflow - outflow| over every node other than the terminals
    pub fn conservation_error(&self, graph: &Graph, source: NodeId, sink: NodeId) -> f64 {
        self.net_outflows(graph)
            .iter()
            .zip(graph.nodes())
            .filter(|(_, node)| node.id != source && node.id != sink)
            .map(|(net, _)| net.abs())
            .fold(0.0, f64::max)
    }

    /// Largest amount by which a flow goes below zero or above its capacity
    pub fn capacity_violation(&self, graph: &Graph) -> f64 {
        graph
            .edges()
            .iter()
            .zip(&self.flows)
            .map(|(edge, &flow)| (flow - edge.capacity).max(-flow).max(0.0))
            .fold(0.0, f64::max)
    }
}
