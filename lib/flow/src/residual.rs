use roadflow_core::{CancelToken, Graph, NodeId, Result};
use smallvec::SmallVec;

use crate::assignment::FlowAssignment;
use crate::AugmentingPath;

/// Arc index in a [`ResidualNetwork`]. Arc `2e` is the forward arc of graph
/// edge `e`, arc `2e + 1` its reverse; `a ^ 1` is always the paired arc.
pub type ArcIndex = usize;

pub(crate) const NONE: usize = usize::MAX;

/// Residual view of a [`Graph`] owned by one solve.
///
/// Forward arcs start at the edge capacity, reverse arcs at zero. Arcs out
/// of each node are ordered by ascending head node id (forward before
/// reverse on ties) so every traversal is reproducible.
pub struct ResidualNetwork {
    head: Vec<usize>,
    residual: Vec<f64>,
    adjacency: Vec<SmallVec<[ArcIndex; 8]>>,
    tolerance: f64,
}

impl ResidualNetwork {
    pub fn new(graph: &Graph, tolerance: f64) -> Self {
        let edges = graph.edges();
        let mut head = Vec::with_capacity(edges.len() * 2);
        let mut residual = Vec::with_capacity(edges.len() * 2);
        let mut adjacency: Vec<SmallVec<[ArcIndex; 8]>> = vec![SmallVec::new(); graph.node_count()];

        for (e, edge) in edges.iter().enumerate() {
            let (tail, to) = graph.endpoints(e);
            head.push(to);
            residual.push(edge.capacity);
            head.push(tail);
            residual.push(0.0);
            adjacency[tail].push(2 * e);
            adjacency[to].push(2 * e + 1);
        }

        for arcs in &mut adjacency {
            arcs.sort_unstable_by_key(|&a| (head[a], a & 1));
        }

        Self {
            head,
            residual,
            adjacency,
            tolerance,
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[inline]
    pub fn head(&self, arc: ArcIndex) -> usize {
        self.head[arc]
    }

    #[inline]
    pub fn tail(&self, arc: ArcIndex) -> usize {
        self.head[arc ^ 1]
    }

    #[inline]
    pub fn residual(&self, arc: ArcIndex) -> f64 {
        self.residual[arc]
    }

    /// True when the arc can still carry flow
    #[inline]
    pub fn open(&self, arc: ArcIndex) -> bool {
        self.residual[arc] > self.tolerance
    }

    #[inline]
    pub fn arcs(&self, node: usize) -> &[ArcIndex] {
        &self.adjacency[node]
    }

    /// Smallest residual along a path of arcs
    pub fn bottleneck(&self, path: &[ArcIndex]) -> f64 {
        path.iter()
            .map(|&a| self.residual[a])
            .fold(f64::INFINITY, f64::min)
    }

    /// Push `amount` along every arc of `path`, moving capacity onto the paired arcs
    pub fn augment(&mut self, path: &[ArcIndex], amount: f64) {
        for &a in path {
            self.residual[a] -= amount;
            self.residual[a ^ 1] += amount;
        }
    }

    /// Node positions reachable from `source` through open arcs
    pub fn reachable(&self, source: usize) -> Vec<bool> {
        let mut seen = vec![false; self.node_count()];
        let mut stack = vec![source];
        seen[source] = true;
        while let Some(u) = stack.pop() {
            for &a in self.arcs(u) {
                let v = self.head[a];
                if !seen[v] && self.open(a) {
                    seen[v] = true;
                    stack.push(v);
                }
            }
        }
        seen
    }

    /// Per-edge flow: the residual of each reverse arc, clamped to the
    /// edge capacity and snapped to zero below tolerance
    pub fn assignment(&self, graph: &Graph) -> FlowAssignment {
        let flows = graph
            .edges()
            .iter()
            .enumerate()
            .map(|(e, edge)| {
                let flow = self.residual[2 * e + 1].clamp(0.0, edge.capacity);
                if flow <= self.tolerance {
                    0.0
                } else {
                    flow
                }
            })
            .collect();
        FlowAssignment::new(flows)
    }
}

/// Bookkeeping shared by the algorithm loops: cancellation checks and the
/// augmenting paths recorded for the caller.
pub(crate) struct Augmenter<'a> {
    pub cancel: Option<&'a CancelToken>,
    pub record_paths: bool,
    pub paths: Vec<(usize, Vec<ArcIndex>, f64)>,
    pub augmentations: usize,
}

impl<'a> Augmenter<'a> {
    pub fn new(cancel: Option<&'a CancelToken>, record_paths: bool) -> Self {
        Self {
            cancel,
            record_paths,
            paths: Vec::new(),
            augmentations: 0,
        }
    }

    #[inline]
    pub fn checkpoint(&self) -> Result<()> {
        match self.cancel {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    /// Push the bottleneck of `path` and return the amount pushed
    pub fn push(&mut self, net: &mut ResidualNetwork, source: usize, path: &[ArcIndex]) -> f64 {
        let amount = net.bottleneck(path);
        net.augment(path, amount);
        self.augmentations += 1;
        if self.record_paths {
            self.paths.push((source, path.to_vec(), amount));
        }
        amount
    }

    pub fn into_paths(self, net: &ResidualNetwork, graph: &Graph) -> Vec<AugmentingPath> {
        let id = |pos: usize| -> NodeId { graph.nodes()[pos].id };
        self.paths
            .into_iter()
            .map(|(source, arcs, flow)| {
                let mut nodes = Vec::with_capacity(arcs.len() + 1);
                nodes.push(id(source));
                nodes.extend(arcs.iter().map(|&a| id(net.head(a))));
                AugmentingPath { nodes, flow }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadflow_core::{build, RawEdge, RawNode};

    #[test]
    fn test_arcs_ordered_by_head_id() {
        let nodes: Vec<RawNode> = [1, 2, 3, 4]
            .iter()
            .map(|&id| RawNode { id, lat: 0.0, lon: 0.0 })
            .collect();
        let edges = vec![
            RawEdge::new(1, 4, "primary").one_way(),
            RawEdge::new(1, 2, "primary").one_way(),
            RawEdge::new(3, 1, "primary").one_way(),
        ];
        let graph = build(&nodes, &edges).unwrap();
        let net = ResidualNetwork::new(&graph, 1e-9);
        let heads: Vec<usize> = net.arcs(0).iter().map(|&a| net.head(a)).collect();
        assert_eq!(heads, vec![1, 2, 3]);
        for &a in net.arcs(0) {
            assert_eq!(net.tail(a), 0);
        }
    }

    #[test]
    fn test_augment_moves_residual_to_pair() {
        let nodes: Vec<RawNode> = [1, 2]
            .iter()
            .map(|&id| RawNode { id, lat: 0.0, lon: 0.0 })
            .collect();
        let graph = build(&nodes, &[RawEdge::new(1, 2, "residential").one_way()]).unwrap();
        let mut net = ResidualNetwork::new(&graph, 1e-9);
        net.augment(&[0], 300.0);
        assert_eq!(net.residual(0), 500.0);
        assert_eq!(net.residual(1), 300.0);
        assert_eq!(net.assignment(&graph).flow(0), 300.0);
        assert!(net.reachable(0)[1]);
        net.augment(&[0], 500.0);
        assert!(!net.reachable(0)[1]);
    }
}
