// Directed capacitated road graph - nodes and edges
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::capacity::RoadClass;
use crate::geo::Coordinate;

pub type NodeId = u64;
/// Position of an edge in [`Graph::edges`]
pub type EdgeIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub road_class: RoadClass,
    pub lanes: u32,
    pub capacity: f64,
}

/// Immutable directed graph.
///
/// Nodes are kept in ascending id order and edges sorted by `(from, to)`,
/// grouped per source node so out-edges form a contiguous range.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: AHashMap<NodeId, usize>,
    edges: Vec<Edge>,
    /// Dense (tail, head) node positions for each edge
    endpoints: Vec<(usize, usize)>,
    /// `offsets[i]..offsets[i + 1]` are the out-edges of node position `i`
    offsets: Vec<usize>,
}

impl Graph {
    /// Assemble a graph from nodes and edges that already satisfy the
    /// builder's invariants: sorted, unique, positive capacities.
    pub(crate) fn from_sorted(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let index: AHashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        let endpoints: Vec<(usize, usize)> = edges
            .iter()
            .map(|e| (index[&e.from], index[&e.to]))
            .collect();

        let mut offsets = vec![0usize; nodes.len() + 1];
        for &(tail, _) in &endpoints {
            offsets[tail + 1] += 1;
        }
        for i in 0..nodes.len() {
            offsets[i + 1] += offsets[i];
        }

        Self {
            nodes,
            index,
            edges,
            endpoints,
            offsets,
        }
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in ascending id order
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Dense position of a node id, in `0..node_count()`
    #[inline]
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Dense (tail, head) positions of an edge
    #[inline]
    pub fn endpoints(&self, edge: EdgeIndex) -> (usize, usize) {
        self.endpoints[edge]
    }

    /// Indices of the edges leaving the node at dense position `node`
    #[inline]
    pub fn out_edge_range(&self, node: usize) -> Range<EdgeIndex> {
        self.offsets[node]..self.offsets[node + 1]
    }

    pub fn out_edges(&self, id: NodeId) -> &[Edge] {
        match self.node_index(id) {
            Some(i) => &self.edges[self.out_edge_range(i)],
            None => &[],
        }
    }

    /// Index of the edge `from -> to`, if present
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeIndex> {
        let tail = self.node_index(from)?;
        let head = self.node_index(to)?;
        let range = self.out_edge_range(tail);
        let start = range.start;
        self.endpoints[range]
            .binary_search_by_key(&head, |&(_, h)| h)
            .ok()
            .map(|offset| start + offset)
    }

    pub fn total_capacity(&self) -> f64 {
        self.edges.iter().map(|e| e.capacity).sum()
    }
}
