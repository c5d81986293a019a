//! Graph Builder
//!
//! Turns raw node/edge records from a map extract into a [`Graph`].
//! Two-way roads become a pair of opposing directed edges, and parallel
//! edges between the same ordered pair are merged by summing capacities.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capacity::{capacity, RoadClass};
use crate::graph::{Edge, Graph, Node, NodeId};
use crate::{Error, Result};

/// Intersection record as delivered by the map extract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    #[serde(alias = "y")]
    pub lat: f64,
    #[serde(alias = "x")]
    pub lon: f64,
}

/// Road segment record as delivered by the map extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub road_class: String,
    #[serde(default)]
    pub lanes: Option<u32>,
    #[serde(default)]
    pub oneway: bool,
}

impl RawEdge {
    pub fn new(from: NodeId, to: NodeId, road_class: impl Into<String>) -> Self {
        Self {
            from,
            to,
            road_class: road_class.into(),
            lanes: None,
            oneway: false,
        }
    }

    #[must_use]
    pub fn with_lanes(mut self, lanes: u32) -> Self {
        self.lanes = Some(lanes);
        self
    }

    #[must_use]
    pub fn one_way(mut self) -> Self {
        self.oneway = true;
        self
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        Node::new(raw.id, raw.lat, raw.lon)
    }
}

/// Build the directed capacitated graph.
///
/// Fails with [`Error::MalformedEdge`] when an edge references an unknown
/// node and with [`Error::EmptyGraph`] when there are no nodes.
pub fn build(nodes: &[RawNode], raw_edges: &[RawEdge]) -> Result<Graph> {
    let mut assembler = Assembler::new(nodes)?;
    for raw in raw_edges {
        let road_class = RoadClass::parse(&raw.road_class);
        let lanes = raw.lanes.unwrap_or(1).max(1);
        let cap = capacity(road_class, lanes);
        assembler.insert(raw.from, raw.to, road_class, lanes, cap)?;
        if !raw.oneway {
            assembler.insert(raw.to, raw.from, road_class, lanes, cap)?;
        }
    }
    Ok(assembler.finish(raw_edges.len()))
}

/// Build a graph from directed edges with explicit capacities, bypassing
/// the capacity model. Same invariants and failures as [`build`]; edges
/// with a non-positive or non-finite capacity are dropped.
pub fn build_directed(nodes: &[RawNode], edges: &[(NodeId, NodeId, f64)]) -> Result<Graph> {
    let mut assembler = Assembler::new(nodes)?;
    for &(from, to, cap) in edges {
        assembler.insert(from, to, RoadClass::Other, 1, cap)?;
    }
    Ok(assembler.finish(edges.len()))
}

struct Assembler {
    nodes: Vec<Node>,
    positions: AHashMap<NodeId, usize>,
    merged: AHashMap<(usize, usize), Edge>,
    directed: usize,
    self_loops: usize,
}

impl Assembler {
    fn new(raw: &[RawNode]) -> Result<Self> {
        let mut nodes: Vec<Node> = raw.iter().copied().map(Node::from).collect();
        // stable sort keeps the first record for each id ahead of its duplicates
        nodes.sort_by_key(|n| n.id);
        let before = nodes.len();
        nodes.dedup_by_key(|n| n.id);
        if nodes.len() != before {
            warn!("Ignored {} duplicate node records", before - nodes.len());
        }

        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let positions = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        Ok(Self {
            nodes,
            positions,
            merged: AHashMap::new(),
            directed: 0,
            self_loops: 0,
        })
    }

    fn position(&self, id: NodeId, from: NodeId, to: NodeId) -> Result<usize> {
        self.positions.get(&id).copied().ok_or(Error::MalformedEdge {
            from,
            to,
            missing: id,
        })
    }

    fn insert(&mut self, from: NodeId, to: NodeId, road_class: RoadClass, lanes: u32, cap: f64) -> Result<()> {
        let tail = self.position(from, from, to)?;
        let head = self.position(to, from, to)?;

        if tail == head {
            self.self_loops += 1;
            return Ok(());
        }
        if !cap.is_finite() || cap <= 0.0 {
            return Ok(());
        }

        self.directed += 1;
        self.merged
            .entry((tail, head))
            .and_modify(|edge| {
                edge.capacity += cap;
                edge.lanes = edge.lanes.saturating_add(lanes);
                if road_class.lane_capacity() > edge.road_class.lane_capacity() {
                    edge.road_class = road_class;
                }
            })
            .or_insert(Edge {
                from,
                to,
                road_class,
                lanes,
                capacity: cap,
            });
        Ok(())
    }

    fn finish(self, raw_edges: usize) -> Graph {
        let mut keyed: Vec<((usize, usize), Edge)> = self.merged.into_iter().collect();
        keyed.sort_unstable_by_key(|(key, _)| *key);
        let edges: Vec<Edge> = keyed.into_iter().map(|(_, e)| e).collect();

        debug!(
            nodes = self.nodes.len(),
            raw_edges,
            directed_edges = edges.len(),
            merged = self.directed - edges.len(),
            self_loops = self.self_loops,
            "Built road graph"
        );

        Graph::from_sorted(self.nodes, edges)
    }
}
