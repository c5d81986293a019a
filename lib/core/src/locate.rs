//! Location Resolver
//!
//! Snaps geographic coordinates to the nearest graph node by great-circle
//! distance. Ties at identical distance go to the lowest node id.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geo::{haversine_m, Coordinate, EARTH_RADIUS_M};
use crate::graph::{Graph, NodeId};
use crate::{Error, Result};

/// Coordinates closer than this (in degrees, per axis) count as identical
pub const EXACT_MATCH_EPSILON: f64 = 1e-9;

/// Slack on the latitude lower bound so rounding never prunes a true neighbour
const PRUNE_SLACK_M: f64 = 1e-6;

/// Named point of interest supplied by configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLocation {
    pub key: String,
    pub name: String,
    pub coordinate: Coordinate,
}

impl KeyLocation {
    pub fn new(key: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            coordinate,
        }
    }
}

/// A key location snapped onto the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub key: String,
    pub name: String,
    pub target: Coordinate,
    pub node: NodeId,
    pub node_coordinate: Coordinate,
    /// Great-circle distance from `target` to the node, in metres
    pub distance_m: f64,
}

/// Result of a nearest-node query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub node: NodeId,
    pub distance_m: f64,
}

/// Latitude-sorted index over a graph's nodes.
///
/// A query walks outward from the query latitude in both directions and
/// stops a direction once the latitude gap alone exceeds the best distance,
/// which gives the same answer as scanning every node.
pub struct NodeLocator<'g> {
    graph: &'g Graph,
    /// Node positions ordered by (latitude, id)
    order: Vec<usize>,
    lats: Vec<f64>,
}

impl<'g> NodeLocator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let nodes = graph.nodes();
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by_key(|&i| (OrderedFloat(nodes[i].lat), nodes[i].id));
        let lats = order.iter().map(|&i| nodes[i].lat).collect();
        Self { graph, order, lats }
    }

    #[inline]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Node whose coordinate matches `target` within [`EXACT_MATCH_EPSILON`]
    pub fn exact(&self, target: Coordinate) -> Option<NodeId> {
        let nodes = self.graph.nodes();
        let start = self
            .lats
            .partition_point(|&lat| lat < target.lat - EXACT_MATCH_EPSILON);
        self.order[start..]
            .iter()
            .take_while(|&&i| nodes[i].lat <= target.lat + EXACT_MATCH_EPSILON)
            .map(|&i| &nodes[i])
            .filter(|n| n.coordinate().approx_eq(&target, EXACT_MATCH_EPSILON))
            .map(|n| n.id)
            .min()
    }

    /// Closest node to `target`
    pub fn nearest(&self, target: Coordinate) -> Result<Nearest> {
        let nodes = self.graph.nodes();
        if nodes.is_empty() {
            return Err(Error::NoNodesAvailable);
        }

        if let Some(node) = self.exact(target) {
            let distance_m = self
                .graph
                .node(node)
                .map(|n| haversine_m(target, n.coordinate()))
                .unwrap_or(0.0);
            return Ok(Nearest { node, distance_m });
        }

        let split = self.lats.partition_point(|&lat| lat < target.lat);
        let mut best: Option<(OrderedFloat<f64>, NodeId)> = None;

        let consider = |pos: usize, best: &mut Option<(OrderedFloat<f64>, NodeId)>| -> bool {
            let node = &nodes[self.order[pos]];
            let bound = EARTH_RADIUS_M * (node.lat - target.lat).to_radians().abs();
            if let Some((dist, _)) = best {
                if bound > dist.0 + PRUNE_SLACK_M {
                    return false;
                }
            }
            let candidate = (OrderedFloat(haversine_m(target, node.coordinate())), node.id);
            if best.map_or(true, |b| candidate < b) {
                *best = Some(candidate);
            }
            true
        };

        let mut up = split;
        let mut down = split;
        let mut up_open = true;
        let mut down_open = true;
        while up_open || down_open {
            if up_open {
                if up < self.order.len() {
                    up_open = consider(up, &mut best);
                    up += 1;
                } else {
                    up_open = false;
                }
            }
            if down_open {
                if down > 0 {
                    down_open = consider(down - 1, &mut best);
                    down -= 1;
                } else {
                    down_open = false;
                }
            }
        }

        best.map(|(dist, node)| Nearest {
            node,
            distance_m: dist.0,
        })
        .ok_or(Error::NoNodesAvailable)
    }
}

/// Resolve a coordinate to the id of the nearest graph node
pub fn resolve(graph: &Graph, coordinate: Coordinate) -> Result<NodeId> {
    NodeLocator::new(graph).nearest(coordinate).map(|n| n.node)
}

/// Resolve every key location against the graph, reporting snap distances
pub fn resolve_locations(graph: &Graph, locations: &[KeyLocation]) -> Result<Vec<ResolvedLocation>> {
    let locator = NodeLocator::new(graph);
    locations
        .iter()
        .map(|loc| {
            let nearest = locator.nearest(loc.coordinate)?;
            let node_coordinate = graph
                .node(nearest.node)
                .map(|n| n.coordinate())
                .unwrap_or(loc.coordinate);
            info!(
                "Resolved {} ({}) to node {} at {:.1} m",
                loc.key, loc.name, nearest.node, nearest.distance_m
            );
            Ok(ResolvedLocation {
                key: loc.key.clone(),
                name: loc.name.clone(),
                target: loc.coordinate,
                node: nearest.node,
                node_coordinate,
                distance_m: nearest.distance_m,
            })
        })
        .collect()
}
