//! Road network extract format
//!
//! JSON as produced by common OSM export pipelines. Tag values arrive in
//! whatever shape the exporter chose (number, string, list of either), so
//! they are normalized here before reaching the graph builder.

use roadflow_core::{build, Error, Graph, NodeId, RawEdge, RawNode, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Loosely typed OSM tag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<TagValue>),
}

/// Travel direction implied by an OSM `oneway` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Both,
    Forward,
    /// One-way against the drawing direction (`oneway=-1`)
    Backward,
}

impl TagValue {
    /// First element of a list value, the value itself otherwise
    fn first(&self) -> Option<&TagValue> {
        match self {
            TagValue::List(items) => items.first().and_then(TagValue::first),
            other => Some(other),
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self.first()? {
            TagValue::Text(s) => Some(s.clone()),
            TagValue::Int(i) => Some(i.to_string()),
            TagValue::Float(f) => Some(f.to_string()),
            TagValue::Bool(b) => Some(b.to_string()),
            TagValue::List(_) => None,
        }
    }

    /// Lane count, `None` when absent or unparsable
    pub fn as_lanes(&self) -> Option<u32> {
        let lanes = match self.first()? {
            TagValue::Int(i) => *i as f64,
            TagValue::Float(f) => *f,
            TagValue::Text(s) => s.split(';').next()?.trim().parse::<f64>().ok()?,
            TagValue::Bool(_) | TagValue::List(_) => return None,
        };
        if lanes.is_finite() && lanes >= 1.0 {
            Some(lanes.min(u32::MAX as f64) as u32)
        } else {
            None
        }
    }

    pub fn as_direction(&self) -> Direction {
        match self.first() {
            Some(TagValue::Bool(true)) => Direction::Forward,
            Some(TagValue::Int(1)) => Direction::Forward,
            Some(TagValue::Int(-1)) => Direction::Backward,
            Some(TagValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" => Direction::Forward,
                "-1" | "reverse" => Direction::Backward,
                _ => Direction::Both,
            },
            _ => Direction::Both,
        }
    }
}

/// Road segment as found in an extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractEdge {
    #[serde(alias = "u")]
    pub from: NodeId,
    #[serde(alias = "v")]
    pub to: NodeId,
    #[serde(default, alias = "road_class")]
    pub highway: Option<TagValue>,
    #[serde(default)]
    pub lanes: Option<TagValue>,
    #[serde(default)]
    pub oneway: Option<TagValue>,
}

impl ExtractEdge {
    /// Normalize into a builder record; `oneway=-1` segments are flipped
    pub fn to_raw(&self) -> RawEdge {
        let road_class = self
            .highway
            .as_ref()
            .and_then(TagValue::as_text)
            .unwrap_or_else(|| "unclassified".to_string());
        let lanes = self.lanes.as_ref().and_then(TagValue::as_lanes);
        let direction = self
            .oneway
            .as_ref()
            .map_or(Direction::Both, TagValue::as_direction);

        let (from, to) = match direction {
            Direction::Backward => (self.to, self.from),
            _ => (self.from, self.to),
        };
        RawEdge {
            from,
            to,
            road_class,
            lanes,
            oneway: direction != Direction::Both,
        }
    }
}

/// Nodes and road segments of one map extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkExtract {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<ExtractEdge>,
}

impl NetworkExtract {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn raw_edges(&self) -> Vec<RawEdge> {
        let mut unparsed_lanes = 0usize;
        let edges: Vec<RawEdge> = self
            .edges
            .iter()
            .map(|edge| {
                let raw = edge.to_raw();
                if edge.lanes.is_some() && raw.lanes.is_none() {
                    unparsed_lanes += 1;
                }
                raw
            })
            .collect();
        if unparsed_lanes > 0 {
            warn!("{} edges had unparsable lane counts, using 1 lane", unparsed_lanes);
        }
        edges
    }

    /// Run the graph builder over this extract
    pub fn build_graph(&self) -> Result<Graph> {
        let graph = build(&self.nodes, &self.raw_edges())?;
        debug!(
            "Extract with {} nodes and {} segments built into {} directed edges",
            self.nodes.len(),
            self.edges.len(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

pub fn load_network<P: AsRef<Path>>(path: P) -> Result<NetworkExtract> {
    let json = std::fs::read_to_string(path)?;
    NetworkExtract::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "nodes": [
            {"id": 1, "lat": 10.80, "lon": 106.71},
            {"id": 2, "y": 10.81, "x": 106.70},
            {"id": 3, "lat": 10.82, "lon": 106.69}
        ],
        "edges": [
            {"u": 1, "v": 2, "highway": "primary", "lanes": "3"},
            {"from": 2, "to": 3, "highway": ["secondary", "tertiary"], "lanes": ["2", "4"], "oneway": "yes"},
            {"from": 3, "to": 1, "oneway": "-1", "lanes": "wide"},
            {"from": 1, "to": 3, "road_class": "service", "lanes": 2.0, "oneway": true}
        ]
    }"#;

    #[test]
    fn test_parse_extract() {
        let extract = NetworkExtract::from_json(SAMPLE).unwrap();
        assert_eq!(extract.nodes.len(), 3);
        assert_eq!(extract.nodes[1].lat, 10.81);

        let raw = extract.raw_edges();
        assert_eq!(raw[0].road_class, "primary");
        assert_eq!(raw[0].lanes, Some(3));
        assert!(!raw[0].oneway);

        assert_eq!(raw[1].road_class, "secondary");
        assert_eq!(raw[1].lanes, Some(2));
        assert!(raw[1].oneway);

        // oneway=-1 flips the segment
        assert_eq!((raw[2].from, raw[2].to), (1, 3));
        assert!(raw[2].oneway);
        assert_eq!(raw[2].lanes, None);
        assert_eq!(raw[2].road_class, "unclassified");

        assert_eq!(raw[3].road_class, "service");
        assert_eq!(raw[3].lanes, Some(2));
    }

    #[test]
    fn test_build_graph_from_extract() {
        let graph = NetworkExtract::from_json(SAMPLE).unwrap().build_graph().unwrap();
        // 1<->2 two-way, 2->3, and 1->3 from both the flipped and the service segment
        assert_eq!(graph.edge_count(), 4);
        let e13 = graph.find_edge(1, 3).unwrap();
        assert_eq!(graph.edges()[e13].capacity, 600.0 + 1000.0);
        assert!(graph.find_edge(3, 1).is_none());
    }

    #[test]
    fn test_direction_values() {
        assert_eq!(TagValue::Text("no".into()).as_direction(), Direction::Both);
        assert_eq!(TagValue::Int(-1).as_direction(), Direction::Backward);
        assert_eq!(TagValue::Bool(false).as_direction(), Direction::Both);
        assert_eq!(TagValue::List(vec![TagValue::Bool(true)]).as_direction(), Direction::Forward);
        assert_eq!(TagValue::Int(0).as_lanes(), None);
        assert_eq!(TagValue::Text("2;3".into()).as_lanes(), Some(2));
    }

    #[test]
    fn test_load_network_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let extract = load_network(file.path()).unwrap();
        assert_eq!(extract.edges.len(), 4);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            NetworkExtract::from_json("{\"nodes\": 3}"),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(load_network("/nonexistent/extract.json"), Err(Error::Io(_))));
    }
}
