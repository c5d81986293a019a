use thiserror::Error;

use crate::graph::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed edge {from} -> {to}: node {missing} is not in the node set")]
    MalformedEdge { from: NodeId, to: NodeId, missing: NodeId },

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("No nodes available to resolve against")]
    NoNodesAvailable,

    #[error("Invalid endpoints {source_id} -> {sink_id}: {reason}")]
    InvalidEndpoints { source_id: NodeId, sink_id: NodeId, reason: String },

    #[error("Computation cancelled")]
    Cancelled,

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
