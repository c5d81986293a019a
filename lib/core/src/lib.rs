//! # roadflow Core
//!
//! Core library for roadflow, the road network max-flow engine.
//!
//! This crate provides the data model and the steps that precede a flow
//! computation:
//!
//! - [`capacity`] - Road class and lane count to vehicles/hour
//! - [`build`] - Raw map records to an immutable directed [`Graph`]
//! - [`resolve`] / [`NodeLocator`] - Nearest graph node for a coordinate
//! - [`CancelToken`] - Cooperative cancellation for long computations
//!
//! ## Example
//!
//! ```rust
//! use roadflow_core::{build, resolve, Coordinate, RawEdge, RawNode};
//!
//! let nodes = vec![
//!     RawNode { id: 1, lat: 10.80, lon: 106.71 },
//!     RawNode { id: 2, lat: 10.81, lon: 106.66 },
//! ];
//! let edges = vec![RawEdge::new(1, 2, "primary").with_lanes(2)];
//! let graph = build(&nodes, &edges).unwrap();
//! assert_eq!(graph.edge_count(), 2);
//!
//! let node = resolve(&graph, Coordinate::new(10.809, 106.665)).unwrap();
//! assert_eq!(node, 2);
//! ```

pub mod builder;
pub mod cancel;
pub mod capacity;
pub mod error;
pub mod geo;
pub mod graph;
pub mod locate;

pub use builder::{build, build_directed, RawEdge, RawNode};
pub use cancel::CancelToken;
pub use capacity::{capacity, RoadClass};
pub use error::{Error, Result};
pub use geo::{centroid, haversine_m, Coordinate};
pub use graph::{Edge, EdgeIndex, Graph, Node, NodeId};
pub use locate::{resolve, resolve_locations, KeyLocation, Nearest, NodeLocator, ResolvedLocation};
