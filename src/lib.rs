//! # roadflow
//!
//! Maximum traffic flow between key locations of a road network.
//!
//! roadflow turns a road network extract into a directed capacity graph
//! (vehicles/hour derived from road class and lane count), snaps key
//! locations to their nearest intersections, and computes the maximum
//! flow between them with Edmonds-Karp, Dinic or Ford-Fulkerson.
//!
//! ## Quick Start
//!
//! ### From the Command Line
//!
//! ```bash
//! roadflow locate --network extract.json --locations locations.json
//! roadflow solve --network extract.json --locations locations.json \
//!     --source hang_xanh --sink tan_son_nhat --algorithm dinic
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use roadflow::prelude::*;
//!
//! let extract = NetworkExtract::from_json(r#"{
//!     "nodes": [
//!         {"id": 1, "lat": 10.80, "lon": 106.71},
//!         {"id": 2, "lat": 10.81, "lon": 106.69},
//!         {"id": 3, "lat": 10.81, "lon": 106.66}
//!     ],
//!     "edges": [
//!         {"from": 1, "to": 2, "highway": "primary", "lanes": 2},
//!         {"from": 2, "to": 3, "highway": "secondary"}
//!     ]
//! }"#).unwrap();
//! let graph = extract.build_graph().unwrap();
//!
//! let source = resolve(&graph, Coordinate::new(10.801, 106.709)).unwrap();
//! let sink = resolve(&graph, Coordinate::new(10.811, 106.661)).unwrap();
//! let result = max_flow(&graph, source, sink, Algorithm::Dinic).unwrap();
//! assert_eq!(result.value, 1400.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`roadflow-core`](https://docs.rs/roadflow-core) - Capacity model, graph builder, location resolver
//! - [`roadflow-flow`](https://docs.rs/roadflow-flow) - Max-flow solvers, min cut, batch solving
//! - [`roadflow-data`](https://docs.rs/roadflow-data) - Network extract and key-location formats

// Re-export core types
pub use roadflow_core::{
    build, build_directed, capacity, resolve, resolve_locations,
    CancelToken, Coordinate, Edge, EdgeIndex, Graph, KeyLocation, Nearest, Node, NodeId,
    NodeLocator, RawEdge, RawNode, ResolvedLocation, RoadClass,
    Error, Result,
};

// Re-export solvers
pub use roadflow_flow::{
    max_flow, max_flow_with, min_cut, min_cut_with, solve_many,
    Algorithm, AugmentingPath, FlowAssignment, FlowRequest, FlowResult, MinCut, SolveOptions,
};

// Re-export input formats
pub use roadflow_data::{load_locations, load_network, LocationsConfig, NetworkExtract};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build, capacity, resolve, resolve_locations,
        max_flow, max_flow_with, min_cut, min_cut_with, solve_many,
        load_locations, load_network,
        Algorithm, AugmentingPath, CancelToken, Coordinate, EdgeIndex, Error, FlowAssignment,
        FlowRequest, FlowResult, Graph, KeyLocation, LocationsConfig, MinCut, NetworkExtract,
        NodeId, NodeLocator, RawEdge, RawNode, RoadClass, SolveOptions,
    };
}
