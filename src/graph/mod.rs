//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] struct, a directed graph of
//! [`PackageNode`]s connected by requirement edges, built by the analyzer and
//! consumed read-only afterwards.
//!
//! # Example
//!
//! ```
//! use lockscope::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.connect("__root", "acme/http-client", "^2.0");
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod dependency_graph;

pub use dependency_graph::{
    DependencyEdge, DependencyGraph, GraphError, PackageNode, ROOT_PACKAGE_NAME,
};
