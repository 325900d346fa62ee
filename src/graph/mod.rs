//! Knowledge-graph input model.
//!
//! Everything the decision engine knows about the vault arrives as flat
//! slices of [`GraphNode`] and [`GraphLink`] plus externally computed
//! [`Cluster`] groupings. [`VaultGraph`] is the petgraph-backed snapshot
//! representation the centrality algorithms operate on.

pub mod models;

pub use models::{Cluster, ClusterKind, GraphLink, GraphNode, VaultGraph};
