//! Graph data model.
//!
//! Defines the read-only input types consumed by every analysis call:
//!
//! - [`GraphNode`] / [`GraphLink`]: nodes and edges of the knowledge graph
//! - [`Cluster`] / [`ClusterKind`]: externally computed node groupings
//! - [`VaultGraph`]: petgraph wrapper with ID ↔ NodeIndex mapping
//!
//! The engine never mutates graph data; hosts pass fresh slices on every
//! update and the analyzers build a [`VaultGraph`] snapshot from them.

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ============================================================================
// Input types: nodes and links
// ============================================================================

/// A node of the knowledge graph (a note, document, or other vault entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier (stable across snapshots)
    pub id: String,
    /// Vault path, `/`-separated (used for hierarchy depth)
    pub path: String,
    /// Display name, if different from the path
    pub name: Option<String>,
}

impl GraphNode {
    /// Convenience constructor for a node whose path equals its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            path: id.clone(),
            id,
            name: None,
        }
    }
}

/// An undirected link between two nodes, identified by their IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
}

impl GraphLink {
    /// Convenience constructor.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

// ============================================================================
// Clusters: externally computed groupings
// ============================================================================

/// How a cluster was formed by the external clustering collaborator.
///
/// The kind drives deterministic instrument-pool indexing (via [`ordinal`])
/// and the base harmony complexity of the cluster.
///
/// [`ordinal`]: ClusterKind::ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterKind {
    TagBased,
    FolderBased,
    LinkDense,
    Temporal,
    Community,
}

impl ClusterKind {
    /// Stable ordinal used for instrument-pool index arithmetic.
    pub fn ordinal(self) -> usize {
        match self {
            Self::TagBased => 0,
            Self::FolderBased => 1,
            Self::LinkDense => 2,
            Self::Temporal => 3,
            Self::Community => 4,
        }
    }

    /// Base harmony complexity contributed by the cluster kind.
    ///
    /// Link-dense clusters are the most harmonically rich, temporal
    /// clusters the sparsest.
    pub fn base_harmony(self) -> f64 {
        match self {
            Self::TagBased => 0.6,
            Self::FolderBased => 0.5,
            Self::LinkDense => 0.8,
            Self::Temporal => 0.4,
            Self::Community => 0.7,
        }
    }
}

impl std::fmt::Display for ClusterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TagBased => write!(f, "tag-based"),
            Self::FolderBased => write!(f, "folder-based"),
            Self::LinkDense => write!(f, "link-dense"),
            Self::Temporal => write!(f, "temporal"),
            Self::Community => write!(f, "community"),
        }
    }
}

/// An externally computed grouping of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier
    pub id: String,
    /// How the cluster was formed
    pub kind: ClusterKind,
    /// Member node IDs
    pub nodes: Vec<String>,
}

// ============================================================================
// VaultGraph: petgraph wrapper with ID mapping
// ============================================================================

/// Wrapper around `petgraph::UnGraph` with bidirectional ID ↔ NodeIndex mapping.
///
/// This is the intermediate representation between host-provided node/link
/// slices and the centrality algorithms. The `id_to_index` HashMap enables
/// O(1) lookups by node ID.
#[derive(Debug, Clone)]
pub struct VaultGraph {
    /// The underlying undirected graph
    pub graph: UnGraph<GraphNode, ()>,
    /// Mapping from node ID to petgraph NodeIndex
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl VaultGraph {
    /// Create a new empty VaultGraph.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            id_to_index: HashMap::new(),
        }
    }

    /// Create a VaultGraph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, links),
            id_to_index: HashMap::with_capacity(nodes),
        }
    }

    /// Build a snapshot from host-provided slices.
    ///
    /// Links referencing unknown endpoints are ignored. Self-links and
    /// duplicate undirected pairs are also skipped, so a node's neighbor
    /// count never exceeds N−1 and normalized degree stays in [0, 1].
    pub fn from_slices(nodes: &[GraphNode], links: &[GraphLink]) -> Self {
        let mut g = Self::with_capacity(nodes.len(), links.len());
        for node in nodes {
            g.add_node(node.clone());
        }
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(links.len());
        for link in links {
            if link.source == link.target {
                continue;
            }
            let key = if link.source <= link.target {
                (link.source.clone(), link.target.clone())
            } else {
                (link.target.clone(), link.source.clone())
            };
            if seen.insert(key) {
                g.add_link(&link.source, &link.target);
            }
        }
        g
    }

    /// Add a node to the graph. Returns the NodeIndex.
    /// If a node with the same ID already exists, returns its existing index.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_to_index.insert(id, idx);
        idx
    }

    /// Add an undirected link between two nodes identified by their IDs.
    /// Returns `Some(EdgeIndex)` if both nodes exist and the link is not a
    /// self-link, `None` otherwise.
    pub fn add_link(&mut self, source: &str, target: &str) -> Option<petgraph::graph::EdgeIndex> {
        if source == target {
            return None;
        }
        let from_idx = self.id_to_index.get(source)?;
        let to_idx = self.id_to_index.get(target)?;
        Some(self.graph.add_edge(*from_idx, *to_idx, ()))
    }

    /// Get a reference to a node by its ID.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        let idx = self.id_to_index.get(id)?;
        self.graph.node_weight(*idx)
    }

    /// Get the NodeIndex for a given ID.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of links in the graph.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for VaultGraph {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
