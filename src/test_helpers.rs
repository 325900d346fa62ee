//! Test fixture factories
//!
//! Convenience builders for graph snapshots with known centrality structure,
//! shared by the unit tests across modules.
#![allow(dead_code)]

use crate::graph::{Cluster, ClusterKind, GraphLink, GraphNode};

/// Create a node whose path equals its ID.
pub(crate) fn node(id: &str) -> GraphNode {
    GraphNode::new(id)
}

/// Create a node with an explicit vault path.
pub(crate) fn node_at(id: &str, path: &str) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        path: path.to_string(),
        name: None,
    }
}

/// Create an undirected link.
pub(crate) fn link(source: &str, target: &str) -> GraphLink {
    GraphLink::new(source, target)
}

/// Star topology: `center` linked to `leaf_0..leaf_{n-1}`.
///
/// The center dominates every centrality metric; leaves are interchangeable.
pub(crate) fn star_vault(leaves: usize) -> (Vec<GraphNode>, Vec<GraphLink>) {
    let mut nodes = vec![node("center")];
    let mut links = Vec::with_capacity(leaves);
    for i in 0..leaves {
        let id = format!("leaf_{}", i);
        links.push(link("center", &id));
        nodes.push(node(&id));
    }
    (nodes, links)
}

/// Path topology: `n0 - n1 - ... - n{len-1}`.
pub(crate) fn chain_vault(len: usize) -> (Vec<GraphNode>, Vec<GraphLink>) {
    let nodes: Vec<GraphNode> = (0..len).map(|i| node(&format!("n{}", i))).collect();
    let links: Vec<GraphLink> = (1..len)
        .map(|i| link(&format!("n{}", i - 1), &format!("n{}", i)))
        .collect();
    (nodes, links)
}

/// Complete graph over `k_0..k_{n-1}`: every node sees every other, so all
/// centrality metrics tie.
pub(crate) fn complete_vault(n: usize) -> (Vec<GraphNode>, Vec<GraphLink>) {
    let nodes: Vec<GraphNode> = (0..n).map(|i| node(&format!("k_{}", i))).collect();
    let mut links = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            links.push(link(&format!("k_{}", i), &format!("k_{}", j)));
        }
    }
    (nodes, links)
}

/// Two complete cliques `a_*` and `b_*` of the given size, bridged by a
/// single `a_0 - b_0` link. The bridge endpoints carry all the betweenness.
pub(crate) fn two_clique_vault(size: usize) -> (Vec<GraphNode>, Vec<GraphLink>) {
    let mut nodes = Vec::with_capacity(size * 2);
    let mut links = Vec::new();
    for prefix in ["a", "b"] {
        for i in 0..size {
            nodes.push(node(&format!("{}_{}", prefix, i)));
        }
        for i in 0..size {
            for j in (i + 1)..size {
                links.push(link(
                    &format!("{}_{}", prefix, i),
                    &format!("{}_{}", prefix, j),
                ));
            }
        }
    }
    links.push(link("a_0", "b_0"));
    (nodes, links)
}

/// Create a cluster over the given member IDs.
pub(crate) fn cluster_of(id: &str, kind: ClusterKind, members: &[&str]) -> Cluster {
    Cluster {
        id: id.to_string(),
        kind,
        nodes: members.iter().map(|m| m.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_vault_shape() {
        let (nodes, links) = star_vault(4);
        assert_eq!(nodes.len(), 5);
        assert_eq!(links.len(), 4);
        assert!(links.iter().all(|l| l.source == "center"));
    }

    #[test]
    fn test_chain_vault_shape() {
        let (nodes, links) = chain_vault(5);
        assert_eq!(nodes.len(), 5);
        assert_eq!(links.len(), 4);
    }

    #[test]
    fn test_two_clique_vault_shape() {
        let (nodes, links) = two_clique_vault(3);
        assert_eq!(nodes.len(), 6);
        // Two triangles plus the bridge.
        assert_eq!(links.len(), 7);
    }

    #[test]
    fn test_cluster_factory() {
        let cluster = cluster_of("projects", ClusterKind::TagBased, &["a.md", "b.md"]);
        assert_eq!(cluster.nodes.len(), 2);
        assert_eq!(cluster.kind, ClusterKind::TagBased);
    }
}
