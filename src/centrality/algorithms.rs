//! Centrality algorithms.
//!
//! Implements the four per-node centrality measures on [`VaultGraph`]:
//! - **Degree**: neighbor count normalized by N−1
//! - **Betweenness**: single-path approximation (one shortest path per
//!   ordered pair via a single predecessor pointer, see below)
//! - **Eigenvector**: power iteration, L2-normalized, max-scaled
//! - **PageRank**: power iteration with damping and dangling-mass
//!   redistribution, max-scaled
//!
//! All algorithms return results indexed by node ID (String), are fully
//! deterministic (sources iterated in node insertion order, adjacency lists
//! in link insertion order, no randomness), and yield values in [0, 1].
//!
//! The betweenness measure intentionally reconstructs only ONE shortest path
//! per ordered node pair: ties among equally short paths are not all counted
//! the way Brandes' algorithm counts them. Hub classification is calibrated
//! against this approximation, so it must not be "corrected" to exact
//! betweenness without re-tuning the hub threshold.

use petgraph::visit::EdgeRef;
use std::collections::{HashMap, VecDeque};

use crate::graph::VaultGraph;

// ============================================================================
// Adjacency extraction
// ============================================================================

/// Build index-based adjacency lists in link insertion order.
///
/// The deterministic neighbor order is load-bearing: BFS predecessor
/// assignment ("first discovery wins") follows it, which fixes which single
/// shortest path the betweenness approximation reconstructs.
fn adjacency(graph: &VaultGraph) -> Vec<Vec<usize>> {
    let g = &graph.graph;
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); g.node_count()];
    for edge in g.edge_references() {
        let s = edge.source().index();
        let t = edge.target().index();
        adj[s].push(t);
        adj[t].push(s);
    }
    adj
}

/// Map index-based scores back to node IDs.
fn by_node_id(graph: &VaultGraph, scores: &[f64]) -> HashMap<String, f64> {
    let g = &graph.graph;
    let mut result = HashMap::with_capacity(g.node_count());
    for idx in g.node_indices() {
        result.insert(g[idx].id.clone(), scores[idx.index()]);
    }
    result
}

// ============================================================================
// Degree centrality
// ============================================================================

/// Compute normalized degree centrality for all nodes.
///
/// A node's score is its neighbor count divided by N−1. Graphs with a
/// single node (or none) yield 0 for every node present.
pub fn degree_centrality(graph: &VaultGraph) -> HashMap<String, f64> {
    let g = &graph.graph;
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }
    if n == 1 {
        return by_node_id(graph, &[0.0]);
    }

    let denom = (n - 1) as f64;
    let scores: Vec<f64> = g
        .node_indices()
        .map(|idx| g.neighbors(idx).count() as f64 / denom)
        .collect();
    by_node_id(graph, &scores)
}

// ============================================================================
// Betweenness centrality (single-path approximation)
// ============================================================================

/// Compute approximate betweenness centrality for all nodes.
///
/// For every ordered pair (s, t), an unweighted BFS from s records one
/// predecessor per node (first discovery wins) and the unique stored path
/// t → s is walked, incrementing a counter for every intermediate node.
/// Counters are normalized by (N−1)(N−2)/2 and clamped to [0, 1]; the
/// ordered enumeration can count an undirected pair from both ends, and the
/// clamp keeps the range invariant intact.
///
/// Graphs with fewer than 3 nodes yield 0 everywhere.
pub fn betweenness_approximation(graph: &VaultGraph) -> HashMap<String, f64> {
    let g = &graph.graph;
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }
    if n < 3 {
        return by_node_id(graph, &vec![0.0; n]);
    }

    let adj = adjacency(graph);
    let mut counts: Vec<f64> = vec![0.0; n];
    let mut dist: Vec<i64> = vec![-1; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for source in 0..n {
        dist.fill(-1);
        pred.fill(None);
        queue.clear();

        dist[source] = 0;
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            for &v in &adj[u] {
                if dist[v] < 0 {
                    dist[v] = dist[u] + 1;
                    pred[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }

        // Walk the single stored path for every reachable target and
        // credit the intermediate nodes.
        for target in 0..n {
            if target == source || dist[target] < 0 {
                continue;
            }
            let mut cur = target;
            while let Some(p) = pred[cur] {
                if p == source {
                    break;
                }
                counts[p] += 1.0;
                cur = p;
            }
        }
    }

    let denom = ((n - 1) * (n - 2)) as f64 / 2.0;
    let scores: Vec<f64> = counts
        .iter()
        .map(|&c| (c / denom).clamp(0.0, 1.0))
        .collect();
    by_node_id(graph, &scores)
}

// ============================================================================
// Eigenvector centrality (power iteration)
// ============================================================================

/// Compute eigenvector centrality for all nodes.
///
/// Power iteration on the adjacency matrix starting from the uniform unit
/// vector, L2-normalized each step, stopping when the L2 delta between
/// iterates drops below `tolerance` or after `max_iterations`. Hitting the
/// iteration cap is not an error: the last iterate is used as-is. The final
/// vector is scaled by its maximum entry to [0, 1]; graphs with no links
/// yield 0 everywhere.
pub fn eigenvector_centrality(
    graph: &VaultGraph,
    tolerance: f64,
    max_iterations: usize,
) -> HashMap<String, f64> {
    let g = &graph.graph;
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }

    let adj = adjacency(graph);
    let mut scores: Vec<f64> = vec![1.0 / (n as f64).sqrt(); n];

    for _ in 0..max_iterations {
        let mut next: Vec<f64> = vec![0.0; n];
        for (i, neighbors) in adj.iter().enumerate() {
            for &j in neighbors {
                next[i] += scores[j];
            }
        }

        let norm: f64 = next.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            // No links: the centrality vector collapses to zero.
            scores = next;
            break;
        }
        for v in next.iter_mut() {
            *v /= norm;
        }

        let delta: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();

        scores = next;

        if delta < tolerance {
            break;
        }
    }

    let max = scores.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        for v in scores.iter_mut() {
            *v /= max;
        }
    }
    by_node_id(graph, &scores)
}

// ============================================================================
// PageRank (power iteration)
// ============================================================================

/// Compute PageRank scores for all nodes.
///
/// Classic power iteration with configurable damping factor, tolerance
/// (L1 delta), and max iterations. Isolated nodes distribute their mass
/// uniformly. The final scores are scaled by the maximum entry to [0, 1].
pub fn pagerank(
    graph: &VaultGraph,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
) -> HashMap<String, f64> {
    let g = &graph.graph;
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }

    let adj = adjacency(graph);
    let degrees: Vec<usize> = adj.iter().map(Vec::len).collect();

    let initial = 1.0 / n as f64;
    let mut scores: Vec<f64> = vec![initial; n];
    let mut new_scores: Vec<f64> = vec![0.0; n];

    for _ in 0..max_iterations {
        // Reset new scores to the teleportation base
        for s in new_scores.iter_mut() {
            *s = (1.0 - damping) / n as f64;
        }

        // Distribute scores along links
        for i in 0..n {
            if degrees[i] > 0 {
                let contribution = damping * scores[i] / degrees[i] as f64;
                for &j in &adj[i] {
                    new_scores[j] += contribution;
                }
            } else {
                // Isolated node: distribute evenly to all nodes
                let contribution = damping * scores[i] / n as f64;
                for s in new_scores.iter_mut() {
                    *s += contribution;
                }
            }
        }

        // Check convergence
        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        std::mem::swap(&mut scores, &mut new_scores);

        if diff < tolerance {
            break;
        }
    }

    let max = scores.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        for s in scores.iter_mut() {
            *s /= max;
        }
    }
    by_node_id(graph, &scores)
}

// ============================================================================
// Tests
// ============================================================================
