//! Centrality analyzer: hub metrics, classification, and caching.
//!
//! [`CentralityAnalyzer`] is the single entry point for centrality
//! consumers. It builds a [`VaultGraph`] snapshot from host slices, runs the
//! four algorithms, blends them into a composite score per node, classifies
//! hubs against the configured threshold, and caches the resulting
//! [`CentralityReport`] for a short TTL window so call bursts (orchestration
//! plus transition detection plus host UI reads) share one computation.

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

use super::algorithms;
use crate::error::SonifierError;
use crate::graph::{GraphLink, GraphNode, VaultGraph};

// ============================================================================
// Configuration
// ============================================================================

/// Relative weights for blending the four centrality metrics.
///
/// Weights are non-negative and need not sum to 1; the blend divides by the
/// total. A zero total defines the composite score as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityWeights {
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub pagerank: f64,
}

impl Default for CentralityWeights {
    fn default() -> Self {
        Self {
            degree: 0.3,
            betweenness: 0.3,
            eigenvector: 0.2,
            pagerank: 0.2,
        }
    }
}

impl CentralityWeights {
    /// Weighted mean of the four metrics, clamped to [0, 1].
    pub fn blend(&self, degree: f64, betweenness: f64, eigenvector: f64, pagerank: f64) -> f64 {
        let total = self.degree + self.betweenness + self.eigenvector + self.pagerank;
        if total <= 0.0 {
            return 0.0;
        }
        let weighted = degree * self.degree
            + betweenness * self.betweenness
            + eigenvector * self.eigenvector
            + pagerank * self.pagerank;
        (weighted / total).clamp(0.0, 1.0)
    }
}

/// Tuning parameters for the centrality analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    /// Metric blend weights
    pub weights: CentralityWeights,
    /// Composite score at or above which a node is a hub (default: 0.6)
    pub hub_threshold: f64,
    /// Report cache lifetime in milliseconds (default: 5000)
    pub cache_ttl_ms: u64,
    /// PageRank damping factor (default: 0.85)
    pub pagerank_damping: f64,
    /// Power iteration convergence tolerance (default: 1e-6)
    pub tolerance: f64,
    /// Power iteration cap (default: 100)
    pub max_iterations: usize,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            weights: CentralityWeights::default(),
            hub_threshold: 0.6,
            cache_ttl_ms: 5000,
            pagerank_damping: 0.85,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl CentralityConfig {
    /// Check value ranges. Degenerate graphs are fine; degenerate config
    /// is caller error.
    pub fn validate(&self) -> Result<(), SonifierError> {
        let w = &self.weights;
        if w.degree < 0.0 || w.betweenness < 0.0 || w.eigenvector < 0.0 || w.pagerank < 0.0 {
            return Err(SonifierError::InvalidConfig(
                "centrality weights must be non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.hub_threshold) {
            return Err(SonifierError::InvalidConfig(
                "hub_threshold must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.pagerank_damping) {
            return Err(SonifierError::InvalidConfig(
                "pagerank_damping must be within [0, 1]".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(SonifierError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

/// Per-node centrality scores and hub classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubMetrics {
    /// Normalized degree centrality (0.0–1.0)
    pub degree: f64,
    /// Single-path betweenness approximation (0.0–1.0)
    pub betweenness: f64,
    /// Eigenvector centrality, max-scaled (0.0–1.0)
    pub eigenvector: f64,
    /// PageRank, max-scaled (0.0–1.0)
    pub pagerank: f64,
    /// Weighted blend of the four metrics (0.0–1.0)
    pub composite_score: f64,
    /// Whether the composite score meets the hub threshold
    pub is_hub: bool,
}

/// Five-step prominence scale derived from the composite score.
///
/// Boundary values are inclusive to the higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProminenceTier {
    SuperHub,
    Hub,
    NearHub,
    Intermediate,
    Peripheral,
}

impl ProminenceTier {
    /// Bucket a composite score: ≥0.9 super-hub, ≥0.8 hub, ≥0.6 near-hub,
    /// ≥0.4 intermediate, else peripheral.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::SuperHub
        } else if score >= 0.8 {
            Self::Hub
        } else if score >= 0.6 {
            Self::NearHub
        } else if score >= 0.4 {
            Self::Intermediate
        } else {
            Self::Peripheral
        }
    }

    /// Mixing volume assigned to nodes of this tier.
    pub fn base_volume(self) -> f64 {
        match self {
            Self::SuperHub => 0.9,
            Self::Hub => 0.75,
            Self::NearHub => 0.6,
            Self::Intermediate => 0.4,
            Self::Peripheral => 0.2,
        }
    }

    /// Harmonic voice complexity assigned to nodes of this tier.
    pub fn voice_complexity(self) -> f64 {
        match self {
            Self::SuperHub => 0.9,
            Self::Hub => 0.8,
            Self::NearHub => 0.6,
            Self::Intermediate => 0.45,
            Self::Peripheral => 0.3,
        }
    }
}

impl std::fmt::Display for ProminenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperHub => write!(f, "super-hub"),
            Self::Hub => write!(f, "hub"),
            Self::NearHub => write!(f, "near-hub"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Peripheral => write!(f, "peripheral"),
        }
    }
}

/// Result of a full centrality computation over one graph snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralityReport {
    /// Per-node metrics keyed by node ID
    pub metrics: HashMap<String, HubMetrics>,
    /// Total number of nodes analyzed
    pub node_count: usize,
    /// Total number of links analyzed
    pub link_count: usize,
    /// Computation time in milliseconds
    pub computation_ms: u64,
}

impl CentralityReport {
    /// IDs of all hub-classified nodes, sorted for deterministic output.
    pub fn hub_ids(&self) -> Vec<String> {
        let mut hubs: Vec<String> = self
            .metrics
            .iter()
            .filter(|(_, m)| m.is_hub)
            .map(|(id, _)| id.clone())
            .collect();
        hubs.sort();
        hubs
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Computes, blends, classifies, and caches centrality metrics.
///
/// The cache holds the single most recent report for `cache_ttl_ms`
/// (default 5 s). Reads within the window return the cached report even if
/// the graph has changed since. Settings updates invalidate the cache
/// immediately.
pub struct CentralityAnalyzer {
    config: RwLock<CentralityConfig>,
    cache: Cache<(), Arc<CentralityReport>>,
    computations: AtomicU64,
}

impl CentralityAnalyzer {
    /// Create an analyzer. The cache TTL is fixed at construction time.
    pub fn new(config: CentralityConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_millis(config.cache_ttl_ms))
            .build();
        Self {
            config: RwLock::new(config),
            cache,
            computations: AtomicU64::new(0),
        }
    }

    /// Compute per-node hub metrics for the given snapshot, or return the
    /// cached report when one is still live.
    ///
    /// Empty input yields an empty report, never an error.
    pub fn compute_metrics(
        &self,
        nodes: &[GraphNode],
        links: &[GraphLink],
    ) -> Arc<CentralityReport> {
        if let Some(report) = self.cache.get(&()) {
            debug!(node_count = report.node_count, "centrality cache hit");
            return report;
        }

        let start = Instant::now();
        let graph = VaultGraph::from_slices(nodes, links);
        let cfg = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let degree = algorithms::degree_centrality(&graph);
        let betweenness = algorithms::betweenness_approximation(&graph);
        let eigenvector =
            algorithms::eigenvector_centrality(&graph, cfg.tolerance, cfg.max_iterations);
        let pagerank = algorithms::pagerank(
            &graph,
            cfg.pagerank_damping,
            cfg.tolerance,
            cfg.max_iterations,
        );

        let mut metrics = HashMap::with_capacity(graph.node_count());
        for idx in graph.graph.node_indices() {
            let id = graph.graph[idx].id.clone();
            let deg = degree.get(&id).copied().unwrap_or(0.0);
            let bet = betweenness.get(&id).copied().unwrap_or(0.0);
            let eig = eigenvector.get(&id).copied().unwrap_or(0.0);
            let pr = pagerank.get(&id).copied().unwrap_or(0.0);
            let composite = cfg.weights.blend(deg, bet, eig, pr);
            metrics.insert(
                id,
                HubMetrics {
                    degree: deg,
                    betweenness: bet,
                    eigenvector: eig,
                    pagerank: pr,
                    composite_score: composite,
                    is_hub: composite >= cfg.hub_threshold,
                },
            );
        }

        let report = Arc::new(CentralityReport {
            metrics,
            node_count: graph.node_count(),
            link_count: graph.link_count(),
            computation_ms: start.elapsed().as_millis() as u64,
        });
        self.computations.fetch_add(1, Ordering::Relaxed);
        self.cache.insert((), Arc::clone(&report));
        debug!(
            node_count = report.node_count,
            link_count = report.link_count,
            elapsed_ms = report.computation_ms,
            "centrality metrics computed"
        );
        report
    }

    /// Bucket a composite score into its prominence tier.
    pub fn prominence_tier(&self, score: f64) -> ProminenceTier {
        ProminenceTier::from_score(score)
    }

    /// Replace blend weights and hub threshold, invalidating the cache so
    /// the next read reclassifies every node.
    pub fn update_settings(&self, weights: CentralityWeights, hub_threshold: f64) {
        {
            let mut cfg = self.config.write().unwrap_or_else(PoisonError::into_inner);
            cfg.weights = weights;
            cfg.hub_threshold = hub_threshold;
        }
        self.cache.invalidate_all();
        debug!(hub_threshold, "centrality settings updated, cache invalidated");
    }

    /// Drop any cached report; the next call recomputes.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Number of real computations performed (cache hits excluded).
    pub fn computation_count(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> CentralityConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
