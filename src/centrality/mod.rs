//! Graph centrality analysis.
//!
//! Turns a vault snapshot into per-node prominence scores that the rest of
//! the engine treats as musical importance:
//!
//! ```text
//! nodes + links ──> VaultGraph ──> four algorithms ──> composite blend
//!                                                          │
//!                              hub classification <────────┘
//! ```
//!
//! ## Modules
//! - `algorithms`: degree, betweenness, eigenvector, and PageRank over a
//!   [`VaultGraph`](crate::graph::VaultGraph)
//! - `analyzer`: weighted blending, hub classification, prominence tiers,
//!   and the TTL report cache

pub mod algorithms;
pub mod analyzer;

pub use analyzer::{
    CentralityAnalyzer, CentralityConfig, CentralityReport, CentralityWeights, HubMetrics,
    ProminenceTier,
};
