//! Vault complexity analysis.
//!
//! Sizes up the whole graph (not individual nodes) and maps it onto an
//! orchestration tier: how many musical layers the vault deserves, how dense
//! the instrumentation should be, and how elaborate the harmony can get.
//! Tier selection is driven purely by node count against configurable
//! thresholds; the blended complexity score refines decisions within a tier.

use serde::{Deserialize, Serialize};

use crate::graph::{Cluster, GraphLink, GraphNode};

// ============================================================================
// Tiers and layers
// ============================================================================

/// Orchestration size class for a whole vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Minimal,
    Simple,
    Moderate,
    Complex,
    Extensive,
}

/// Musical layer toggled on or off by the active tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationLayer {
    BasicMelody,
    Rhythmic,
    HarmonicPad,
    BassLine,
    CounterMelody,
    OrchestralFills,
    AmbientTexture,
}

const MINIMAL_LAYERS: &[OrchestrationLayer] = &[OrchestrationLayer::BasicMelody];
const SIMPLE_LAYERS: &[OrchestrationLayer] = &[
    OrchestrationLayer::BasicMelody,
    OrchestrationLayer::Rhythmic,
];
const MODERATE_LAYERS: &[OrchestrationLayer] = &[
    OrchestrationLayer::BasicMelody,
    OrchestrationLayer::Rhythmic,
    OrchestrationLayer::HarmonicPad,
];
const COMPLEX_LAYERS: &[OrchestrationLayer] = &[
    OrchestrationLayer::BasicMelody,
    OrchestrationLayer::Rhythmic,
    OrchestrationLayer::HarmonicPad,
    OrchestrationLayer::BassLine,
    OrchestrationLayer::CounterMelody,
];
const EXTENSIVE_LAYERS: &[OrchestrationLayer] = &[
    OrchestrationLayer::BasicMelody,
    OrchestrationLayer::Rhythmic,
    OrchestrationLayer::HarmonicPad,
    OrchestrationLayer::BassLine,
    OrchestrationLayer::CounterMelody,
    OrchestrationLayer::OrchestralFills,
    OrchestrationLayer::AmbientTexture,
];

impl ComplexityTier {
    /// Ordered layer set enabled at this tier. Each tier extends the one
    /// below it; the basic melody is always present.
    pub fn layers(self) -> &'static [OrchestrationLayer] {
        match self {
            Self::Minimal => MINIMAL_LAYERS,
            Self::Simple => SIMPLE_LAYERS,
            Self::Moderate => MODERATE_LAYERS,
            Self::Complex => COMPLEX_LAYERS,
            Self::Extensive => EXTENSIVE_LAYERS,
        }
    }

    /// Volume multiplier applied to every layer at this tier.
    pub fn instrument_density(self) -> f64 {
        match self {
            Self::Minimal => 0.4,
            Self::Simple => 0.55,
            Self::Moderate => 0.7,
            Self::Complex => 0.85,
            Self::Extensive => 1.0,
        }
    }

    /// Ceiling on harmonic elaboration at this tier.
    pub fn harmony_complexity(self) -> f64 {
        match self {
            Self::Minimal => 0.3,
            Self::Simple => 0.45,
            Self::Moderate => 0.6,
            Self::Complex => 0.8,
            Self::Extensive => 1.0,
        }
    }

    /// Baseline ensemble size at this tier.
    pub fn base_instrument_count(self) -> usize {
        match self {
            Self::Minimal => 3,
            Self::Simple => 5,
            Self::Moderate => 8,
            Self::Complex => 12,
            Self::Extensive => 16,
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "minimal"),
            Self::Simple => write!(f, "simple"),
            Self::Moderate => write!(f, "moderate"),
            Self::Complex => write!(f, "complex"),
            Self::Extensive => write!(f, "extensive"),
        }
    }
}

impl OrchestrationLayer {
    /// Instruments this layer draws from when no temporal preference
    /// narrows the choice.
    pub fn base_pool(self) -> &'static [&'static str] {
        match self {
            Self::BasicMelody => &["piano", "violin", "flute"],
            Self::Rhythmic => &["timpani", "vibraphone"],
            Self::HarmonicPad => &["warm-pad", "string-ensemble", "choir"],
            Self::BassLine => &["church-organ", "soft-strings", "brass-ensemble"],
            Self::CounterMelody => &["flute", "trumpet", "violin"],
            Self::OrchestralFills => &[
                "brass-ensemble",
                "string-ensemble",
                "french-horn",
                "timpani",
            ],
            Self::AmbientTexture => &["warm-pad", "soft-strings", "choir"],
        }
    }

    /// Mixing volume of this layer before tier and temporal scaling.
    pub fn base_volume(self) -> f64 {
        match self {
            Self::BasicMelody => 0.8,
            Self::Rhythmic => 0.6,
            Self::HarmonicPad => 0.5,
            Self::BassLine => 0.6,
            Self::CounterMelody => 0.45,
            Self::OrchestralFills => 0.4,
            Self::AmbientTexture => 0.3,
        }
    }
}

impl std::fmt::Display for OrchestrationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BasicMelody => write!(f, "basic-melody"),
            Self::Rhythmic => write!(f, "rhythmic"),
            Self::HarmonicPad => write!(f, "harmonic-pad"),
            Self::BassLine => write!(f, "bass-line"),
            Self::CounterMelody => write!(f, "counter-melody"),
            Self::OrchestralFills => write!(f, "orchestral-fills"),
            Self::AmbientTexture => write!(f, "ambient-texture"),
        }
    }
}

// ============================================================================
// Configuration and result types
// ============================================================================

/// Node counts at which each tier begins. A vault below `simple` nodes
/// is minimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholds {
    pub simple: usize,
    pub moderate: usize,
    pub complex: usize,
    pub extensive: usize,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple: 100,
            moderate: 500,
            complex: 1000,
            extensive: 5000,
        }
    }
}

/// Structural summary of one vault snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultComplexity {
    pub total_nodes: usize,
    pub total_links: usize,
    /// Mean links per node (each undirected link counts both endpoints)
    pub average_degree: f64,
    pub cluster_count: usize,
    /// Deepest folder nesting seen in any node path
    pub max_depth: usize,
    /// Blended size/density/structure/hierarchy score (0.0–1.0)
    pub complexity_score: f64,
    pub tier: ComplexityTier,
}

impl Default for VaultComplexity {
    fn default() -> Self {
        Self {
            total_nodes: 0,
            total_links: 0,
            average_degree: 0.0,
            cluster_count: 0,
            max_depth: 0,
            complexity_score: 0.0,
            tier: ComplexityTier::Minimal,
        }
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Classifies a vault snapshot into a [`VaultComplexity`] summary.
pub struct ComplexityAnalyzer {
    thresholds: ComplexityThresholds,
}

impl ComplexityAnalyzer {
    pub fn new(thresholds: ComplexityThresholds) -> Self {
        Self { thresholds }
    }

    /// Evaluate the snapshot. Degenerate input (no nodes) yields the
    /// minimal tier with a zero score, never an error.
    pub fn evaluate(
        &self,
        nodes: &[GraphNode],
        links: &[GraphLink],
        clusters: Option<&[Cluster]>,
    ) -> VaultComplexity {
        let total_nodes = nodes.len();
        let total_links = links.len();
        let cluster_count = clusters.map_or(0, <[Cluster]>::len);

        let average_degree = if total_nodes == 0 {
            0.0
        } else {
            (2 * total_links) as f64 / total_nodes as f64
        };
        let max_depth = nodes
            .iter()
            .map(|n| n.path.matches('/').count())
            .max()
            .unwrap_or(0);

        // Size saturates at the extensive threshold on a log scale; the
        // other components scale linearly against fixed reference sizes.
        let size = (1.0 + total_nodes as f64).ln()
            / (1.0 + self.thresholds.extensive.max(1) as f64).ln();
        let density = average_degree / 10.0;
        let structure = cluster_count as f64 / 20.0;
        let hierarchy = max_depth as f64 / 10.0;
        let complexity_score = 0.4 * size.clamp(0.0, 1.0)
            + 0.3 * density.clamp(0.0, 1.0)
            + 0.2 * structure.clamp(0.0, 1.0)
            + 0.1 * hierarchy.clamp(0.0, 1.0);

        VaultComplexity {
            total_nodes,
            total_links,
            average_degree,
            cluster_count,
            max_depth,
            complexity_score,
            tier: self.tier_for(total_nodes),
        }
    }

    /// Ensemble size suggestion: per-tier base plus up to four extra
    /// players as the score approaches 1.
    pub fn recommended_instrument_count(&self, complexity: &VaultComplexity) -> usize {
        complexity.tier.base_instrument_count()
            + (complexity.complexity_score.clamp(0.0, 1.0) * 4.0).round() as usize
    }

    fn tier_for(&self, node_count: usize) -> ComplexityTier {
        if node_count < self.thresholds.simple {
            ComplexityTier::Minimal
        } else if node_count < self.thresholds.moderate {
            ComplexityTier::Simple
        } else if node_count < self.thresholds.complex {
            ComplexityTier::Moderate
        } else if node_count < self.thresholds.extensive {
            ComplexityTier::Complex
        } else {
            ComplexityTier::Extensive
        }
    }
}

impl Default for ComplexityAnalyzer {
    fn default() -> Self {
        Self::new(ComplexityThresholds::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
