//! Data structures for hub-driven orchestration decisions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::centrality::ProminenceTier;
use crate::error::SonifierError;

/// Instrument assigned when no role or preference narrows the choice.
pub const DEFAULT_INSTRUMENT: &str = "piano";

// ============================================================================
// Roles and modes
// ============================================================================

/// Musical function a node performs within its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicalRole {
    Conductor,
    Lead,
    Harmony,
    Accompaniment,
}

impl MusicalRole {
    /// Role implied by a node's own prominence tier.
    pub fn from_tier(tier: ProminenceTier) -> Self {
        match tier {
            ProminenceTier::SuperHub | ProminenceTier::Hub => Self::Conductor,
            ProminenceTier::NearHub => Self::Lead,
            ProminenceTier::Intermediate => Self::Harmony,
            ProminenceTier::Peripheral => Self::Accompaniment,
        }
    }

    /// Fixed four-entry instrument pool for this role.
    pub fn instrument_pool(self) -> &'static [&'static str] {
        match self {
            Self::Conductor => &["piano", "church-organ", "brass-ensemble", "timpani"],
            Self::Lead => &["violin", "flute", "trumpet", "lead-synth"],
            Self::Harmony => &["string-ensemble", "choir", "french-horn", "warm-pad"],
            Self::Accompaniment => &["harp", "celesta", "vibraphone", "soft-strings"],
        }
    }
}

impl std::fmt::Display for MusicalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conductor => write!(f, "conductor"),
            Self::Lead => write!(f, "lead"),
            Self::Harmony => write!(f, "harmony"),
            Self::Accompaniment => write!(f, "accompaniment"),
        }
    }
}

/// How strongly the hub dominates the mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationMode {
    /// Hub volume scales with its score, up to +0.4 × multiplier
    HubLed,
    /// Hub volume is a flat 0.6 regardless of score
    Democratic,
    /// Hub volume scales with its score, up to +0.2 × multiplier
    Balanced,
}

impl Default for OrchestrationMode {
    fn default() -> Self {
        Self::HubLed
    }
}

impl std::fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HubLed => write!(f, "hub-led"),
            Self::Democratic => write!(f, "democratic"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

/// Tuning for cluster orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    pub mode: OrchestrationMode,
    /// Scales the score-driven part of the hub's volume boost (default 1.0)
    pub prominence_multiplier: f64,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            mode: OrchestrationMode::default(),
            prominence_multiplier: 1.0,
        }
    }
}

impl OrchestrationConfig {
    pub fn validate(&self) -> Result<(), SonifierError> {
        if self.prominence_multiplier < 0.0 {
            return Err(SonifierError::InvalidConfig(
                "prominence_multiplier must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Analysis results
// ============================================================================

/// Summary statistics over the composite scores of one cluster's members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl ScoreDistribution {
    /// Compute stats over a score sample. Empty input yields all zeros.
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let median = if sorted.len() % 2 == 1 {
            sorted[sorted.len() / 2]
        } else {
            let mid = sorted.len() / 2;
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };

        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let variance =
            sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / sorted.len() as f64;

        Self {
            min,
            max,
            median,
            std_dev: variance.sqrt(),
        }
    }
}

/// Hub structure of one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterHubAnalysis {
    pub cluster_id: String,
    /// Top scorer, present only when it classifies as a hub
    pub primary_hub: Option<String>,
    /// Up to three further hub-classified members, score descending
    pub secondary_hubs: Vec<String>,
    /// Everyone else, in cluster membership order
    pub peripheral_nodes: Vec<String>,
    pub distribution: ScoreDistribution,
}

/// Complete musical treatment for one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationDecisions {
    pub cluster_id: String,
    /// Primary hub, `None` under the democratic fallback
    pub hub_node_id: Option<String>,
    pub lead_instrument: String,
    /// Non-hub instruments, deduplicated in order of first appearance
    pub accompanying_instruments: Vec<String>,
    /// Cluster-wide harmonic elaboration (0.0–1.0)
    pub harmony_complexity: f64,
    pub node_roles: HashMap<String, MusicalRole>,
    /// Mixing volume per node (0.0–1.0)
    pub node_volumes: HashMap<String, f64>,
    /// Stereo position per node (−1.0 left – 1.0 right)
    pub node_pans: HashMap<String, f64>,
    /// Harmonic voice complexity per node (0.0–1.0)
    pub node_complexities: HashMap<String, f64>,
    /// Hops from the hub over intra-cluster links; unreachable is infinite
    pub hub_distances: HashMap<String, f64>,
}

impl OrchestrationDecisions {
    /// Empty decision set for a cluster.
    pub fn empty(cluster_id: &str, harmony_complexity: f64) -> Self {
        Self {
            cluster_id: cluster_id.to_string(),
            hub_node_id: None,
            lead_instrument: DEFAULT_INSTRUMENT.to_string(),
            accompanying_instruments: Vec::new(),
            harmony_complexity,
            node_roles: HashMap::new(),
            node_volumes: HashMap::new(),
            node_pans: HashMap::new(),
            node_complexities: HashMap::new(),
            hub_distances: HashMap::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_tier_mapping() {
        assert_eq!(
            MusicalRole::from_tier(ProminenceTier::SuperHub),
            MusicalRole::Conductor
        );
        assert_eq!(
            MusicalRole::from_tier(ProminenceTier::Hub),
            MusicalRole::Conductor
        );
        assert_eq!(
            MusicalRole::from_tier(ProminenceTier::NearHub),
            MusicalRole::Lead
        );
        assert_eq!(
            MusicalRole::from_tier(ProminenceTier::Intermediate),
            MusicalRole::Harmony
        );
        assert_eq!(
            MusicalRole::from_tier(ProminenceTier::Peripheral),
            MusicalRole::Accompaniment
        );
    }

    #[test]
    fn test_instrument_pools_have_four_entries() {
        for role in [
            MusicalRole::Conductor,
            MusicalRole::Lead,
            MusicalRole::Harmony,
            MusicalRole::Accompaniment,
        ] {
            assert_eq!(role.instrument_pool().len(), 4);
        }
        assert!(MusicalRole::Conductor
            .instrument_pool()
            .contains(&DEFAULT_INSTRUMENT));
    }

    #[test]
    fn test_score_distribution_empty() {
        let dist = ScoreDistribution::from_scores(&[]);
        assert!((dist.min - 0.0).abs() < f64::EPSILON);
        assert!((dist.max - 0.0).abs() < f64::EPSILON);
        assert!((dist.median - 0.0).abs() < f64::EPSILON);
        assert!((dist.std_dev - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_distribution_even_sample() {
        let dist = ScoreDistribution::from_scores(&[0.8, 0.2]);
        assert!((dist.min - 0.2).abs() < 1e-9);
        assert!((dist.max - 0.8).abs() < 1e-9);
        assert!((dist.median - 0.5).abs() < 1e-9);
        assert!((dist.std_dev - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_score_distribution_odd_sample() {
        let dist = ScoreDistribution::from_scores(&[3.0, 1.0, 2.0]);
        assert!((dist.median - 2.0).abs() < 1e-9);
        assert!((dist.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_mode_serde_snake_case() {
        let yaml = serde_yaml::to_string(&OrchestrationMode::HubLed).unwrap();
        assert!(yaml.contains("hub_led"));
        let back: OrchestrationMode = serde_yaml::from_str("balanced").unwrap();
        assert_eq!(back, OrchestrationMode::Balanced);
    }

    #[test]
    fn test_config_validation() {
        assert!(OrchestrationConfig::default().validate().is_ok());
        let bad = OrchestrationConfig {
            prominence_multiplier: -1.0,
            ..OrchestrationConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
