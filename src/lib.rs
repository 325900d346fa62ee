//! Knowledge-graph sonification decision engine.
//!
//! Continuously translates the structure of a knowledge graph into
//! audio-control decisions:
//! - Centrality analysis ranks node prominence and classifies hubs
//! - Per-cluster orchestration assigns musical roles, volumes, and panning
//! - Hub lifecycle changes (emergence, demise, shift) become synthesized
//!   gestures
//! - Vault complexity and wall-clock time drive orchestral layering
//!
//! Sound rendering stays outside the crate: decisions drive a
//! host-provided [`AudioBackend`] and every hub transition is broadcast on
//! a [`TransitionBus`] for presentation layers to observe.

pub mod audio;
pub mod centrality;
pub mod complexity;
pub mod engine;
pub mod error;
pub mod events;
pub mod graph;
pub mod orchestration;
pub mod temporal;
pub mod transition;

#[cfg(test)]
pub(crate) mod test_helpers;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use audio::{AudioBackend, NullAudioBackend};
pub use centrality::{
    CentralityAnalyzer, CentralityConfig, CentralityReport, CentralityWeights, HubMetrics,
    ProminenceTier,
};
pub use complexity::{
    ComplexityAnalyzer, ComplexityThresholds, ComplexityTier, OrchestrationLayer, VaultComplexity,
};
pub use engine::{SonificationEngine, SonificationUpdate};
pub use error::SonifierError;
pub use events::TransitionBus;
pub use graph::{Cluster, ClusterKind, GraphLink, GraphNode};
pub use orchestration::{
    DynamicConfig, DynamicOrchestrationManager, MusicalRole, OrchestrationConfig,
    OrchestrationDecisions, OrchestrationManager, OrchestrationState,
};
pub use temporal::{Season, TemporalConfig, TemporalInfluence, TimeOfDay};
pub use transition::{
    detect_hub_transitions, HubTransitionEvent, TransitionHandler, TransitionKind,
};

// ============================================================================
// Crate configuration
// ============================================================================

/// Top-level YAML configuration file structure
///
/// Every section is optional; absent sections and fields fall back to their
/// defaults, so a partial file tunes only what it names.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SonifierConfig {
    pub centrality: CentralityConfig,
    pub orchestration: OrchestrationConfig,
    pub complexity: ComplexityThresholds,
    pub dynamics: DynamicConfig,
    pub temporal: TemporalConfig,
}

impl SonifierConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: defaults are returned so zero-config
    /// embedding keeps working. Unreadable or malformed files are reported
    /// as [`SonifierError::Io`] / [`SonifierError::Yaml`], and out-of-range
    /// values as [`SonifierError::InvalidConfig`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SonifierError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check every section's parameter ranges.
    pub fn validate(&self) -> Result<(), SonifierError> {
        self.centrality.validate()?;
        self.orchestration.validate()?;
        self.dynamics.validate()?;
        self.temporal.validate()
    }
}

// ============================================================================
// Tests
// ============================================================================
