//! Hub-driven orchestration.
//!
//! Two layers of decision-making share this module:
//!
//! ```text
//! CentralityAnalyzer ──► OrchestrationManager ──► per-cluster decisions
//!                              (roles, volumes, pans, instruments)
//!
//! ComplexityAnalyzer ─┐
//!                     ├──► DynamicOrchestrationManager ──► live state
//! TemporalInfluence ──┘         (tiers, layers, fades)
//! ```
//!
//! ## Modules
//!
//! - [`models`]: Roles, modes, score statistics, and decision structures
//! - [`manager`]: `OrchestrationManager`, per-cluster musical treatment
//! - [`dynamic`]: `DynamicOrchestrationManager`, tier transitions and the
//!   temporal auto-update task

pub mod dynamic;
pub mod manager;
pub mod models;

pub use dynamic::{
    DynamicConfig, DynamicOrchestrationManager, InstrumentLayer, OrchestrationState,
};
pub use manager::OrchestrationManager;
pub use models::{
    ClusterHubAnalysis, MusicalRole, OrchestrationConfig, OrchestrationDecisions,
    OrchestrationMode, ScoreDistribution, DEFAULT_INSTRUMENT,
};
