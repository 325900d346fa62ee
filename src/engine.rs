//! Engine facade wiring the full decision pipeline.
//!
//! One [`SonificationEngine::update`] call runs every stage over the
//! current graph snapshot:
//!
//! ```text
//! nodes/links/clusters
//!        │
//!        ▼
//! CentralityAnalyzer ──► detect_hub_transitions ──► TransitionHandler
//!        │                 (vs. previous pass)        (gestures + bus)
//!        ▼
//! DynamicOrchestrationManager ──► OrchestrationState
//!        │
//!        ▼
//! OrchestrationManager ──► per-cluster OrchestrationDecisions
//! ```
//!
//! The engine keeps the previous centrality report so consecutive calls
//! sonify what changed, not what is.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tokio::sync::broadcast;

use crate::audio::AudioBackend;
use crate::centrality::{CentralityAnalyzer, CentralityReport};
use crate::complexity::ComplexityAnalyzer;
use crate::events::TransitionBus;
use crate::graph::{Cluster, GraphLink, GraphNode};
use crate::orchestration::{
    DynamicOrchestrationManager, OrchestrationDecisions, OrchestrationManager, OrchestrationState,
};
use crate::transition::{detect_hub_transitions, HubTransitionEvent, TransitionHandler};
use crate::SonifierConfig;

/// Everything one update pass decided.
#[derive(Debug, Clone)]
pub struct SonificationUpdate {
    /// Centrality metrics the pass was based on (possibly cache-shared).
    pub report: Arc<CentralityReport>,
    /// Hub transitions detected against the previous pass.
    pub transitions: Vec<HubTransitionEvent>,
    /// Musical treatment per input cluster, in input order.
    pub decisions: Vec<OrchestrationDecisions>,
    /// Dynamic orchestration state after the pass.
    pub state: OrchestrationState,
}

/// Top-level facade over the decision engine.
pub struct SonificationEngine {
    analyzer: Arc<CentralityAnalyzer>,
    orchestration: OrchestrationManager,
    transitions: TransitionHandler,
    dynamics: DynamicOrchestrationManager,
    bus: TransitionBus,
    last_report: Mutex<Option<Arc<CentralityReport>>>,
}

impl SonificationEngine {
    /// Create an engine with all components initialized from one config.
    pub fn new(config: SonifierConfig, backend: Arc<dyn AudioBackend>) -> Self {
        let analyzer = Arc::new(CentralityAnalyzer::new(config.centrality));
        let bus = TransitionBus::default();

        Self {
            orchestration: OrchestrationManager::new(Arc::clone(&analyzer), config.orchestration),
            transitions: TransitionHandler::with_bus(backend, bus.clone()),
            dynamics: DynamicOrchestrationManager::new(
                ComplexityAnalyzer::new(config.complexity),
                config.temporal,
                config.dynamics,
            ),
            analyzer,
            bus,
            last_report: Mutex::new(None),
        }
    }

    /// Create an engine from a YAML config file.
    ///
    /// A missing file means defaults; see [`SonifierConfig::from_yaml_file`].
    pub fn from_config_file(
        path: impl AsRef<Path>,
        backend: Arc<dyn AudioBackend>,
    ) -> Result<Self> {
        let config = SonifierConfig::from_yaml_file(path)?;
        Ok(Self::new(config, backend))
    }

    /// Run one full decision pass over the current graph snapshot.
    ///
    /// Computes centrality (served from cache within the TTL window),
    /// sonifies hub transitions against the previous pass, advances the
    /// dynamic orchestration state, and derives per-cluster decisions.
    ///
    /// Transition gestures spawn cleanup tasks, so call this from within a
    /// Tokio runtime whenever transitions can fire.
    pub fn update(
        &self,
        nodes: &[GraphNode],
        links: &[GraphLink],
        clusters: &[Cluster],
    ) -> SonificationUpdate {
        let report = self.analyzer.compute_metrics(nodes, links);

        let previous = self
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&report));

        let transitions = match previous {
            Some(previous) => {
                let threshold = self.analyzer.config().hub_threshold;
                detect_hub_transitions(&previous, &report, threshold)
            }
            None => Vec::new(),
        };
        for event in &transitions {
            self.transitions.trigger_transition(event.clone());
        }

        let state = self.dynamics.update_orchestration(nodes, links, Some(clusters));

        let decisions = clusters
            .iter()
            .map(|cluster| {
                self.orchestration
                    .orchestrate_cluster_from_hub(cluster, nodes, links)
            })
            .collect();

        SonificationUpdate {
            report,
            transitions,
            decisions,
            state,
        }
    }

    /// Subscribe to the transition broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<HubTransitionEvent> {
        self.bus.subscribe()
    }

    pub fn analyzer(&self) -> &Arc<CentralityAnalyzer> {
        &self.analyzer
    }

    pub fn orchestration(&self) -> &OrchestrationManager {
        &self.orchestration
    }

    pub fn transitions(&self) -> &TransitionHandler {
        &self.transitions
    }

    pub fn dynamics(&self) -> &DynamicOrchestrationManager {
        &self.dynamics
    }
}
