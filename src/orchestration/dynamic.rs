//! Live orchestration state with tier transitions.
//!
//! Owns the mutable [`OrchestrationState`]: which complexity tier is active,
//! which layers are sounding, and how far along a tier transition is. Tier
//! changes do not cut over instantly; newly added layers fade in over the
//! configured transition duration, with progress recomputed from wall-clock
//! elapsed time on each update call rather than frame-driven.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::complexity::{
    ComplexityAnalyzer, ComplexityTier, OrchestrationLayer, VaultComplexity,
};
use crate::error::SonifierError;
use crate::graph::{Cluster, GraphLink, GraphNode};
use crate::temporal::{TemporalConfig, TemporalInfluence};

// ============================================================================
// Configuration and state types
// ============================================================================

/// Timing knobs for the dynamic manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicConfig {
    /// How long a tier transition takes to fade in (default: 3000)
    pub transition_duration_ms: u64,
    /// Period of the temporal re-sampling task (default: 60000)
    pub auto_update_interval_ms: u64,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: 3000,
            auto_update_interval_ms: 60_000,
        }
    }
}

impl DynamicConfig {
    pub fn validate(&self) -> Result<(), SonifierError> {
        if self.auto_update_interval_ms == 0 {
            return Err(SonifierError::InvalidConfig(
                "auto_update_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One sounding layer with its resolved instruments and volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentLayer {
    pub layer: OrchestrationLayer,
    /// Temporal-preferred instruments from the layer's pool, or the full
    /// pool when nothing matches
    pub instruments: Vec<String>,
    /// Mixing volume after tier, temporal, and fade scaling (0.0–1.0)
    pub volume: f64,
}

/// Snapshot of the live orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationState {
    pub complexity: VaultComplexity,
    pub active_tier: ComplexityTier,
    /// Tier before the most recent change, kept after the fade completes
    pub previous_tier: Option<ComplexityTier>,
    pub active_layers: Vec<OrchestrationLayer>,
    /// Present only when temporal influence is enabled
    pub temporal: Option<TemporalInfluence>,
    pub instrument_layers: Vec<InstrumentLayer>,
    /// 0.0 right after a tier change, 1.0 once the fade has finished
    pub transition_progress: f64,
    pub last_update: DateTime<Utc>,
}

impl Default for OrchestrationState {
    fn default() -> Self {
        Self {
            complexity: VaultComplexity::default(),
            active_tier: ComplexityTier::Minimal,
            previous_tier: None,
            active_layers: ComplexityTier::Minimal.layers().to_vec(),
            temporal: None,
            instrument_layers: Vec::new(),
            transition_progress: 1.0,
            last_update: Utc::now(),
        }
    }
}

// ============================================================================
// Manager
// ============================================================================

struct Inner {
    state: OrchestrationState,
    // Instant stays out of OrchestrationState so snapshots serialize.
    transition_started: Option<Instant>,
}

/// Owns live orchestration state and advances tier transitions.
///
/// Graph-driven updates come through [`update_orchestration`]
/// (event-driven, called by the host when the vault changes); the optional
/// auto-update task re-samples only the temporal influence so the mood
/// drifts with the clock even when the vault is quiet.
///
/// [`update_orchestration`]: DynamicOrchestrationManager::update_orchestration
pub struct DynamicOrchestrationManager {
    complexity: ComplexityAnalyzer,
    temporal_config: TemporalConfig,
    config: DynamicConfig,
    inner: Arc<RwLock<Inner>>,
    auto_update_tx: Mutex<Option<mpsc::Sender<()>>>,
}

impl DynamicOrchestrationManager {
    pub fn new(
        complexity: ComplexityAnalyzer,
        temporal_config: TemporalConfig,
        config: DynamicConfig,
    ) -> Self {
        Self {
            complexity,
            temporal_config,
            config,
            inner: Arc::new(RwLock::new(Inner {
                state: OrchestrationState::default(),
                transition_started: None,
            })),
            auto_update_tx: Mutex::new(None),
        }
    }

    /// Re-evaluate complexity (and temporal influence when enabled) for a
    /// new snapshot, advancing or starting a tier transition as needed.
    /// Returns the updated state.
    pub fn update_orchestration(
        &self,
        nodes: &[GraphNode],
        links: &[GraphLink],
        clusters: Option<&[Cluster]>,
    ) -> OrchestrationState {
        let complexity = self.complexity.evaluate(nodes, links, clusters);
        let temporal = self
            .temporal_config
            .enabled
            .then(|| TemporalInfluence::sample(&self.temporal_config));

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let new_tier = complexity.tier;
        if new_tier != inner.state.active_tier {
            info!(
                from = %inner.state.active_tier,
                to = %new_tier,
                node_count = complexity.total_nodes,
                "orchestration tier changed"
            );
            inner.state.previous_tier = Some(inner.state.active_tier);
            inner.state.active_tier = new_tier;
            inner.state.active_layers = new_tier.layers().to_vec();
            inner.transition_started = Some(Instant::now());
        }

        let progress = transition_progress(
            inner.transition_started,
            Duration::from_millis(self.config.transition_duration_ms),
        );

        inner.state.complexity = complexity;
        inner.state.temporal = temporal;
        inner.state.transition_progress = progress;
        inner.state.instrument_layers = build_instrument_layers(
            inner.state.active_tier,
            inner.state.previous_tier,
            &inner.state.active_layers,
            inner.state.temporal.as_ref(),
            progress,
        );
        inner.state.last_update = Utc::now();

        inner.state.clone()
    }

    /// Clone of the current state.
    pub fn state(&self) -> OrchestrationState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    /// Whether a tier fade was still in progress at the last update.
    pub fn transitioning(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .transition_progress
            < 1.0
    }

    /// Spawn the periodic temporal re-sampling task. Does nothing when
    /// temporal influence is disabled or the task is already running.
    pub fn start_auto_update(&self) {
        if !self.temporal_config.enabled {
            debug!("temporal influence disabled, auto-update not started");
            return;
        }

        let mut guard = self
            .auto_update_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            debug!("auto-update already running");
            return;
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        *guard = Some(stop_tx);

        let inner = Arc::clone(&self.inner);
        let temporal_config = self.temporal_config.clone();
        let period = Duration::from_millis(self.config.auto_update_interval_ms);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick fires immediately; skip it so the task only
            // acts after a full period.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        debug!("auto-update stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let influence = TemporalInfluence::sample(&temporal_config);
                        let mut inner =
                            inner.write().unwrap_or_else(PoisonError::into_inner);
                        inner.state.temporal = Some(influence);
                        let progress = inner.state.transition_progress;
                        inner.state.instrument_layers = build_instrument_layers(
                            inner.state.active_tier,
                            inner.state.previous_tier,
                            &inner.state.active_layers,
                            inner.state.temporal.as_ref(),
                            progress,
                        );
                        inner.state.last_update = Utc::now();
                        debug!("temporal influence re-sampled");
                    }
                }
            }
        });

        info!(
            interval_ms = self.config.auto_update_interval_ms,
            "auto-update started"
        );
    }

    /// Signal the auto-update task to stop. Safe to call when not running.
    pub fn stop_auto_update(&self) {
        let tx = self
            .auto_update_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = tx {
            let _ = tx.try_send(());
        }
    }

    /// Whether the auto-update task is currently active.
    pub fn auto_update_running(&self) -> bool {
        self.auto_update_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for DynamicOrchestrationManager {
    fn drop(&mut self) {
        self.stop_auto_update();
    }
}

/// Elapsed fraction of a transition, 1.0 when none is running or the
/// configured duration is zero.
fn transition_progress(started: Option<Instant>, duration: Duration) -> f64 {
    match started {
        None => 1.0,
        Some(t0) => {
            if duration.is_zero() {
                return 1.0;
            }
            (t0.elapsed().as_secs_f64() / duration.as_secs_f64()).min(1.0)
        }
    }
}

/// Resolve instruments and volume for every active layer.
///
/// Layers that were already sounding in the previous tier play at full
/// fade; layers new to this tier scale in with the transition progress.
fn build_instrument_layers(
    tier: ComplexityTier,
    previous_tier: Option<ComplexityTier>,
    layers: &[OrchestrationLayer],
    temporal: Option<&TemporalInfluence>,
    progress: f64,
) -> Vec<InstrumentLayer> {
    let density = temporal.map(|t| t.orchestral_density).unwrap_or(0.5);
    let carried: &[OrchestrationLayer] =
        previous_tier.map(ComplexityTier::layers).unwrap_or(layers);

    layers
        .iter()
        .map(|&layer| {
            let pool = layer.base_pool();
            let mut instruments: Vec<String> = match temporal {
                Some(t) => pool
                    .iter()
                    .filter(|name| t.preferred_instruments.iter().any(|p| p == *name))
                    .map(|s| (*s).to_string())
                    .collect(),
                None => Vec::new(),
            };
            if instruments.is_empty() {
                instruments = pool.iter().map(|s| (*s).to_string()).collect();
            }

            let fade = if carried.contains(&layer) { 1.0 } else { progress };
            let volume = (layer.base_volume()
                * tier.instrument_density()
                * (0.5 + density)
                * fade)
                .clamp(0.0, 1.0);

            InstrumentLayer {
                layer,
                instruments,
                volume,
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
