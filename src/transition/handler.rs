//! Audible gestures for hub transitions.
//!
//! Each detected [`HubTransitionEvent`] is rendered as a short synthesized
//! gesture on the [`AudioBackend`]:
//!
//! - **Emergence**: a harmonic stack swelling from near-silence to a peak
//!   scaled by the new score.
//! - **Demise**: a two-partial chord fading out along a logarithmic curve,
//!   emulated with discrete linear set-points.
//! - **Shift**: a filtered sawtooth sweeping from the old pitch to the new
//!   one, opening the filter when prominence rose and closing it when it
//!   fell.
//!
//! Gestures are tracked in a per-node registry. Triggering a new transition
//! for a node replaces its active gesture and reclaims the old one's
//! resources. A spawned cleanup task releases the voice once the gesture
//! duration has passed and disposes backend handles after a short silence
//! pad, so tails are never cut off.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::audio::backend::{
    AudioBackend, AudioBackendError, Envelope, FilterId, FilterParams, OscillatorShape, RampKind,
    VoiceId, VoiceParams,
};
use crate::events::TransitionBus;

use super::detector::{HubTransitionEvent, TransitionKind};

/// Silence pad between a gesture's release and resource disposal, long
/// enough for the voice's release tail to ring out.
const EMERGENCE_PAD: Duration = Duration::from_secs(2);
const DEMISE_PAD: Duration = Duration::from_secs(2);
const SHIFT_PAD: Duration = Duration::from_secs(1);

/// Near-zero starting level for exponential ramps, which cannot start at 0.
const RAMP_FLOOR: f64 = 0.001;

// ============================================================================
// Pitch and timbre maps
// ============================================================================

/// Map a composite score to a fundamental frequency, 220–660 Hz.
pub fn frequency_for_score(score: f64) -> f64 {
    220.0 + score * 440.0
}

/// Map a composite score to a low-pass cutoff, 500–3000 Hz.
pub fn cutoff_for_score(score: f64) -> f64 {
    500.0 + score * 2500.0
}

/// Build a harmonic stack over a fundamental.
///
/// Enrichment 0.0 gives the fundamental plus its octave; 1.0 fills in the
/// perfect fifth and two upper partials for a five-note stack.
pub fn harmonic_stack(fundamental: f64, enrichment: f64) -> Vec<f32> {
    let count = (2 + (enrichment * 3.0).round() as usize).clamp(2, 5);
    (0..count)
        .map(|i| {
            let ratio = match i {
                0 => 1.0,
                1 => 2.0,
                2 => 1.5,
                _ => 1.0 + i as f64 * 0.2,
            };
            (fundamental * ratio) as f32
        })
        .collect()
}

fn gesture_duration(event: &HubTransitionEvent) -> Duration {
    Duration::from_secs_f64(event.audio.duration_secs.max(0.0))
}

fn dispose_quietly(backend: &Arc<dyn AudioBackend>, voice: VoiceId, filter: Option<FilterId>) {
    if let Err(error) = backend.dispose_voice(voice) {
        debug!(%error, "voice disposal failed");
    }
    if let Some(filter) = filter {
        if let Err(error) = backend.dispose_filter(filter) {
            debug!(%error, "filter disposal failed");
        }
    }
}

// ============================================================================
// Handler
// ============================================================================

/// A gesture currently sounding, plus the task that reclaims it.
struct ActiveTransition {
    event: HubTransitionEvent,
    voice: VoiceId,
    filter: Option<FilterId>,
    cleanup: JoinHandle<()>,
}

/// Renders transition events as audio gestures and tracks their lifetime.
pub struct TransitionHandler {
    backend: Arc<dyn AudioBackend>,
    active: Arc<DashMap<String, ActiveTransition>>,
    bus: Option<TransitionBus>,
}

impl TransitionHandler {
    /// Create a handler with no event bus attached.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            active: Arc::new(DashMap::new()),
            bus: None,
        }
    }

    /// Create a handler that also broadcasts every triggered event.
    pub fn with_bus(backend: Arc<dyn AudioBackend>, bus: TransitionBus) -> Self {
        Self {
            backend,
            active: Arc::new(DashMap::new()),
            bus: Some(bus),
        }
    }

    /// Render the audible gesture for a transition event.
    ///
    /// The event is broadcast on the bus (when one is attached) whether or
    /// not the backend accepts the gesture. Backend errors are logged and
    /// the gesture dropped; they never propagate to the caller.
    ///
    /// Must be called from within a Tokio runtime, which the cleanup task
    /// is spawned onto.
    pub fn trigger_transition(&self, event: HubTransitionEvent) {
        if let Some(bus) = &self.bus {
            bus.emit(event.clone());
        }

        let result = match event.kind {
            TransitionKind::Emergence => self.trigger_hub_emergence(&event),
            TransitionKind::Demise => self.trigger_hub_demise(&event),
            TransitionKind::Shift => self.trigger_hub_shift(&event),
        };

        if let Err(error) = result {
            warn!(
                node_id = %event.node_id,
                kind = %event.kind,
                %error,
                "transition gesture dropped"
            );
        }
    }

    /// Swell a harmonic stack in from near-silence.
    fn trigger_hub_emergence(&self, event: &HubTransitionEvent) -> Result<(), AudioBackendError> {
        let duration = gesture_duration(event);
        let peak = 0.3 + event.new_score * 0.5;
        let frequencies = harmonic_stack(
            frequency_for_score(event.new_score),
            event.audio.harmonic_enrichment,
        );

        let voice = self.backend.create_voice(VoiceParams {
            oscillator: OscillatorShape::Sine,
            envelope: Envelope {
                attack: 0.05,
                decay: 0.2,
                sustain: 0.9,
                release: 1.5,
            },
        })?;

        if let Err(error) = self.emergence_calls(voice, &frequencies, peak, duration) {
            dispose_quietly(&self.backend, voice, None);
            return Err(error);
        }

        self.register(event.clone(), voice, None, frequencies, EMERGENCE_PAD);
        Ok(())
    }

    fn emergence_calls(
        &self,
        voice: VoiceId,
        frequencies: &[f32],
        peak: f64,
        duration: Duration,
    ) -> Result<(), AudioBackendError> {
        self.backend
            .set_volume(voice, RAMP_FLOOR, Duration::ZERO, RampKind::Set)?;
        self.backend.attack(voice, frequencies, peak)?;
        self.backend
            .set_volume(voice, peak, duration, RampKind::Exponential)
    }

    /// Fade a thin chord out along a logarithmic curve.
    fn trigger_hub_demise(&self, event: &HubTransitionEvent) -> Result<(), AudioBackendError> {
        let duration = gesture_duration(event);
        let start = 0.3 + event.previous_score * 0.5;
        let frequencies = harmonic_stack(
            frequency_for_score(event.previous_score),
            event.audio.harmonic_enrichment,
        );

        let voice = self.backend.create_voice(VoiceParams {
            oscillator: OscillatorShape::Triangle,
            envelope: Envelope {
                attack: 0.02,
                decay: 0.1,
                sustain: 0.8,
                release: 2.0,
            },
        })?;

        if let Err(error) = self.demise_calls(voice, &frequencies, start, duration) {
            dispose_quietly(&self.backend, voice, None);
            return Err(error);
        }

        self.register(event.clone(), voice, None, frequencies, DEMISE_PAD);
        Ok(())
    }

    /// Backends only ramp linearly or exponentially, so the logarithmic
    /// fadeout is approximated with ten linear segments through
    /// `start * log10(10 - 9k/10)`, which lands exactly at zero on the
    /// final point.
    fn demise_calls(
        &self,
        voice: VoiceId,
        frequencies: &[f32],
        start: f64,
        duration: Duration,
    ) -> Result<(), AudioBackendError> {
        self.backend
            .set_volume(voice, start, Duration::ZERO, RampKind::Set)?;
        self.backend.attack(voice, frequencies, start)?;
        for k in 1..=10u32 {
            let level = start * (10.0 - 9.0 * f64::from(k) / 10.0).log10();
            let at = duration.mul_f64(f64::from(k) / 10.0);
            self.backend.set_volume(voice, level, at, RampKind::Linear)?;
        }
        Ok(())
    }

    /// Sweep pitch and filter cutoff from the old prominence to the new.
    fn trigger_hub_shift(&self, event: &HubTransitionEvent) -> Result<(), AudioBackendError> {
        let duration = gesture_duration(event);
        let rising = event.new_score > event.previous_score;
        let target_hz = frequency_for_score(event.new_score);
        let frequencies = vec![frequency_for_score(event.previous_score) as f32];

        let voice = self.backend.create_voice(VoiceParams {
            oscillator: OscillatorShape::Sawtooth,
            envelope: Envelope {
                attack: 0.01,
                decay: 0.1,
                sustain: 0.85,
                release: 1.0,
            },
        })?;

        let filter = match self.backend.create_filter(FilterParams {
            cutoff_hz: cutoff_for_score(event.previous_score),
            ..FilterParams::default()
        }) {
            Ok(filter) => filter,
            Err(error) => {
                dispose_quietly(&self.backend, voice, None);
                return Err(error);
            }
        };

        if let Err(error) =
            self.shift_calls(voice, filter, &frequencies, target_hz, rising, duration)
        {
            dispose_quietly(&self.backend, voice, Some(filter));
            return Err(error);
        }

        self.register(event.clone(), voice, Some(filter), frequencies, SHIFT_PAD);
        Ok(())
    }

    fn shift_calls(
        &self,
        voice: VoiceId,
        filter: FilterId,
        frequencies: &[f32],
        target_hz: f64,
        rising: bool,
        duration: Duration,
    ) -> Result<(), AudioBackendError> {
        self.backend.attack(voice, frequencies, 0.5)?;
        self.backend.ramp_frequency(voice, target_hz, duration)?;
        let (cutoff_target, volume_target) = if rising { (3000.0, 0.7) } else { (500.0, 0.3) };
        self.backend
            .ramp_filter_cutoff(filter, cutoff_target, duration)?;
        self.backend
            .set_volume(voice, volume_target, duration, RampKind::Linear)
    }

    /// Track a sounding gesture and schedule its teardown.
    ///
    /// If the node already has an active transition, the old cleanup task is
    /// aborted and the old resources disposed here. The event-ID check in
    /// the cleanup task keeps a task that lost its entry from disposing
    /// anything, so resources are reclaimed exactly once.
    fn register(
        &self,
        event: HubTransitionEvent,
        voice: VoiceId,
        filter: Option<FilterId>,
        frequencies: Vec<f32>,
        pad: Duration,
    ) {
        let backend = Arc::clone(&self.backend);
        let registry = Arc::clone(&self.active);
        let event_id = event.id;
        let node_id = event.node_id.clone();
        let duration = gesture_duration(&event);

        let cleanup = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Err(error) = backend.release(voice, &frequencies) {
                debug!(%error, "voice release failed");
            }
            tokio::time::sleep(pad).await;
            let removed = registry.remove_if(&node_id, |_, active| active.event.id == event_id);
            if let Some((_, active)) = removed {
                dispose_quietly(&backend, active.voice, active.filter);
            }
        });

        let key = event.node_id.clone();
        let entry = ActiveTransition {
            event,
            voice,
            filter,
            cleanup,
        };
        if let Some(old) = self.active.insert(key, entry) {
            old.cleanup.abort();
            dispose_quietly(&self.backend, old.voice, old.filter);
        }
    }

    /// Abort all cleanup tasks, dispose their resources, and empty the
    /// registry.
    ///
    /// This reclaims handles only. Audio already scheduled on the backend
    /// keeps sounding; call [`AudioBackend::release_all`] for a hard stop.
    pub fn clear_all(&self) {
        let keys: Vec<String> = self.active.iter().map(|entry| entry.key().clone()).collect();
        for key in keys {
            if let Some((_, active)) = self.active.remove(&key) {
                active.cleanup.abort();
                dispose_quietly(&self.backend, active.voice, active.filter);
            }
        }
    }

    /// Number of gestures currently sounding.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Snapshot of the events currently sounding, sorted by node ID.
    pub fn active_transitions(&self) -> Vec<HubTransitionEvent> {
        let mut events: Vec<HubTransitionEvent> = self
            .active
            .iter()
            .map(|entry| entry.value().event.clone())
            .collect();
        events.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        events
    }
}
