//! Audio backend abstraction.
//!
//! The decision engine never touches an audio device itself; it drives a
//! host-provided synthesis layer through the [`AudioBackend`] trait. Calls
//! are synchronous fire-and-forget: the backend schedules the requested
//! parameter change on its own timeline and returns immediately. Ramp
//! offsets are relative to the moment of the call.
//!
//! Backends that cannot express logarithmic volume curves natively are not
//! asked to: the transition handler emulates those with discrete linear
//! set-points.

use std::time::Duration;
use thiserror::Error;

/// Handle for a playing or prepared voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u64);

/// Handle for a filter node owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(pub u64);

/// Basic oscillator waveform for a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorShape {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl Default for OscillatorShape {
    fn default() -> Self {
        Self::Sine
    }
}

/// ADSR envelope in seconds (sustain is a level, 0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.02,
            decay: 0.15,
            sustain: 0.7,
            release: 1.0,
        }
    }
}

/// Parameters for creating a voice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoiceParams {
    pub oscillator: OscillatorShape,
    pub envelope: Envelope,
}

/// Parameters for creating a low-pass filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub cutoff_hz: f64,
    pub q: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff_hz: 1000.0,
            q: 1.0,
        }
    }
}

/// How a scheduled parameter change approaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampKind {
    /// Jump to the value at the given offset
    Set,
    /// Linear ramp ending at the given offset
    Linear,
    /// Exponential ramp ending at the given offset
    Exponential,
}

#[derive(Debug, Error)]
pub enum AudioBackendError {
    #[error("unknown voice: {0:?}")]
    UnknownVoice(VoiceId),

    #[error("unknown filter: {0:?}")]
    UnknownFilter(FilterId),

    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
}

/// Host-provided synthesis layer.
///
/// Implementations must be safe to call from multiple tasks at once; the
/// transition handler shares one backend behind an `Arc` and calls it from
/// spawned cleanup tasks as well as the triggering thread.
pub trait AudioBackend: Send + Sync {
    /// Allocate a voice with the given oscillator and envelope.
    fn create_voice(&self, params: VoiceParams) -> Result<VoiceId, AudioBackendError>;

    /// Start the given frequencies sounding on a voice.
    fn attack(
        &self,
        voice: VoiceId,
        frequencies: &[f32],
        velocity: f64,
    ) -> Result<(), AudioBackendError>;

    /// Enter the release phase for the given frequencies.
    fn release(&self, voice: VoiceId, frequencies: &[f32]) -> Result<(), AudioBackendError>;

    /// Schedule a volume change reaching `value` at offset `at`.
    fn set_volume(
        &self,
        voice: VoiceId,
        value: f64,
        at: Duration,
        ramp: RampKind,
    ) -> Result<(), AudioBackendError>;

    /// Sweep the voice's fundamental to `to_hz` over the given span.
    fn ramp_frequency(
        &self,
        voice: VoiceId,
        to_hz: f64,
        over: Duration,
    ) -> Result<(), AudioBackendError>;

    /// Allocate a low-pass filter.
    fn create_filter(&self, params: FilterParams) -> Result<FilterId, AudioBackendError>;

    /// Sweep a filter's cutoff to `to_hz` over the given span.
    fn ramp_filter_cutoff(
        &self,
        filter: FilterId,
        to_hz: f64,
        over: Duration,
    ) -> Result<(), AudioBackendError>;

    /// Free a voice and its resources.
    fn dispose_voice(&self, voice: VoiceId) -> Result<(), AudioBackendError>;

    /// Free a filter and its resources.
    fn dispose_filter(&self, filter: FilterId) -> Result<(), AudioBackendError>;

    /// Hard-stop everything the backend is sounding.
    fn release_all(&self) -> Result<(), AudioBackendError>;
}
