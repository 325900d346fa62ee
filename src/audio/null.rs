//! No-op audio backend for headless operation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::backend::{
    AudioBackend, AudioBackendError, FilterId, FilterParams, RampKind, VoiceId, VoiceParams,
};

/// Backend that accepts every call and produces no sound.
///
/// Lets the decision engine run its full transition lifecycle (voice
/// creation, ramps, deferred cleanup) in servers, tests, and batch analysis
/// where no synthesis layer is attached. Handles are allocated from one
/// shared counter so voice and filter IDs never collide.
#[derive(Debug, Default)]
pub struct NullAudioBackend {
    next_id: AtomicU64,
}

impl NullAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl AudioBackend for NullAudioBackend {
    fn create_voice(&self, _params: VoiceParams) -> Result<VoiceId, AudioBackendError> {
        Ok(VoiceId(self.next()))
    }

    fn attack(
        &self,
        _voice: VoiceId,
        _frequencies: &[f32],
        _velocity: f64,
    ) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn release(&self, _voice: VoiceId, _frequencies: &[f32]) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn set_volume(
        &self,
        _voice: VoiceId,
        _value: f64,
        _at: Duration,
        _ramp: RampKind,
    ) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn ramp_frequency(
        &self,
        _voice: VoiceId,
        _to_hz: f64,
        _over: Duration,
    ) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn create_filter(&self, _params: FilterParams) -> Result<FilterId, AudioBackendError> {
        Ok(FilterId(self.next()))
    }

    fn ramp_filter_cutoff(
        &self,
        _filter: FilterId,
        _to_hz: f64,
        _over: Duration,
    ) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn dispose_voice(&self, _voice: VoiceId) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn dispose_filter(&self, _filter: FilterId) -> Result<(), AudioBackendError> {
        Ok(())
    }

    fn release_all(&self) -> Result<(), AudioBackendError> {
        Ok(())
    }
}
