//! Recording audio backend for testing consumers.
//!
//! Logs every call it receives so tests can assert on the exact gesture a
//! transition produced, and supports scripted voice-creation failure so the
//! drop-and-log error path is testable.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::backend::{
    AudioBackend, AudioBackendError, FilterId, FilterParams, RampKind, VoiceId, VoiceParams,
};

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateVoice {
        params: VoiceParams,
    },
    Attack {
        voice: VoiceId,
        frequencies: Vec<f32>,
        velocity: f64,
    },
    Release {
        voice: VoiceId,
        frequencies: Vec<f32>,
    },
    SetVolume {
        voice: VoiceId,
        value: f64,
        at: Duration,
        ramp: RampKind,
    },
    RampFrequency {
        voice: VoiceId,
        to_hz: f64,
        over: Duration,
    },
    CreateFilter {
        params: FilterParams,
    },
    RampFilterCutoff {
        filter: FilterId,
        to_hz: f64,
        over: Duration,
    },
    DisposeVoice {
        voice: VoiceId,
    },
    DisposeFilter {
        filter: FilterId,
    },
    ReleaseAll,
}

/// Backend that records calls instead of making sound.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    next_id: AtomicU64,
    fail_create: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create_voice` calls fail.
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::Relaxed);
    }

    /// Snapshot of every call recorded so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Voices that have been disposed, in disposal order.
    pub fn disposed_voices(&self) -> Vec<VoiceId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::DisposeVoice { voice } => Some(voice),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn next(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl AudioBackend for RecordingBackend {
    fn create_voice(&self, params: VoiceParams) -> Result<VoiceId, AudioBackendError> {
        if self.fail_create.load(Ordering::Relaxed) {
            return Err(AudioBackendError::Unavailable(
                "scripted create failure".into(),
            ));
        }
        self.record(BackendCall::CreateVoice { params });
        Ok(VoiceId(self.next()))
    }

    fn attack(
        &self,
        voice: VoiceId,
        frequencies: &[f32],
        velocity: f64,
    ) -> Result<(), AudioBackendError> {
        self.record(BackendCall::Attack {
            voice,
            frequencies: frequencies.to_vec(),
            velocity,
        });
        Ok(())
    }

    fn release(&self, voice: VoiceId, frequencies: &[f32]) -> Result<(), AudioBackendError> {
        self.record(BackendCall::Release {
            voice,
            frequencies: frequencies.to_vec(),
        });
        Ok(())
    }

    fn set_volume(
        &self,
        voice: VoiceId,
        value: f64,
        at: Duration,
        ramp: RampKind,
    ) -> Result<(), AudioBackendError> {
        self.record(BackendCall::SetVolume {
            voice,
            value,
            at,
            ramp,
        });
        Ok(())
    }

    fn ramp_frequency(
        &self,
        voice: VoiceId,
        to_hz: f64,
        over: Duration,
    ) -> Result<(), AudioBackendError> {
        self.record(BackendCall::RampFrequency { voice, to_hz, over });
        Ok(())
    }

    fn create_filter(&self, params: FilterParams) -> Result<FilterId, AudioBackendError> {
        self.record(BackendCall::CreateFilter { params });
        Ok(FilterId(self.next()))
    }

    fn ramp_filter_cutoff(
        &self,
        filter: FilterId,
        to_hz: f64,
        over: Duration,
    ) -> Result<(), AudioBackendError> {
        self.record(BackendCall::RampFilterCutoff { filter, to_hz, over });
        Ok(())
    }

    fn dispose_voice(&self, voice: VoiceId) -> Result<(), AudioBackendError> {
        self.record(BackendCall::DisposeVoice { voice });
        Ok(())
    }

    fn dispose_filter(&self, filter: FilterId) -> Result<(), AudioBackendError> {
        self.record(BackendCall::DisposeFilter { filter });
        Ok(())
    }

    fn release_all(&self) -> Result<(), AudioBackendError> {
        self.record(BackendCall::ReleaseAll);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_backend_logs_in_order() {
        let backend = RecordingBackend::new();
        let voice = backend.create_voice(VoiceParams::default()).unwrap();
        backend.attack(voice, &[220.0], 0.5).unwrap();
        backend.dispose_voice(voice).unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], BackendCall::CreateVoice { .. }));
        assert!(matches!(calls[1], BackendCall::Attack { .. }));
        assert!(matches!(calls[2], BackendCall::DisposeVoice { .. }));
        assert_eq!(backend.disposed_voices(), vec![voice]);
    }

    #[test]
    fn test_scripted_create_failure() {
        let backend = RecordingBackend::new();
        backend.set_fail_create(true);
        assert!(backend.create_voice(VoiceParams::default()).is_err());

        backend.set_fail_create(false);
        assert!(backend.create_voice(VoiceParams::default()).is_ok());
    }
}
