//! Audio backend seam.
//!
//! ## Modules
//!
//! - [`backend`]: The [`AudioBackend`] trait, handle newtypes, and
//!   parameter types shared with host synthesis layers
//! - [`null`]: `NullAudioBackend` for headless operation
//! - [`mock`]: `RecordingBackend` call-log mock (cfg(test) only)

pub mod backend;
pub mod null;

#[cfg(test)]
pub mod mock;

pub use backend::{
    AudioBackend, AudioBackendError, Envelope, FilterId, FilterParams, OscillatorShape, RampKind,
    VoiceId, VoiceParams,
};
pub use null::NullAudioBackend;
