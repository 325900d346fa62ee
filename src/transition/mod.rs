//! Hub transition detection and sonification.
//!
//! The transition pipeline runs in two stages:
//!
//! ```text
//! CentralityReport (previous) ─┐
//!                              ├──► detect_hub_transitions ──► events
//! CentralityReport (current) ──┘            │
//!                                           ▼
//!                                   TransitionHandler ──► AudioBackend
//!                                   (gestures + cleanup)
//! ```
//!
//! ## Modules
//!
//! - [`detector`]: Snapshot comparison and `HubTransitionEvent` types
//! - [`handler`]: `TransitionHandler`, gesture rendering, the active-
//!   transition registry, and timed resource cleanup

pub mod detector;
pub mod handler;

pub use detector::{
    detect_hub_transitions, HubTransitionEvent, RampCurve, TransitionAudioConfig, TransitionEffect,
    TransitionKind,
};
pub use handler::{cutoff_for_score, frequency_for_score, harmonic_stack, TransitionHandler};
