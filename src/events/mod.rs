//! Transition event distribution.
//!
//! Downstream consumers (visualizers, loggers, recording sinks) observe hub
//! transitions without being wired into the engine: every event handed to
//! the transition handler is also published on a broadcast bus that anyone
//! can subscribe to.

mod bus;

pub use bus::TransitionBus;
