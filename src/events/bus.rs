//! Broadcast bus for hub transition events.

use tokio::sync::broadcast;
use tracing::debug;

use crate::transition::HubTransitionEvent;

/// Default broadcast channel capacity
const DEFAULT_CAPACITY: usize = 1024;

/// Distributes [`HubTransitionEvent`]s via `tokio::sync::broadcast`.
///
/// Fire-and-forget: emitting never blocks, never panics.
/// If no subscribers are connected, events are silently dropped.
///
/// # Example
///
/// ```rust
/// use sonority::TransitionBus;
/// use sonority::transition::{HubTransitionEvent, TransitionKind};
///
/// # tokio_test::block_on(async {
/// let bus = TransitionBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.emit(HubTransitionEvent::new(
///     TransitionKind::Emergence,
///     "notes/rust.md",
///     0.0,
///     0.85,
/// ));
///
/// let event = rx.recv().await.unwrap();
/// assert_eq!(event.node_id, "notes/rust.md");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TransitionBus {
    sender: broadcast::Sender<HubTransitionEvent>,
}

impl TransitionBus {
    /// Create a bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to receive transition events.
    pub fn subscribe(&self) -> broadcast::Receiver<HubTransitionEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Broadcast an event to every subscriber.
    pub fn emit(&self, event: HubTransitionEvent) {
        let node_id = event.node_id.clone();
        let kind = event.kind;
        match self.sender.send(event) {
            Ok(n) => {
                debug!(
                    node_id = %node_id,
                    kind = %kind,
                    subscribers = n,
                    "transition event emitted"
                );
            }
            Err(_) => {
                // No subscribers connected, which is fine
            }
        }
    }
}

impl Default for TransitionBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
