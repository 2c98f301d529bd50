use crate::SupervisorEvent;

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::trace;

/// Fan-out of supervisor events, one unbounded channel per subscriber.
///
/// Events reach every subscriber in the order `emit` was called. Closed
/// receivers are dropped on the next emit.
#[derive(Clone, Default)]
pub struct EventEmitter {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<SupervisorEvent>>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Only events emitted afterwards are delivered.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SupervisorEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        rx
    }

    pub fn emit(&self, event: SupervisorEvent) {
        trace!(kind = event.kind(), "Emitting event");
        self.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<SupervisorEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
