//! Typed signal bus between the action dispatcher and the screens
//!
//! The dispatcher never holds a reference to live screen state; it broadcasts
//! a [`UiSignal`] and whichever screens subscribed decide for themselves
//! whether the named step/view/filter applies to them. Zero subscribers is a
//! legal, observable state, not an error.

use tokio::sync::broadcast;
use tracing::debug;

use serde_json::Value;

/// One broadcast signal per non-HTTP action type.
#[derive(Debug, Clone, PartialEq)]
pub enum UiSignal {
    AdvanceStep {
        step: String,
    },
    ChangeView {
        view: String,
    },
    ApplyFilter {
        filter_type: String,
        filter_value: Value,
    },
    ApplySort {
        sort_field: String,
        sort_direction: String,
    },
    RunSearch {
        query: String,
    },
    SelectItem {
        item_id: String,
        item_type: Option<String>,
    },
    SubmitForm {
        form_id: String,
        form_data: Value,
    },
    ResetState {
        state_type: String,
    },
}

/// Clonable handle to the broadcast channel shared by all screens.
#[derive(Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<UiSignal>,
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to every signal emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<UiSignal> {
        self.tx.subscribe()
    }

    /// Broadcast a signal, returning how many subscribers received it.
    /// Emission always succeeds; nobody listening just returns 0.
    pub fn emit(&self, signal: UiSignal) -> usize {
        match self.tx.send(signal) {
            Ok(delivered) => delivered,
            Err(broadcast::error::SendError(signal)) => {
                debug!(?signal, "signal emitted with no subscribers");
                0
            }
        }
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        // Enough slack for a burst of directives; screens drain on every tick.
        Self::new(32)
    }
}
