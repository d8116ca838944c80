//! Per-screen context publisher
//!
//! Each workflow screen owns one of these and calls [`ContextPublisher::publish`]
//! whenever its local state changes. The publisher diffs against the last state
//! it forwarded and issues only the store setters whose inputs actually changed,
//! so an unrelated re-render never triggers a cascade reset.

use serde_json::{Map, Value};

use crate::context::{AvailableAction, ContextStore};

/// The slice of local screen state that feeds the context store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub workflow: Option<String>,
    pub current_step: Option<String>,
    pub current_view: Option<String>,
    pub data: Map<String, Value>,
    pub available_actions: Vec<AvailableAction>,
}

/// Pure forwarding layer between a screen and the [`ContextStore`].
/// No retries, no errors: a publish either forwards changed fields or
/// does nothing.
pub struct ContextPublisher {
    store: ContextStore,
    last: ScreenState,
}

impl ContextPublisher {
    pub fn new(store: ContextStore) -> Self {
        Self {
            store,
            last: ScreenState::default(),
        }
    }

    /// Forward every field that changed since the previous publish.
    ///
    /// Actions are forwarded as a full clear-then-register pass so an entry
    /// removed by the screen cannot survive in the registry.
    pub fn publish(&mut self, state: &ScreenState) {
        if state.workflow != self.last.workflow {
            self.store.set_workflow(state.workflow.clone());
        }
        if state.current_step != self.last.current_step {
            self.store.set_current_step(state.current_step.clone());
        }
        if state.current_view != self.last.current_view {
            self.store.set_current_view(state.current_view.clone());
        }
        if state.data != self.last.data {
            self.store.merge_data(state.data.clone());
        }
        if state.available_actions != self.last.available_actions {
            self.store.clear_actions();
            for action in &state.available_actions {
                self.store.register_action(action.clone());
            }
        }
        self.last = state.clone();
    }
}
