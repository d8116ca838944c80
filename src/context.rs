//! Workflow context store
//!
//! Single source of truth for "what is the user looking at right now".
//! Screens push their state in through the [`crate::publisher::ContextPublisher`];
//! the chat transport attaches a [`WorkflowContext`] snapshot to every outgoing
//! request so the assistant backend can reason about the visible screen.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Hierarchical description of the active screen, shared with the backend.
///
/// The hierarchy is workflow > step > view; `data` holds arbitrary
/// screen-supplied facts and `available_actions` the actions the current
/// screen is willing to accept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowContext {
    pub workflow: Option<String>,
    pub current_step: Option<String>,
    pub current_view: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub available_actions: Vec<AvailableAction>,
}

/// An action the current screen advertises as executable.
///
/// `id` is the de-duplication key; `extra` carries whatever metadata the
/// screen wants the backend to see (parameter hints, target names, etc).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableAction {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AvailableAction {
    pub fn new(id: &str, action_type: &str) -> Self {
        Self {
            id: id.to_string(),
            action_type: action_type.to_string(),
            label: None,
            extra: Map::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Cheaply clonable handle to the shared context.
///
/// The mutex makes each mutation atomic, so a cascade reset is never
/// observed half-applied even when the host runs readers and writers on
/// different tasks.
#[derive(Clone, Default)]
pub struct ContextStore {
    inner: Arc<Mutex<WorkflowContext>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active workflow. Everything below it (step, view, data,
    /// actions) describes the old workflow, so it is cleared - even when the
    /// new name equals the old one, which mirrors how screens re-sync on
    /// remount.
    pub fn set_workflow(&self, workflow: Option<String>) {
        let mut ctx = self.inner.lock().unwrap();
        ctx.workflow = workflow;
        ctx.current_step = None;
        ctx.current_view = None;
        ctx.data.clear();
        ctx.available_actions.clear();
    }

    /// Replace the active step, clearing the view, data and actions below it.
    pub fn set_current_step(&self, step: Option<String>) {
        let mut ctx = self.inner.lock().unwrap();
        ctx.current_step = step;
        ctx.current_view = None;
        ctx.data.clear();
        ctx.available_actions.clear();
    }

    /// Replace the active view, clearing the data and actions below it.
    pub fn set_current_view(&self, view: Option<String>) {
        let mut ctx = self.inner.lock().unwrap();
        ctx.current_view = view;
        ctx.data.clear();
        ctx.available_actions.clear();
    }

    /// Shallow-merge screen facts into `data`; unrelated keys are kept.
    pub fn merge_data(&self, partial: Map<String, Value>) {
        let mut ctx = self.inner.lock().unwrap();
        for (key, value) in partial {
            ctx.data.insert(key, value);
        }
    }

    /// Upsert an action by id. Re-registering an id replaces the existing
    /// entry in place, so display order stays stable across re-renders.
    pub fn register_action(&self, action: AvailableAction) {
        let mut ctx = self.inner.lock().unwrap();
        if let Some(slot) = ctx
            .available_actions
            .iter_mut()
            .find(|existing| existing.id == action.id)
        {
            *slot = action;
        } else {
            ctx.available_actions.push(action);
        }
    }

    /// Remove an action by id; absent ids are a no-op.
    pub fn deregister_action(&self, id: &str) {
        let mut ctx = self.inner.lock().unwrap();
        ctx.available_actions.retain(|action| action.id != id);
    }

    /// Empty the action registry. Screens call this right before
    /// re-registering their current set so no stale entry survives.
    pub fn clear_actions(&self) {
        let mut ctx = self.inner.lock().unwrap();
        ctx.available_actions.clear();
    }

    /// Owned snapshot for attaching to an outgoing chat request.
    pub fn snapshot(&self) -> WorkflowContext {
        self.inner.lock().unwrap().clone()
    }
}
