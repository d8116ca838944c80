//! UI-agnostic chat timeline types
//!
//! These are the data structures shared between whichever host renders the
//! conversation (desktop shell, web view, tests) and the transport that owns
//! the timeline. They do not depend on any UI framework.

use serde::{Deserialize, Serialize};

use crate::dispatch::ActionDirective;

/// A single entry in the conversation timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Transient "assistant is thinking" placeholder. At most one message
    /// in the timeline has this set at any time.
    #[serde(default)]
    pub is_loading: bool,
    /// Present only on assistant messages that carried an action directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDirective>,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self {
            role: ChatRole::User,
            text: text.to_string(),
            is_loading: false,
            action: None,
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.to_string(),
            is_loading: false,
            action: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            role: ChatRole::Assistant,
            text: String::new(),
            is_loading: true,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Option<ActionDirective>) -> Self {
        self.action = action;
        self
    }
}
