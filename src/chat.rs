//! Chat transport
//!
//! Owns the conversation timeline and runs the request/response exchange with
//! the assistant backend. Transport failures never propagate to the caller:
//! every failure path ends in a user-visible assistant message, and the
//! loading flag is cleared on every path.

use tracing::{debug, error, warn};

use crate::client::{AssistantClient, HistoryEntry};
use crate::context::ContextStore;
use crate::dispatch::{ActionDispatcher, ActionOutcome};
use crate::state::{ChatMessage, ChatRole};

/// Reserved sentinel the connectivity probe sends through the normal chat
/// channel. A user typing this literally triggers the probe path; known
/// limitation inherited from the backend protocol.
pub const CONNECTION_TEST_MESSAGE: &str = "__connection_test__";

pub struct ChatTransport {
    client: AssistantClient,
    context: ContextStore,
    dispatcher: ActionDispatcher,
    messages: Vec<ChatMessage>,
    is_loading: bool,
    connection_error: bool,
}

impl ChatTransport {
    pub fn new(client: AssistantClient, context: ContextStore, dispatcher: ActionDispatcher) -> Self {
        Self {
            client,
            context,
            dispatcher,
            messages: Vec::new(),
            is_loading: false,
            connection_error: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Set after a failed connectivity probe; the host gates input on it
    /// until a retried probe succeeds.
    pub fn connection_error(&self) -> bool {
        self.connection_error
    }

    /// Drop the whole conversation, e.g. when the user switches workflows.
    /// The next successful probe re-seeds the welcome message.
    pub fn clear_conversation(&mut self) {
        self.messages.clear();
        self.is_loading = false;
    }

    /// Send one user message and append the backend's reply.
    ///
    /// Empty input and send-while-sending are silently ignored. The reply is
    /// appended to the timeline before its directive (if any) executes, so
    /// the user always sees the explanation first.
    pub async fn send_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.is_loading {
            debug!("send ignored: a request is already in flight");
            return;
        }

        // History is captured before the new user message so the backend
        // sees it once, as `message`.
        let history = self.history();
        self.messages.push(ChatMessage::user(text));
        self.push_loading_placeholder();
        self.is_loading = true;

        let snapshot = self.context.snapshot();
        let result = self.client.chat(text, &snapshot, &history).await;

        self.remove_loading_placeholder();
        match result {
            Ok(reply) => {
                let directive = reply.action.clone();
                self.messages
                    .push(ChatMessage::assistant(&reply.message).with_action(reply.action));

                // The reply above is committed to the timeline before the
                // directive runs, which fixes the reply/action ordering
                // without any delay.
                if let Some(directive) = directive {
                    if let ActionOutcome::Failed(reason) = self.dispatcher.execute(&directive).await
                    {
                        warn!(reason = reason.as_str(), "action directive failed");
                        self.messages.push(ChatMessage::assistant(&format!(
                            "I couldn't complete that action: {}",
                            reason
                        )));
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "assistant request failed");
                self.messages.push(ChatMessage::assistant(&failure_text(&err)));
            }
        }
        self.is_loading = false;
    }

    /// Probe the backend before the user ever types. A successful probe
    /// seeds a one-time welcome message naming the active workflow, but only
    /// while the timeline is still empty.
    pub async fn check_connection(&mut self) -> bool {
        let snapshot = self.context.snapshot();
        match self
            .client
            .chat(CONNECTION_TEST_MESSAGE, &snapshot, &[])
            .await
        {
            Ok(_) => {
                self.connection_error = false;
                if self.messages.is_empty() {
                    self.messages
                        .push(ChatMessage::assistant(&welcome_text(
                            snapshot.workflow.as_deref(),
                        )));
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "assistant connectivity probe failed");
                self.connection_error = true;
                false
            }
        }
    }

    fn history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .filter(|message| !message.is_loading)
            .map(|message| HistoryEntry {
                role: match message.role {
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "assistant".to_string(),
                },
                content: message.text.clone(),
            })
            .collect()
    }

    fn push_loading_placeholder(&mut self) {
        if !self.messages.iter().any(|message| message.is_loading) {
            self.messages.push(ChatMessage::loading());
        }
    }

    fn remove_loading_placeholder(&mut self) {
        self.messages.retain(|message| !message.is_loading);
    }
}

fn failure_text(error: &anyhow::Error) -> String {
    let connectivity = error
        .downcast_ref::<reqwest::Error>()
        .map(|err| err.is_connect() || err.is_timeout())
        .unwrap_or(false);

    if connectivity {
        "I couldn't reach the assistant service. Please check your connection and try again."
            .to_string()
    } else {
        "Sorry, something went wrong while processing your request. Please try again.".to_string()
    }
}

fn welcome_text(workflow: Option<&str>) -> String {
    match workflow {
        Some(name) => format!(
            "Hi! I'm your workflow assistant. You're currently in the {} workflow. \
             Ask me to navigate, filter, or explain what you're seeing.",
            name
        ),
        None => "Hi! I'm your workflow assistant. Open a workflow and I can help you drive it."
            .to_string(),
    }
}
