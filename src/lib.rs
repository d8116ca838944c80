pub mod chat;
pub mod client;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod publisher;
pub mod signals;
pub mod state;

// Re-export main types for convenience
pub use chat::{ChatTransport, CONNECTION_TEST_MESSAGE};
pub use client::{AssistantClient, ChatReply, HistoryEntry};
pub use config::AssistantConfig;
pub use context::{AvailableAction, ContextStore, WorkflowContext};
pub use dispatch::{ActionDirective, ActionDispatcher, ActionOutcome};
pub use publisher::{ContextPublisher, ScreenState};
pub use signals::{SignalBus, UiSignal};
pub use state::{ChatMessage, ChatRole};
