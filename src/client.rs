//! HTTP wire layer for the assistant backend

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::WorkflowContext;
use crate::dispatch::ActionDirective;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    context: &'a WorkflowContext,
    chat_history: &'a [HistoryEntry],
}

/// A prior timeline entry replayed to the backend for conversational context.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// What the backend returns: a textual reply, optionally carrying a
/// directive to execute against the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub action: Option<ActionDirective>,
}

#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One chat exchange: message plus context snapshot out, reply in.
    pub async fn chat(
        &self,
        message: &str,
        context: &WorkflowContext,
        history: &[HistoryEntry],
    ) -> Result<ChatReply> {
        let url = format!("{}/assistant/chat", self.base_url);

        let request = ChatRequest {
            message,
            context,
            chat_history: history,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Assistant request failed with status: {}",
                response.status()
            ));
        }

        let reply: ChatReply = response.json().await?;
        Ok(reply)
    }

    /// Generic JSON request used by the EXECUTE_API_CALL action. Relative
    /// endpoints resolve against the backend base URL; the method defaults
    /// to GET and `data` is JSON-encoded when present.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Option<&str>,
        data: Option<&Value>,
    ) -> Result<Value> {
        let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        };

        let method_name = method.unwrap_or("GET").to_uppercase();
        let method = reqwest::Method::from_bytes(method_name.as_bytes())
            .map_err(|_| anyhow!("Unsupported HTTP method: {}", method_name))?;

        let mut request = self.client.request(method, &url);
        if let Some(body) = data {
            request = request.json(body);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "API call failed with status: {}",
                response.status()
            ));
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        // Some endpoints answer with plain text; keep it instead of failing.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
