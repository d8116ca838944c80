//! Action dispatcher
//!
//! Validates a directive returned by the assistant backend and applies it to
//! the UI through the signal bus. The dispatcher holds no screen state of its
//! own: every effect except `EXECUTE_API_CALL` is a broadcast that interested
//! screens pick up. Failures never escape this module; they come back as an
//! [`ActionOutcome::Failed`] for the transport to surface in the timeline.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::AssistantClient;
use crate::signals::{SignalBus, UiSignal};

/// A structured command returned by the backend alongside a chat reply.
///
/// `action_type` is optional so a malformed directive still deserializes and
/// gets rejected here, at the trust boundary, instead of poisoning the whole
/// chat reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDirective {
    #[serde(rename = "type", default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

/// Result of executing one directive.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action ran; the value echoes what was applied, e.g.
    /// `{"success": true, "view": "grid"}`.
    Completed(Value),
    /// The action was understood but could not be applied; the text is
    /// shown to the user.
    Failed(String),
    /// Unknown action type: logged and dropped as a forward-compatible no-op.
    Ignored,
}

pub struct ActionDispatcher {
    bus: SignalBus,
    client: AssistantClient,
}

impl ActionDispatcher {
    pub fn new(bus: SignalBus, client: AssistantClient) -> Self {
        Self { bus, client }
    }

    /// Execute one directive. Every non-HTTP action type emits exactly one
    /// signal; `EXECUTE_API_CALL` performs the request itself.
    pub async fn execute(&self, directive: &ActionDirective) -> ActionOutcome {
        let Some(action_type) = directive.action_type.as_deref() else {
            return ActionOutcome::Failed("the action directive has no type".to_string());
        };

        let payload = &directive.payload;
        debug!(action_type, "executing action directive");

        match action_type {
            "NAVIGATE_STEP" => {
                let step = match require_str(payload, "step") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                self.bus.emit(UiSignal::AdvanceStep { step: step.clone() });
                ActionOutcome::Completed(json!({"success": true, "step": step}))
            }
            "CHANGE_VIEW" => {
                let view = match require_str(payload, "view") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                self.bus.emit(UiSignal::ChangeView { view: view.clone() });
                ActionOutcome::Completed(json!({"success": true, "view": view}))
            }
            "EXECUTE_FILTER" => {
                let filter_type = match require_str(payload, "filterType") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                let filter_value = payload.get("filterValue").cloned().unwrap_or(Value::Null);
                self.bus.emit(UiSignal::ApplyFilter {
                    filter_type: filter_type.clone(),
                    filter_value: filter_value.clone(),
                });
                ActionOutcome::Completed(json!({
                    "success": true,
                    "filterType": filter_type,
                    "filterValue": filter_value,
                }))
            }
            "EXECUTE_SORT" => {
                let sort_field = match require_str(payload, "sortField") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                let sort_direction = payload
                    .get("sortDirection")
                    .and_then(Value::as_str)
                    .unwrap_or("asc")
                    .to_string();
                self.bus.emit(UiSignal::ApplySort {
                    sort_field: sort_field.clone(),
                    sort_direction: sort_direction.clone(),
                });
                ActionOutcome::Completed(json!({
                    "success": true,
                    "sortField": sort_field,
                    "sortDirection": sort_direction,
                }))
            }
            "EXECUTE_SEARCH" => {
                let query = match require_str(payload, "searchQuery") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                self.bus.emit(UiSignal::RunSearch {
                    query: query.clone(),
                });
                ActionOutcome::Completed(json!({"success": true, "searchQuery": query}))
            }
            "EXECUTE_API_CALL" => self.execute_api_call(payload).await,
            "SELECT_ITEM" => {
                let item_id = match require_str(payload, "itemId") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                let item_type = payload
                    .get("itemType")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                self.bus.emit(UiSignal::SelectItem {
                    item_id: item_id.clone(),
                    item_type: item_type.clone(),
                });
                ActionOutcome::Completed(json!({
                    "success": true,
                    "itemId": item_id,
                    "itemType": item_type,
                }))
            }
            "SUBMIT_FORM" => {
                let form_id = match require_str(payload, "formId") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                let form_data = payload.get("formData").cloned().unwrap_or(Value::Null);
                self.bus.emit(UiSignal::SubmitForm {
                    form_id: form_id.clone(),
                    form_data,
                });
                ActionOutcome::Completed(json!({"success": true, "formId": form_id}))
            }
            "RESET_STATE" => {
                let state_type = match require_str(payload, "stateType") {
                    Ok(value) => value,
                    Err(reason) => return ActionOutcome::Failed(reason),
                };
                self.bus.emit(UiSignal::ResetState {
                    state_type: state_type.clone(),
                });
                ActionOutcome::Completed(json!({"success": true, "stateType": state_type}))
            }
            other => {
                warn!(action_type = other, "dropping unknown action type");
                ActionOutcome::Ignored
            }
        }
    }

    async fn execute_api_call(&self, payload: &Value) -> ActionOutcome {
        let endpoint = match require_str(payload, "endpoint") {
            Ok(value) => value,
            Err(reason) => return ActionOutcome::Failed(reason),
        };
        let method = payload.get("method").and_then(Value::as_str);
        let data = payload.get("data").filter(|value| !value.is_null());

        match self.client.call(&endpoint, method, data).await {
            Ok(body) => ActionOutcome::Completed(json!({"success": true, "data": body})),
            Err(error) => {
                warn!(endpoint = endpoint.as_str(), error = %error, "API call action failed");
                ActionOutcome::Failed(error.to_string())
            }
        }
    }
}

fn require_str(payload: &Value, field: &str) -> Result<String, String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("the action payload is missing '{}'", field))
}
