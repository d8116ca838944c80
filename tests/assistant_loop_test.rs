//! End-to-end exercise of the context -> chat -> dispatch loop: a screen
//! publishes its state, the user asks for a view change, the backend answers
//! with a directive, and the screen reacts to the resulting signal by
//! republishing updated context.

use serde_json::json;

use labflow_assistant::{
    ActionDispatcher, AssistantClient, AvailableAction, ChatRole, ChatTransport, ContextPublisher,
    ContextStore, ScreenState, SignalBus, UiSignal,
};

fn grid_screen(view: &str) -> ScreenState {
    // The advertised action carries the view it would leave, so the action
    // list differs between renders and gets re-registered after the cascade.
    let mut change_view = AvailableAction::new("change-view", "CHANGE_VIEW")
        .with_label("Switch result view");
    change_view
        .extra
        .insert("currentView".to_string(), json!(view));

    ScreenState {
        workflow: Some("lead-identification".to_string()),
        current_step: Some("screening".to_string()),
        current_view: Some(view.to_string()),
        available_actions: vec![change_view],
        ..ScreenState::default()
    }
}

#[tokio::test]
async fn test_full_loop_from_publish_to_republished_context() {
    let mut server = mockito::Server::new_async().await;

    // The backend should see the published context on the request.
    let chat_mock = server
        .mock("POST", "/assistant/chat")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"context": {"workflow": "lead-identification", "currentView": "grid"}}"#
                .to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{
                "message": "Switching to the similarity view.",
                "action": {"type": "CHANGE_VIEW", "payload": {"view": "similarity"}}
            }"#,
        )
        .create_async()
        .await;

    let store = ContextStore::new();
    let bus = SignalBus::default();
    let dispatcher = ActionDispatcher::new(bus.clone(), AssistantClient::new(&server.url()));
    let mut transport =
        ChatTransport::new(AssistantClient::new(&server.url()), store.clone(), dispatcher);

    // Screen mounts and publishes what it shows.
    let mut publisher = ContextPublisher::new(store.clone());
    publisher.publish(&grid_screen("grid"));
    let mut rx = bus.subscribe();

    transport.send_message("switch to the similarity view").await;

    chat_mock.assert_async().await;
    let messages = transport.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[1].text, "Switching to the similarity view.");

    // The screen receives the signal and re-renders with the new view.
    let signal = rx.recv().await.unwrap();
    assert_eq!(
        signal,
        UiSignal::ChangeView {
            view: "similarity".to_string()
        }
    );
    let UiSignal::ChangeView { view } = signal else {
        unreachable!()
    };
    publisher.publish(&grid_screen(&view));

    // The store now reflects the post-action screen, closing the loop.
    let ctx = store.snapshot();
    assert_eq!(ctx.workflow.as_deref(), Some("lead-identification"));
    assert_eq!(ctx.current_view.as_deref(), Some("similarity"));
    assert_eq!(ctx.available_actions.len(), 1);
}

#[tokio::test]
async fn test_screen_data_reaches_the_backend_request() {
    let mut server = mockito::Server::new_async().await;
    let chat_mock = server
        .mock("POST", "/assistant/chat")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"context": {"data": {"visibleCompounds": 128}}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"message": "You are looking at 128 compounds."}"#)
        .create_async()
        .await;

    let store = ContextStore::new();
    let bus = SignalBus::default();
    let dispatcher = ActionDispatcher::new(bus.clone(), AssistantClient::new(&server.url()));
    let mut transport =
        ChatTransport::new(AssistantClient::new(&server.url()), store.clone(), dispatcher);

    let mut state = grid_screen("grid");
    state
        .data
        .insert("visibleCompounds".to_string(), json!(128));
    ContextPublisher::new(store.clone()).publish(&state);

    transport.send_message("how many compounds am I seeing?").await;
    chat_mock.assert_async().await;
    assert_eq!(transport.messages().len(), 2);
}
