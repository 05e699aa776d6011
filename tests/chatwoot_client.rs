//! Chatwoot client against the fake API.

mod common;

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{json, Map};

use common::{start_fake_chatwoot, ACCOUNT_ID, TOKEN};
use intake_bot::config::ChatwootConfig;
use intake_bot::error::PlatformError;
use intake_bot::flow::{ConversationId, ConversationStatus, MenuOption};
use intake_bot::platform::{
    AttributeStore, ChatwootClient, ConversationProvisioning, MessageDelivery, OutgoingMessage,
    StatusControl,
};

fn client(base_url: &str, token: &str) -> ChatwootClient {
    ChatwootClient::new(&ChatwootConfig {
        base_url: base_url.to_string(),
        api_token: SecretString::from(token.to_string()),
        account_id: ACCOUNT_ID.to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn create_returns_new_conversation_id() {
    let fake = start_fake_chatwoot().await;
    let client = client(&fake.base_url, TOKEN);

    let id = client.create_conversation("11", "22", "src-1").await.unwrap();

    assert_eq!(id, ConversationId::from("1001"));
    let request = &fake.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.path,
        format!("/api/v1/accounts/{ACCOUNT_ID}/conversations")
    );
}

#[tokio::test]
async fn missing_custom_attributes_read_as_empty() {
    let fake = start_fake_chatwoot().await;
    let client = client(&fake.base_url, TOKEN);

    let attributes = client
        .get_attributes(&ConversationId::from(77))
        .await
        .unwrap();

    assert!(attributes.is_empty());
}

#[tokio::test]
async fn merge_keeps_existing_keys() {
    let fake = start_fake_chatwoot().await;
    let client = client(&fake.base_url, TOKEN);
    let id = ConversationId::from(77);

    let mut first = Map::new();
    first.insert("customer_name".into(), json!("Alice"));
    client.merge_attributes(&id, first).await.unwrap();
    let mut second = Map::new();
    second.insert("project_name".into(), json!("Shop"));
    let merged = client.merge_attributes(&id, second).await.unwrap();

    assert_eq!(merged.len(), 2);
    assert_eq!(fake.attributes("77"), merged);
}

#[tokio::test]
async fn options_message_uses_input_select() {
    let fake = start_fake_chatwoot().await;
    let client = client(&fake.base_url, TOKEN);
    let id = ConversationId::from(5);

    client
        .send(
            &id,
            &OutgoingMessage::options("Pick one", vec![MenuOption::new("Book a Demo", "book_demo")]),
        )
        .await
        .unwrap();
    client
        .set_status(&id, ConversationStatus::Resolved)
        .await
        .unwrap();

    let messages = fake.messages("5");
    assert_eq!(messages[0]["content_type"], "input_select");
    assert_eq!(
        messages[0]["content_attributes"]["items"][0]["value"],
        "book_demo"
    );
    assert_eq!(
        fake.requests().last().unwrap().body,
        json!({"status": "resolved"})
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let fake = start_fake_chatwoot().await;
    fake.set_fail_messages(true);
    let client = client(&fake.base_url, TOKEN);

    let err = client
        .send(&ConversationId::from(5), &OutgoingMessage::text("hi"))
        .await
        .unwrap_err();

    match err {
        PlatformError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let fake = start_fake_chatwoot().await;
    let client = client(&fake.base_url, "not-the-token");

    let err = client
        .create_conversation("11", "22", "src-1")
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformError::Status { status: 401, .. }));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = client(&format!("http://127.0.0.1:{port}"), TOKEN);

    let err = client
        .set_status(&ConversationId::from(1), ConversationStatus::Open)
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformError::Http { .. }));
}
