//! Integration tests for firecast-messaging

use firecast_messaging::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sender_for(server: &MockServer) -> Sender {
    let config = SenderConfig::new("server-key")
        .unwrap()
        .endpoint(format!("{}/fcm/send", server.uri()))
        .timeout(Duration::from_secs(5));
    Sender::new(config).unwrap()
}

#[tokio::test]
async fn test_condition_message_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .and(header("Authorization", "key=server-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "condition": "'A' in topics && ('B' in topics || 'C' in topics)",
            "priority": "high",
            "notification": {"title": "Hello", "color": "#FFAA00"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message_id": 6_177_433_633_397_011_933_u64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let condition = Condition::new("A")
        .unwrap()
        .open_and("B")
        .unwrap()
        .or("C")
        .unwrap()
        .close_and()
        .unwrap();

    let notification = NotificationPayload::builder()
        .title("Hello")
        .color("#FFAA00")
        .unwrap()
        .build();

    let message = Message::builder()
        .condition(condition)
        .unwrap()
        .priority(Priority::High)
        .target_platform(Platform::Both)
        .notification(notification)
        .unwrap()
        .build()
        .unwrap();

    let response = sender_for(&server).send(&message).await.unwrap();
    assert_eq!(response.message_id.as_deref(), Some("6177433633397011933"));
}

#[tokio::test]
async fn test_multicast_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "multicast_id": 216,
            "success": 2,
            "failure": 1,
            "canonical_ids": 1,
            "results": [
                {"message_id": "1:0408"},
                {"message_id": "1:1516", "registration_id": "token-b-new"},
                {"error": "NotRegistered"}
            ]
        })))
        .mount(&server)
        .await;

    let tokens = vec![
        "token-a".to_string(),
        "token-b".to_string(),
        "token-c".to_string(),
    ];
    let message = Message::builder()
        .registration_ids(tokens.clone())
        .unwrap()
        .data([("score", "5x1")])
        .unwrap()
        .build()
        .unwrap();

    let response = sender_for(&server).send(&message).await.unwrap();
    assert_eq!(response.multicast_id, Some(216));
    assert_eq!(response.success, Some(2));
    assert_eq!(response.failure, Some(1));
    assert_eq!(
        response.canonical_replacements(&tokens),
        vec![("token-b", "token-b-new")]
    );

    let failed = response.failed_tokens(&tokens);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "token-c");
    assert!(failed[0].1.should_remove_device());
}

#[tokio::test]
async fn test_unauthorized_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let message = Message::builder().to("token").build().unwrap();
    let err = sender_for(&server).send(&message).await.unwrap_err();
    assert!(matches!(err, MessagingError::Unauthorized));
}

#[tokio::test]
async fn test_server_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let message = Message::builder().to("token").build().unwrap();
    let err = sender_for(&server).send(&message).await.unwrap_err();
    assert!(matches!(err, MessagingError::ServerError { status: 503 }));
}

#[tokio::test]
async fn test_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let message = Message::builder().to("token").build().unwrap();
    let err = sender_for(&server).send(&message).await.unwrap_err();
    assert!(matches!(err, MessagingError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_single_attempt_per_send() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::builder().to("token").build().unwrap();
    let err = sender_for(&server).send(&message).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let config = SenderConfig::new("server-key")
        .unwrap()
        .endpoint("http://127.0.0.1:1/fcm/send");
    let sender = Sender::new(config).unwrap();

    let message = Message::builder().to("token").build().unwrap();
    let err = sender.send(&message).await.unwrap_err();
    assert!(matches!(err, MessagingError::Transport { ref code, .. } if code == "connect"));
}
