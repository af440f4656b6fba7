//! Message endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{authed_request, create_test_jwt, parse_body, TestApp};

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_post_message_returns_201_unread() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let jwt = create_test_jwt(&user1, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::POST,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        Some(json!({"text": "Test message"})),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = parse_body(resp).await;
    assert_eq!(body["text"], "Test message");
    assert_eq!(body["is_read"], false);
    assert_eq!(body["sender"]["id"], user1.id.to_string());

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_post_message_not_participant_returns_403_no_state_change() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let user3 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let jwt = create_test_jwt(&user3, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::POST,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        Some(json!({"text": "should not land"})),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.message_count(thread.id).await.unwrap(), 0);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_post_empty_text_returns_400() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let jwt = create_test_jwt(&user1, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::POST,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        Some(json!({"text": ""})),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_list_messages_oldest_first() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    app.create_test_message(&thread, &user1, "first")
        .await
        .unwrap();
    app.create_test_message(&thread, &user2, "second")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user1, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::GET,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    let texts: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_list_messages_not_participant_returns_403() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let user3 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let jwt = create_test_jwt(&user3, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::GET,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_mark_message_read_by_recipient() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let message = app
        .create_test_message(&thread, &user1, "Test message")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user2, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages/{}", thread.id, message.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(app.message_is_read(message.id).await.unwrap());

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_mark_own_message_read_returns_403() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let message = app
        .create_test_message(&thread, &user1, "Test message")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user1, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages/{}", thread.id, message.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!app.message_is_read(message.id).await.unwrap());

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_mark_message_wrong_thread_returns_404() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let user3 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let other_thread = app.create_test_thread(&user1, &user3).await.unwrap();
    let message = app
        .create_test_message(&thread, &user1, "Test message")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user2, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages/{}", other_thread.id, message.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!app.message_is_read(message.id).await.unwrap());

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_mark_read_is_idempotent() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let message = app
        .create_test_message(&thread, &user1, "Test message")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user2, &app.config.jwt_secret).unwrap();

    for _ in 0..2 {
        let req = authed_request(
            Method::PATCH,
            &format!("/v1/threads/{}/messages/{}", thread.id, message.id),
            &jwt,
            None,
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    assert!(app.message_is_read(message.id).await.unwrap());

    // Re-marking an already-read set affects zero rows
    let marked = app
        .state
        .repos
        .messages
        .mark_read(user2.id, &[message.id])
        .await
        .unwrap();
    assert_eq!(marked, 0);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_mark_all_read_marks_only_eligible_messages() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let from_u1 = app
        .create_test_message(&thread, &user1, "from u1")
        .await
        .unwrap();
    let from_u2 = app
        .create_test_message(&thread, &user2, "from u2")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user2, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Only the message user2 received is marked; their own stays unread
    assert!(app.message_is_read(from_u1.id).await.unwrap());
    assert!(!app.message_is_read(from_u2.id).await.unwrap());

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_mark_all_read_not_participant_returns_403() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let user3 = app.create_test_user(false).await.unwrap();
    let thread = app.create_test_thread(&user1, &user2).await.unwrap();
    let message = app
        .create_test_message(&thread, &user1, "Test message")
        .await
        .unwrap();
    let jwt = create_test_jwt(&user3, &app.config.jwt_secret).unwrap();

    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages", thread.id),
        &jwt,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!app.message_is_read(message.id).await.unwrap());

    app.cleanup().await.unwrap();
}

/// The end-to-end scenario: create thread, post, read, count.
#[tokio::test]
#[serial]
#[ignore] // Requires a live Postgres (TEST_DATABASE_URL) - run with --ignored
async fn test_full_messaging_scenario() {
    let app = TestApp::new().await.unwrap();
    app.cleanup().await.unwrap();

    let user1 = app.create_test_user(false).await.unwrap();
    let user2 = app.create_test_user(false).await.unwrap();
    let jwt1 = create_test_jwt(&user1, &app.config.jwt_secret).unwrap();
    let jwt2 = create_test_jwt(&user2, &app.config.jwt_secret).unwrap();

    // U1 opens a thread with U2
    let req = authed_request(
        Method::POST,
        "/v1/threads",
        &jwt1,
        Some(json!({"participant_id": user2.id})),
    );
    let body = parse_body(app.test_router().oneshot(req).await.unwrap()).await;
    let thread_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(body["participants"].as_array().unwrap().len(), 2);

    // U1 posts a message
    let req = authed_request(
        Method::POST,
        &format!("/v1/threads/{}/messages", thread_id),
        &jwt1,
        Some(json!({"text": "Test message"})),
    );
    let body = parse_body(app.test_router().oneshot(req).await.unwrap()).await;
    let message_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    // The thread now has exactly one unread message for U2
    let req = authed_request(
        Method::GET,
        &format!("/v1/threads/{}/messages", thread_id),
        &jwt2,
        None,
    );
    let body = parse_body(app.test_router().oneshot(req).await.unwrap()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["is_read"], false);

    let req = authed_request(
        Method::GET,
        &format!("/v1/users/{}/unread-messages-count", user2.id),
        &jwt2,
        None,
    );
    let body = parse_body(app.test_router().oneshot(req).await.unwrap()).await;
    assert_eq!(body["count"], 1);

    // U2 marks it read, dropping the unread count to zero
    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages/{}", thread_id, message_id),
        &jwt2,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(app.message_is_read(message_id).await.unwrap());

    let req = authed_request(
        Method::GET,
        &format!("/v1/users/{}/unread-messages-count", user2.id),
        &jwt2,
        None,
    );
    let body = parse_body(app.test_router().oneshot(req).await.unwrap()).await;
    assert_eq!(body["count"], 0);

    // U1 cannot mark their own message as read
    let req = authed_request(
        Method::PATCH,
        &format!("/v1/threads/{}/messages/{}", thread_id, message_id),
        &jwt1,
        None,
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    app.cleanup().await.unwrap();
}
