//! Chat turn endpoint integration tests

use axum::http::{Method, StatusCode};
use chatrelay_llm::{mock::MockOutcome, EMPTY_COMPLETION_PLACEHOLDER};
use serde_json::json;
use uuid::Uuid;

use crate::common::{json_request, parse_body, TestApp};

mod test_send_turn {
    use super::*;

    #[tokio::test]
    async fn test_turn_returns_reply_envelope() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app.chat("s-1", "Hello there").await;

        assert_eq!(status, 200);
        assert_eq!(body["code"], 0);
        assert_eq!(body["msg"], "success");
        let data = &body["data"];
        assert_eq!(data["sessionId"], "s-1");
        assert_eq!(data["role"], "gemini3");
        assert_eq!(data["content"], "Mock response to: Hello there");
        assert!(Uuid::parse_str(data["messageId"].as_str().unwrap()).is_ok());
        assert!(data["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_turn_forwards_raw_text_without_history() {
        let app = TestApp::new().await.unwrap();

        app.chat("s-1", "first").await;
        app.chat("s-1", "second").await;

        assert_eq!(app.llm.recorded_prompts(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_turn_stores_attachment_ids_verbatim() {
        let app = TestApp::new().await.unwrap();
        let body = json!({
            "sessionId": "s-1",
            "message": "look",
            "attachments": ["not-registered", "also-unknown"]
        });

        let response = app
            .send(json_request(Method::POST, "/api/gemini3/chat", Some(body)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let thread = app.repos.messages.list_by_session("s-1").await.unwrap();
        assert_eq!(thread[0].attachments, vec!["not-registered", "also-unknown"]);
    }

    #[tokio::test]
    async fn test_empty_completion_uses_placeholder() {
        let app = TestApp::new().await.unwrap();
        app.llm.set_outcome(MockOutcome::Empty);

        let (status, body) = app.chat("s-1", "Hello").await;

        assert_eq!(status, 200);
        assert_eq!(body["data"]["content"], EMPTY_COMPLETION_PLACEHOLDER);
    }
}

mod test_send_turn_validation {
    use super::*;

    async fn post_raw(app: &TestApp, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .send(json_request(Method::POST, "/api/gemini3/chat", Some(body)))
            .await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    #[tokio::test]
    async fn test_missing_message_returns_400() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = post_raw(&app, json!({"sessionId": "s-1"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_empty_session_id_returns_400() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = post_raw(&app, json!({"sessionId": "", "message": "hi"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_whitespace_message_returns_400_without_side_effects() {
        let app = TestApp::new().await.unwrap();

        let (status, _) = post_raw(&app, json!({"sessionId": "s-1", "message": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.repos.messages.list_by_session("s-1").await.unwrap().is_empty());
        assert!(app.llm.recorded_prompts().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let app = TestApp::new().await.unwrap();
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/gemini3/chat")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["code"], 400);
    }
}

mod test_gateway_failure {
    use super::*;

    #[tokio::test]
    async fn test_failure_returns_generic_500() {
        let app = TestApp::new().await.unwrap();
        app.llm.set_outcome(MockOutcome::Fail);

        let (status, body) = app.chat("s-1", "Hello").await;

        assert_eq!(status, 500);
        assert_eq!(body["code"], 500);
        assert_eq!(body["msg"], "External service error");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_failure_keeps_user_message_and_creates_no_conversation() {
        let app = TestApp::new().await.unwrap();
        app.llm.set_outcome(MockOutcome::Fail);

        app.chat("s-1", "Hello").await;

        let (_, thread) = app.get_json("/api/conversations/s-1/messages").await;
        let messages = thread["data"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Hello");

        let (_, listing) = app.get_json("/api/conversations").await;
        assert_eq!(listing["data"]["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn test_recovered_gateway_completes_next_turn() {
        let app = TestApp::new().await.unwrap();
        app.llm.set_outcome(MockOutcome::Fail);
        app.chat("s-1", "first").await;

        app.llm.set_outcome(MockOutcome::Reply);
        let (status, _) = app.chat("s-1", "second").await;

        assert_eq!(status, 200);
        let (_, thread) = app.get_json("/api/conversations/s-1/messages").await;
        assert_eq!(thread["data"].as_array().unwrap().len(), 3);
    }
}
