//! Upload and attachment lookup integration tests

use axum::http::{Method, StatusCode};
use chatrelay_attachments::{AttachmentStore, MAX_FILE_SIZE_BYTES};
use uuid::Uuid;

use crate::common::{
    body_bytes, json_request, multipart_request, parse_body, Part, TestApp, BASE_URL,
};

fn file_part<'a>(file_name: &'a str, content_type: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "file",
        file_name,
        content_type,
        bytes,
    }
}

fn stored_files(app: &TestApp) -> usize {
    std::fs::read_dir(app.upload_dir()).unwrap().count()
}

mod test_upload {
    use super::*;

    #[tokio::test]
    async fn test_upload_returns_attachment() {
        let app = TestApp::new().await.unwrap();
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

        let response = app
            .send(multipart_request(
                "/api/upload",
                &[file_part("diagram.png", "image/png", &png)],
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_body(response).await;
        assert_eq!(body["code"], 0);
        let data = &body["data"];
        assert_eq!(data["fileName"], "diagram.png");
        assert_eq!(data["fileType"], "image/png");
        assert_eq!(data["fileSize"], 8);
        assert!(Uuid::parse_str(data["fileId"].as_str().unwrap()).is_ok());

        let url = data["url"].as_str().unwrap();
        assert!(url.starts_with(&format!("{BASE_URL}/uploads/")));
        assert!(url.ends_with(".png"));
        assert_eq!(stored_files(&app), 1);
        assert_eq!(app.attachments.len(), 1);
    }

    #[tokio::test]
    async fn test_uploaded_file_is_served() {
        let app = TestApp::new().await.unwrap();
        let response = app
            .send(multipart_request(
                "/api/upload",
                &[file_part("notes.txt", "text/plain", b"hello world")],
            ))
            .await;
        let url = parse_body(response).await["data"]["url"]
            .as_str()
            .unwrap()
            .to_string();
        let path = url.trim_start_matches(BASE_URL);

        let served = app.send(json_request(Method::GET, path, None)).await;

        assert_eq!(served.status(), StatusCode::OK);
        assert_eq!(body_bytes(served).await, b"hello world");
    }

    #[tokio::test]
    async fn test_session_id_field_is_recorded() {
        let app = TestApp::new().await.unwrap();

        let response = app
            .send(multipart_request(
                "/api/upload",
                &[
                    Part::Text {
                        name: "sessionId",
                        value: "s-42",
                    },
                    file_part("notes.md", "text/markdown", b"# notes"),
                ],
            ))
            .await;
        let body = parse_body(response).await;
        let id = Uuid::parse_str(body["data"]["fileId"].as_str().unwrap()).unwrap();

        let record = app.attachments.find(id).await.unwrap().unwrap();
        assert_eq!(record.session_id.as_deref(), Some("s-42"));
        assert!(record.message_id.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_type_returns_415_and_stores_nothing() {
        let app = TestApp::new().await.unwrap();

        let response = app
            .send(multipart_request(
                "/api/upload",
                &[file_part("run.sh", "application/x-sh", b"#!/bin/sh")],
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = parse_body(response).await;
        assert_eq!(body["code"], 415);
        assert!(body["data"].is_null());
        assert!(app.attachments.is_empty());
        assert_eq!(stored_files(&app), 0);
    }

    #[tokio::test]
    async fn test_oversize_file_returns_413() {
        let app = TestApp::new().await.unwrap();
        let bytes = vec![b'a'; (MAX_FILE_SIZE_BYTES + 1) as usize];

        let response = app
            .send(multipart_request(
                "/api/upload",
                &[file_part("big.txt", "text/plain", &bytes)],
            ))
            .await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(parse_body(response).await["code"], 413);
        assert!(app.attachments.is_empty());
        assert_eq!(stored_files(&app), 0);
    }

    #[tokio::test]
    async fn test_non_multipart_body_returns_400_envelope() {
        let app = TestApp::new().await.unwrap();
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.send(request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["code"], 400);
        assert!(body["data"].is_null());
        assert!(app.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_returns_400() {
        let app = TestApp::new().await.unwrap();

        let response = app
            .send(multipart_request(
                "/api/upload",
                &[Part::Text {
                    name: "sessionId",
                    value: "s-1",
                }],
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["msg"], "No file uploaded");
    }
}

mod test_get_attachment {
    use super::*;

    #[tokio::test]
    async fn test_orphan_attachment_is_retrievable() {
        let app = TestApp::new().await.unwrap();
        let response = app
            .send(multipart_request(
                "/api/upload",
                &[file_part("report.pdf", "application/pdf", b"%PDF-1.7")],
            ))
            .await;
        let uploaded = parse_body(response).await["data"].clone();

        let (status, body) = app
            .get_json(&format!(
                "/api/attachments/{}",
                uploaded["fileId"].as_str().unwrap()
            ))
            .await;

        assert_eq!(status, 200);
        assert_eq!(body["data"], uploaded);
    }

    #[tokio::test]
    async fn test_unknown_attachment_returns_404() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app
            .get_json(&format!("/api/attachments/{}", Uuid::new_v4()))
            .await;

        assert_eq!(status, 404);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_malformed_id_returns_404() {
        let app = TestApp::new().await.unwrap();

        let (status, _) = app.get_json("/api/attachments/not-a-uuid").await;

        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_invalid_utf8_id_returns_400_envelope() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app.get_json("/api/attachments/%FF").await;

        assert_eq!(status, 400);
        assert_eq!(body["code"], 400);
    }
}

mod test_health {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new().await.unwrap();

        let response = app.send(json_request(Method::GET, "/health", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }
}
