//! Shared harness for the HTTP integration tests.
//!
//! Each test file compiles its own copy of this module, so some helpers look
//! unused from the point of view of a single file.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photo_restorer::config::MODEL_NAME;
use photo_restorer::web::{build_router, AppState};
use photo_restorer::{GeminiClient, Gateway};

pub const BOUNDARY: &str = "photo-restorer-test-boundary";

/// Router wired to a real Gemini client that talks to a mock server.
pub struct TestApp {
    router: axum::Router,
    pub model: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let model = MockServer::start().await;
        let client = GeminiClient::new(model.uri(), "test-key");
        let state = AppState::new(Gateway::new(Arc::new(client)));

        Self {
            router: build_router(state),
            model,
        }
    }

    /// Make the model answer every request with `body`.
    pub async fn model_replies(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{MODEL_NAME}:generateContent")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.model)
            .await;
    }

    pub async fn model_requests(&self) -> usize {
        self.model
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Upload `bytes` as the `image` field of a multipart form.
    pub async fn upload(&self, file_name: &str, content_type: &str, bytes: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post("/api/source")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Poll the view until the in-flight enhancement settles.
    pub async fn settled_view(&self) -> serde_json::Value {
        for _ in 0..200 {
            let view: serde_json::Value = self.get("/api/view").await.json();
            if view["phase"] != "loading" {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("enhancement did not settle");
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// A JPEG-looking payload of `len` bytes.
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"\xFF\xD8\xFF\xE0".to_vec();
    bytes.extend((0..len.saturating_sub(4)).map(|i| (i % 251) as u8));
    bytes
}

pub fn png_bytes() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(b"restored pixel data");
    bytes
}

pub fn image_reply(bytes: &[u8], mime_type: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Here is the restored photo."},
                    {"inlineData": {"mimeType": mime_type, "data": general_purpose::STANDARD.encode(bytes)}}
                ]
            }
        }]
    })
}

pub fn text_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]}
        }]
    })
}
