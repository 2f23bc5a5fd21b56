//! Mock Gemini backend for integration tests
//!
//! Serves `POST /v1beta/models/{model}:generateContent` with a canned reply
//! and records what it was sent.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Text part followed by an image part
    TextAndImage { text: String, image: String },
    /// Only an image part
    ImageOnly { image: String },
    /// Only a text part, as when the model declines
    TextOnly { text: String },
    /// A candidate with no parts
    Empty,
    /// Gemini-style error envelope with the given status
    Error { status: u16, message: String },
}

/// A request the mock received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path segment after `models/`, e.g. `gemini-2.0-flash:generateContent`
    pub model_call: String,
    pub api_key: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// Parts of the single user turn
    pub fn parts(&self) -> &[Value] {
        self.body["contents"][0]["parts"].as_array().map_or(&[][..], Vec::as_slice)
    }

    /// Text of every text part, in order
    pub fn texts(&self) -> Vec<&str> {
        self.parts().iter().filter_map(|part| part["text"].as_str()).collect()
    }

    /// Data of every inline image part, in order
    pub fn images(&self) -> Vec<&str> {
        self.parts()
            .iter()
            .filter_map(|part| part["inlineData"]["data"].as_str())
            .collect()
    }
}

/// Mock Gemini backend
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

struct MockGeminiState {
    request_count: AtomicU32,
    reply: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockGemini {
    /// Start a mock that answers `{text: "done", image: "QUJD"}`
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockReply::TextAndImage {
            text: "done".to_owned(),
            image: "QUJD".to_owned(),
        })
        .await
    }

    pub async fn start_with(reply: MockReply) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            request_count: AtomicU32::new(0),
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1beta/models/{model_call}", routing::post(handle_generate_content))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a provider
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of `generateContent` calls received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// The most recent request
    pub fn last_request(&self) -> RecordedRequest {
        self.state
            .requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("mock received no requests")
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate_content(
    State(state): State<Arc<MockGeminiState>>,
    Path(model_call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    state.requests.lock().unwrap().push(RecordedRequest {
        model_call,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned),
        body,
    });

    let parts = match &state.reply {
        MockReply::TextAndImage { text, image } => vec![json!({"text": text}), inline(image)],
        MockReply::ImageOnly { image } => vec![inline(image)],
        MockReply::TextOnly { text } => vec![json!({"text": text})],
        MockReply::Empty => Vec::new(),
        MockReply::Error { status, message } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({
                "error": {
                    "code": status.as_u16(),
                    "message": message,
                    "status": "RESOURCE_EXHAUSTED"
                }
            });
            return (status, Json(body)).into_response();
        }
    };

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

fn inline(image: &str) -> Value {
    json!({"inlineData": {"mimeType": "image/png", "data": image}})
}
