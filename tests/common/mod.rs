//! Shared test infrastructure: a scripted OpenAI-compatible stub server.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Fenced completion containing a single option named "A".
pub const FENCED_COMPLETION: &str =
    "```json\n{\"options\":[{\"name\":\"A\",\"pros\":[],\"cons\":[],\"scores\":{}}]}\n```";

/// One scripted reply from the stub.
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: u16,
    pub body: String,
}

impl StubReply {
    /// A successful chat completion carrying `content`.
    pub fn completion(content: &str) -> Self {
        Self {
            status: 200,
            body: json!({
                "model": "gpt-4o-mini",
                "choices": [{ "message": { "role": "assistant", "content": content } }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 8 }
            })
            .to_string(),
        }
    }

    /// A non-success status with an error body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({ "error": { "message": format!("stub status {}", status) } }).to_string(),
        }
    }

    /// A success status with an arbitrary body.
    pub fn raw(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct StubInner {
    script: Vec<StubReply>,
    calls: usize,
    bodies: Vec<Value>,
    authorization: Vec<String>,
}

/// Handle to a running stub server.
#[derive(Debug, Clone)]
pub struct StubServer {
    pub addr: SocketAddr,
    inner: Arc<Mutex<StubInner>>,
}

impl StubServer {
    /// Starts a stub on an ephemeral port. Replies follow `script` in order;
    /// once exhausted, the last reply repeats.
    pub async fn start(script: Vec<StubReply>) -> Self {
        let inner = Arc::new(Mutex::new(StubInner {
            script,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/v1/models", get(models))
            .with_state(inner.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, inner }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    pub fn last_body(&self) -> Option<Value> {
        self.inner.lock().unwrap().bodies.last().cloned()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.inner.lock().unwrap().authorization.last().cloned()
    }
}

async fn chat_completions(
    State(inner): State<Arc<Mutex<StubInner>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let reply = {
        let mut inner = inner.lock().unwrap();
        let index = inner.calls.min(inner.script.len().saturating_sub(1));
        inner.calls += 1;
        inner.bodies.push(body);
        if let Some(auth) = headers.get(header::AUTHORIZATION) {
            inner
                .authorization
                .push(auth.to_str().unwrap_or_default().to_string());
        }
        inner
            .script
            .get(index)
            .cloned()
            .unwrap_or_else(|| StubReply::status(500))
    };

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

async fn models() -> Json<Value> {
    Json(json!({ "data": [{ "id": "gpt-4o-mini" }] }))
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
