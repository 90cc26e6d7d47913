//! Test helpers: a scripted sensor endpoint and a recording log.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use jsonwx::EventLog;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fixture endpoint answers on a given hit.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    /// Non-2xx status carrying a JSON error document
    StatusJson(u16, Value),
    Text(&'static str),
    /// Sleep before answering, to trip the client timeout
    Delayed(Duration, Value),
}

struct Script {
    replies: Vec<Reply>,
    hits: Arc<AtomicUsize>,
}

/// A running fixture endpoint.
pub struct SensorEndpoint {
    pub url: String,
    hits: Arc<AtomicUsize>,
    _handle: tokio::task::JoinHandle<()>,
}

impl SensorEndpoint {
    /// Serve `replies` in order on `/get-sensors`; the last one repeats.
    pub async fn start(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "script needs at least one reply");
        let hits = Arc::new(AtomicUsize::new(0));
        let script = Arc::new(Script {
            replies,
            hits: hits.clone(),
        });

        let app = Router::new()
            .route("/get-sensors", get(serve_reply))
            .with_state(script);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/get-sensors"),
            hits,
            _handle: handle,
        }
    }

    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn serve_reply(State(script): State<Arc<Script>>) -> Response {
    let hit = script.hits.fetch_add(1, Ordering::SeqCst);
    let reply = script.replies[hit.min(script.replies.len() - 1)].clone();
    match reply {
        Reply::Json(body) => Json(body).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        Reply::StatusJson(code, body) => {
            (StatusCode::from_u16(code).unwrap(), Json(body)).into_response()
        }
        Reply::Text(body) => body.into_response(),
        Reply::Delayed(delay, body) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
    }
}

/// Windmeter payload in the endpoint's shape.
pub fn windmeter(dir: &str, ws: f64, gu: f64, te: f64) -> Value {
    json!({
        "preset": 0,
        "response": {
            "windmeters": [
                {"id": 0, "name": "Wind", "dir": dir, "ws": ws, "gu": gu, "te": te, "wc": 17.0}
            ],
            "thermometers": [],
            "rainmeters": []
        }
    })
}

/// Captures `(level, message)` pairs for assertions.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn at(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: &'static str, msg: &str) {
        self.entries.lock().unwrap().push((level, msg.to_string()));
    }
}

impl EventLog for RecordingLog {
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }

    fn info(&self, msg: &str) {
        self.push("info", msg);
    }

    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
}
