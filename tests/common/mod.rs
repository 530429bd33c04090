#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use technexus_server::config::Config;
use technexus_server::llm::{LlmClient, LlmError};
use technexus_server::models::Event;
use technexus_server::routes::create_routes;
use technexus_server::state::AppState;
use technexus_server::store::{EventStore, MemoryEventStore, StoreError};

pub fn event(name: &str, description: &str, month: u32) -> Event {
    Event {
        name: name.to_string(),
        start_date: Utc.with_ymd_and_hms(2024, month, 10, 9, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, month, 12, 18, 0, 0).unwrap(),
        location: format!("{} Hall", name),
        description: description.to_string(),
        registration_link: format!("https://events.test/{}", month),
    }
}

pub fn sample_events() -> Vec<Event> {
    vec![
        event("PyCon 2024", "python conference", 5),
        event("DevSummit", "cloud tools", 9),
    ]
}

pub fn memory_store(events: &[Event]) -> Arc<dyn EventStore> {
    Arc::new(MemoryEventStore::from_events(events).unwrap())
}

/// A store whose backend is never reachable.
pub struct UnreachableStore;

#[async_trait]
impl EventStore for UnreachableStore {
    async fn fetch_all(&self) -> Result<Vec<Event>, StoreError> {
        Err(StoreError::StorageUnavailable(sqlx::Error::PoolTimedOut))
    }

    async fn search(&self, _keyword: &str) -> Result<Vec<Event>, StoreError> {
        Err(StoreError::StorageUnavailable(sqlx::Error::PoolTimedOut))
    }
}

/// Replays a canned answer and remembers every prompt it was given.
pub struct RecordingLlm {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingLlm {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for RecordingLlm {
    fn model(&self) -> &str {
        "recording-test-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(LlmError::CallFailed)
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new(store: Arc<dyn EventStore>, llm: Option<Arc<dyn LlmClient>>) -> Self {
        let state = AppState::new(store, llm);
        Self {
            router: create_routes(state, &Config::default()),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Fetches a non-JSON resource such as the index page or a static asset.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if body_bytes.is_empty() {
            json!(null)
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
            })
        };

        (status, body)
    }
}
