//! In-process fake of the `/recommendations` backend.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::{RwLock, Semaphore};

use recommendations_admin::models::{Recommendation, RecommendationId};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub request_id: Option<String>,
}

#[derive(Default)]
pub struct FakeState {
    pub records: Vec<Recommendation>,
    pub requests: Vec<RecordedRequest>,
    pub fail_list: bool,
    pub fail_mutations: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub state: Arc<RwLock<FakeState>>,
    /// When set, approve and delete wait for a permit before answering
    gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    pub fn new(records: Vec<Recommendation>) -> Self {
        Self {
            state: Arc::new(RwLock::new(FakeState {
                records,
                ..FakeState::default()
            })),
            gate: None,
        }
    }

    /// Mutations block until a permit is added to the returned semaphore
    pub fn gated(records: Vec<Recommendation>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut backend = Self::new(records);
        backend.gate = Some(gate.clone());
        (backend, gate)
    }

    pub async fn count_requests(&self, method: &str) -> usize {
        self.state
            .read()
            .await
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    async fn record(&self, method: &'static str, path: String, headers: &HeaderMap) {
        let request_id = headers
            .get("x-request-id")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        self.state.write().await.requests.push(RecordedRequest {
            method,
            path,
            request_id,
        });
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

pub fn recommendation(id: &str, approved: Option<bool>) -> Recommendation {
    Recommendation {
        id: RecommendationId::new(id),
        full_name: format!("Person {}", id),
        profession: "Architect".to_string(),
        recommendation: format!("Recommendation number {}.", id),
        approved,
        stars: Some(4.0),
        image: None,
    }
}

async fn list_recommendations(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    backend
        .record("GET", "/recommendations".to_string(), &headers)
        .await;

    let state = backend.state.read().await;
    if state.fail_list {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({ "data": state.records })))
}

async fn approve_recommendation(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    backend
        .record("PATCH", format!("/recommendations/{}/approve", id), &headers)
        .await;
    backend.wait_for_gate().await;

    let mut state = backend.state.write().await;
    if state.fail_mutations {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match state.records.iter_mut().find(|r| r.id.as_str() == id) {
        Some(record) => {
            record.approved = Some(true);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_recommendation(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    backend
        .record("DELETE", format!("/recommendations/{}/delete", id), &headers)
        .await;
    backend.wait_for_gate().await;

    let mut state = backend.state.write().await;
    if state.fail_mutations {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = state.records.len();
    state.records.retain(|r| r.id.as_str() != id);
    if state.records.len() < before {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

pub fn create_router(backend: FakeBackend) -> Router {
    let recommendations = Router::new()
        .route("/recommendations", get(list_recommendations))
        .route("/recommendations/:id/approve", patch(approve_recommendation))
        .route("/recommendations/:id/delete", delete(delete_recommendation))
        .with_state(backend);

    Router::new().nest("/api", recommendations)
}

/// Serves the fake on an ephemeral port and returns the API base URL
pub async fn spawn_backend(backend: FakeBackend) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(backend);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}
