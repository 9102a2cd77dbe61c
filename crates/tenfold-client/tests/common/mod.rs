#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;
use tenfold_client::Client;

/// A request as the fake backend saw it, for asserting on headers.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: &'static str,
    pub authorization: Option<String>,
    pub tenant: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    /// JSON body a successful login returns; `None` rejects every login.
    login_response: Mutex<Option<serde_json::Value>>,
    /// When set, every resource endpoint answers 401.
    force_unauthorized: AtomicBool,
    captured: Mutex<Vec<Captured>>,
}

/// In-process stand-in for the CRM backend, listening on a random port.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    _server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/api/v1/auth/login/", post(login))
            .route("/api/v1/crm/contacts/", get(contacts))
            .route("/api/v1/admin/crm/contacts/", get(admin_crm_contacts))
            .route("/api/v1/admin/tenants/", get(tenants))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Listener has an address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend died");
        });

        Self {
            addr,
            state,
            _server: server,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn accept_logins_with(&self, response: serde_json::Value) {
        *self.state.login_response.lock().expect("Locking failed") = Some(response);
    }

    pub fn reject_logins(&self) {
        *self.state.login_response.lock().expect("Locking failed") = None;
    }

    pub fn force_unauthorized(&self, on: bool) {
        self.state.force_unauthorized.store(on, Ordering::SeqCst);
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.state.captured.lock().expect("Locking failed").clone()
    }

    pub fn last_captured(&self) -> Captured {
        self.captured().last().cloned().expect("No request captured")
    }
}

async fn login(
    State(state): State<Arc<MockState>>,
    Query(_params): Query<HashMap<String, String>>,
) -> Response {
    match state.login_response.lock().expect("Locking failed").clone() {
        Some(body) => Json(body).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response(),
    }
}

async fn contacts(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    resource(state, "/crm/contacts/", headers, json!([]))
}

async fn admin_crm_contacts(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    resource(state, "/admin/crm/contacts/", headers, json!([]))
}

async fn tenants(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    resource(state, "/admin/tenants/", headers, json!([]))
}

fn resource(
    state: Arc<MockState>,
    path: &'static str,
    headers: HeaderMap,
    body: serde_json::Value,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
    };
    state.captured.lock().expect("Locking failed").push(Captured {
        path,
        authorization: header("authorization"),
        tenant: header("x-tenant-id"),
    });

    if state.force_unauthorized.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Could not validate credentials"})),
        )
            .into_response();
    }

    Json(body).into_response()
}

/// A client wired to the mock backend with its session database in `dir`.
pub async fn client(backend: &MockBackend, dir: &TempDir) -> Client {
    Client::builder()
        .base_url(backend.base_url())
        .db_path(dir.path().join("session.redb"))
        .build()
        .await
        .expect("Client init failed")
}

pub fn session_db_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("session.redb")
}
