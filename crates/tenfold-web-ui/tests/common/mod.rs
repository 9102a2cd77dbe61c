#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;
use tenfold_client::Client;
use tenfold_web_ui::{Opts, Server};

#[derive(Debug, Clone)]
pub struct Captured {
    pub path: &'static str,
    pub authorization: Option<String>,
    pub tenant: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    login_response: Mutex<Option<serde_json::Value>>,
    force_unauthorized: AtomicBool,
    captured: Mutex<Vec<Captured>>,
}

/// Fake CRM backend for the console to talk to.
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
            .route("/api/v1/admin/tenants/", get(tenants))
            .route("/api/v1/admin_users/users/", get(users))
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
}

async fn login(State(state): State<Arc<MockState>>) -> Response {
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

async fn tenants(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    resource(state, "/admin/tenants/", headers, json!([]))
}

async fn users(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    resource(state, "/admin_users/users/", headers, json!([]))
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
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(body).into_response()
}

/// Console server on a random port with ephemeral session storage.
pub struct TestServer {
    base_url: String,
    _temp_dir: TempDir,
    _server: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(backend: &MockBackend) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let client = Client::builder()
            .base_url(backend.base_url())
            .db_path(temp_dir.path().join("session.redb"))
            .build()
            .await
            .expect("Client init failed");

        let server = Server::init(Opts::new("127.0.0.1:0".to_owned(), None), client)
            .await
            .expect("Failed to start test server");
        let base_url = format!("http://{}", server.addr().expect("Server has an address"));

        let server = tokio::spawn(async move {
            server.run().await.expect("Console server died");
        });

        Self {
            base_url,
            _temp_dir: temp_dir,
            _server: server,
        }
    }

    pub fn driver(&self) -> UiDriver {
        UiDriver::new(self.base_url.clone())
    }
}

/// HTTP driver for the console.
///
/// Redirects are not followed so tests can assert on their targets.
pub struct UiDriver {
    client: reqwest::Client,
    base_url: String,
}

impl UiDriver {
    fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }
}

pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .expect("Invalid Location header")
        .to_owned()
}
