//! Stub backend: an axum server on an ephemeral local port that answers
//! mounted `(method, path)` routes with canned bodies and records every
//! request it sees.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(body: Value) -> Self {
        Self { status: 200, body: body.to_string(), delay: None }
    }

    pub fn error(status: u16, body: Value) -> Self {
        Self { status, body: body.to_string(), delay: None }
    }

    /// Arbitrary body text, sent as-is.
    pub fn text(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), delay: None }
    }

    pub fn empty() -> Self {
        Self::text(200, "")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Decoded query string pairs, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default()
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs().into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<(Method, String), StubResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

impl StubBackend {
    /// Bind `127.0.0.1:0` and start serving. Unmounted paths answer 404.
    pub async fn start() -> std::io::Result<Self> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(StubState::default());

        let app = Router::new().fallback(handle).with_state(state.clone());
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!(error = %e, "Stub backend stopped");
            }
        });

        Ok(Self { addr, state, server })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn mount(&self, method: Method, path: &str, response: StubResponse) {
        self.state
            .routes
            .lock()
            .await
            .insert((method, path.to_string()), response);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Requests that hit `path`, in arrival order.
    pub async fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().await.into_iter().filter(|r| r.path == path).collect()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().await.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(String::from),
        headers,
        body,
    });

    let route = state.routes.lock().await.get(&(method, path)).cloned();
    let Some(route) = route else {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"detail":"Not Found"}"#,
        )
            .into_response();
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], route.body).into_response()
}
