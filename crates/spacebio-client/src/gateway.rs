//! Request gateway: the single choke point for backend calls.
//!
//! Every call gets an absolute URL from the configured base, the JSON
//! content type, the bearer token when one is held, and a hard timeout.
//! Bodies are read as text before any parsing. There are no retries.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use spacebio_common::{ClientError, Result};
use tracing::{debug, instrument};
use url::Url;

/// Per-call request options.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl CallOptions {
    pub fn get() -> Self {
        Self { method: Method::GET, query: Vec::new(), headers: Vec::new(), body: None }
    }

    pub fn post(body: Value) -> Self {
        Self { method: Method::POST, body: Some(body), ..Self::get() }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn queries<K: Into<String>>(mut self, pairs: impl IntoIterator<Item = (K, String)>) -> Self {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub struct Gateway {
    client: Client,
    base_url: String,
    timeout: Duration,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("authenticated", &self.has_token())
            .finish()
    }
}

impl Gateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = ClientBuilder::new()
            .user_agent(concat!("spacebio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url, timeout, token: RwLock::new(None) })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Hold `token` for every following request. Blank tokens clear it.
    pub fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.trim().is_empty()).map(SecretString::from);
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Absolute URL for `endpoint`, which must be a path on the base URL.
    pub fn url_for(&self, endpoint: &str) -> Result<Url> {
        let invalid = |reason: String| ClientError::InvalidEndpoint { endpoint: endpoint.to_string(), reason };
        if endpoint.contains("://") {
            return Err(invalid("absolute URLs are not accepted".to_string()));
        }
        let path = endpoint.trim_start_matches('/');
        Url::parse(&format!("{}/{}", self.base_url, path)).map_err(|e| invalid(e.to_string()))
    }

    /// JSON call. An empty success body yields `{}`.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn call(&self, endpoint: &str, options: CallOptions) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        let mut request = self
            .client
            .request(options.method, url)
            .header(CONTENT_TYPE, "application/json")
            .query(&options.query);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }
        self.dispatch(request).await
    }

    /// Multipart upload. No JSON content type; auth and timeout still apply.
    #[instrument(skip(self, form))]
    pub async fn call_multipart(&self, endpoint: &str, form: Form) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        let request = self.client.post(url).multipart(form);
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Value> {
        let request = self.authorize(request);
        let started = Instant::now();

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, ClientError>((status, text))
        };
        let (status, text) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;

        debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = text.len(),
            "Backend responded"
        );
        interpret_response(status, &text)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().unwrap_or_else(|e| e.into_inner());
        match token.as_ref() {
            Some(secret) => request.bearer_auth(secret.expose_secret()),
            None => request,
        }
    }
}

/// Turn a status and raw body into a JSON value or a typed failure.
pub fn interpret_response(status: StatusCode, text: &str) -> Result<Value> {
    if !status.is_success() {
        let detail = match serde_json::from_str::<Value>(text) {
            Ok(payload) => payload.to_string(),
            Err(_) if text.trim().is_empty() => status.canonical_reason().unwrap_or_default().to_string(),
            Err(_) => text.trim().to_string(),
        };
        return Err(ClientError::RequestFailed { status: status.as_u16(), detail });
    }
    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(text)?)
}
