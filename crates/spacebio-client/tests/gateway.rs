use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::json;
use spacebio_client::{CallOptions, Gateway};
use spacebio_common::ClientError;
use spacebio_test_utils::{Method, StubBackend, StubResponse};

async fn stub() -> StubBackend {
    StubBackend::start().await.expect("stub backend binds")
}

#[tokio::test]
async fn test_empty_body_yields_empty_object() {
    let backend = stub().await;
    backend.mount(Method::GET, "/health", StubResponse::empty()).await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    let value = gateway.call("/health", CallOptions::get()).await.unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_non_2xx_carries_json_detail() {
    let backend = stub().await;
    backend
        .mount(Method::GET, "/search", StubResponse::error(400, json!({"error": "Index missing"})))
        .await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    let err = gateway.call("/search", CallOptions::get().query("q", "bone")).await.unwrap_err();
    match err {
        ClientError::RequestFailed { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, r#"{"error":"Index missing"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let backend = stub().await;
    backend.mount(Method::GET, "/ping", StubResponse::text(200, "{\"status\": ")).await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    let err = gateway.call("/ping", CallOptions::get()).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = stub().await;
    backend
        .mount(Method::GET, "/stats", StubResponse::json(json!({})).delayed(Duration::from_secs(3)))
        .await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_millis(200)).unwrap();
    let err = gateway.call("/stats", CallOptions::get()).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "Request timed out after 200ms");
}

#[tokio::test]
async fn test_headers_auth_and_body() {
    let backend = stub().await;
    backend.mount(Method::POST, "/ask-simple", StubResponse::json(json!({"answer": "ok"}))).await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    gateway.set_token(Some("secret-token".into()));
    gateway
        .call(
            "/ask-simple",
            CallOptions::post(json!({"question": "q", "top_k": 8}))
                .query("tts", false)
                .header("X-Request-Source", "tests"),
        )
        .await
        .unwrap();

    let seen = backend.requests_to("/ask-simple").await;
    assert_eq!(seen.len(), 1);
    let req = &seen[0];
    assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("x-request-source"), Some("tests"));
    assert_eq!(req.query_param("tts").as_deref(), Some("false"));
    assert_eq!(req.json(), Some(json!({"question": "q", "top_k": 8})));
}

fn audio_form() -> Form {
    Form::new().part("file", Part::bytes(b"RIFF....WAVE".to_vec()).file_name("q.wav"))
}

#[tokio::test]
async fn test_multipart_carries_auth_without_json_content_type() {
    let backend = stub().await;
    backend.mount(Method::POST, "/stt", StubResponse::json(json!({"text": "hi"}))).await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    gateway.set_token(Some("secret-token".into()));
    let value = gateway.call_multipart("/stt", audio_form()).await.unwrap();
    assert_eq!(value, json!({"text": "hi"}));

    let req = &backend.requests_to("/stt").await[0];
    assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
    let content_type = req.header("content-type").unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(!content_type.contains("application/json"));
}

#[tokio::test]
async fn test_slow_multipart_upload_times_out() {
    let backend = stub().await;
    backend
        .mount(Method::POST, "/stt", StubResponse::json(json!({"text": "late"})).delayed(Duration::from_secs(3)))
        .await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_millis(200)).unwrap();
    let err = gateway.call_multipart("/stt", audio_form()).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_no_auth_header_without_token() {
    let backend = stub().await;
    backend.mount(Method::GET, "/ping", StubResponse::json(json!({"status": "ok"}))).await;

    let gateway = Gateway::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    gateway.call("/ping", CallOptions::get()).await.unwrap();
    let seen = backend.requests_to("/ping").await;
    assert_eq!(seen[0].header("authorization"), None);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let backend = stub().await;
    let base = backend.base_url();
    drop(backend);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let gateway = Gateway::new(&base, Duration::from_secs(5)).unwrap();
    let err = gateway.call("/ping", CallOptions::get()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
