//! spacebio-test-utils — fixtures and an in-process stub backend.

pub mod fixtures;
pub mod stub;

pub use axum::http::Method;
pub use stub::{RecordedRequest, StubBackend, StubResponse};
