//! Typed endpoint API over the gateway.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::{json, Value};
use spacebio_common::entities::{AuthToken, MindMap, PingStatus, Story, Transcript, TtsAudio, VoiceList};
use spacebio_common::{AnswerPayload, ClientError, FacetKind, Facets, LibraryPage, Result, SearchResult, Stats};
use spacebio_config::{Config, QueryConfig, StoryConfig};
use spacebio_library::{LibraryQueryState, LibrarySource};
use spacebio_normalise as normalise;
use tracing::{debug, info, instrument, warn};

use crate::gateway::{CallOptions, Gateway};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMapRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub top_k: u32,
    #[serde(flatten)]
    pub facets: Facets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// scientific | public | chronological | thematic
    pub mode: String,
    /// short | medium | long
    pub length: String,
    pub top_k: u32,
    #[serde(flatten)]
    pub facets: Facets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
}

impl StoryRequest {
    pub fn from_config(config: &StoryConfig, question: Option<String>) -> Self {
        Self {
            question,
            mode: config.mode.clone(),
            length: config.length.clone(),
            top_k: config.top_k,
            facets: Facets::default(),
            paths: None,
        }
    }
}

/// Client for the knowledge-base backend.
#[derive(Debug)]
pub struct KnowledgeClient {
    gateway: Gateway,
    query: QueryConfig,
    story: StoryConfig,
}

impl KnowledgeClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = Gateway::new(&config.backend.base_url, config.backend.request_timeout())?;
        gateway.set_token(config.backend.token.clone());
        Ok(Self { gateway, query: config.query.clone(), story: config.story.clone() })
    }

    /// Client with default settings against `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut config = Config::default();
        config.backend.base_url = base_url.to_string();
        Self::from_config(&config)
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn story_config(&self) -> &StoryConfig {
        &self.story
    }

    pub fn mindmap_request(&self, question: Option<String>) -> MindMapRequest {
        MindMapRequest { question, top_k: self.query.mindmap_top_k, facets: Facets::default(), paths: None }
    }

    // ── Status ───────────────────────────────────────────────────────────────

    pub async fn ping(&self) -> Result<PingStatus> {
        let raw = self.gateway.call("/ping", CallOptions::get()).await?;
        Ok(normalise::normalize_ping(&raw))
    }

    pub async fn health(&self) -> Result<String> {
        let raw = self.gateway.call("/health", CallOptions::get()).await?;
        Ok(raw["status"].as_str().unwrap_or("unknown").to_string())
    }

    pub async fn stats(&self) -> Result<Stats> {
        let raw = self.gateway.call("/stats", CallOptions::get()).await?;
        Ok(normalise::normalize_stats(&raw))
    }

    // ── Retrieval ────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn search(&self, q: &str, top_k: Option<u32>) -> Result<Vec<SearchResult>> {
        let top_k = top_k.unwrap_or(self.query.search_top_k);
        let raw = self
            .gateway
            .call("/search", CallOptions::get().query("q", q).query("top_k", top_k))
            .await?;
        let results = normalise::normalize_search_results(&raw);
        debug!(count = results.len(), "Search results");
        Ok(results)
    }

    #[instrument(skip(self))]
    pub async fn ask_simple(&self, question: &str) -> Result<AnswerPayload> {
        let body = json!({"question": question, "top_k": self.query.ask_top_k});
        let options = CallOptions::post(body).query("tts", self.query.tts);
        let raw = self.gateway.call("/ask-simple", options).await?;
        Ok(normalise::normalize_answer(&raw))
    }

    /// Ask with explicit facet filters.
    #[instrument(skip(self))]
    pub async fn ask(&self, question: &str, facets: &Facets) -> Result<AnswerPayload> {
        let mut body = json!({"question": question, "top_k": self.query.ask_top_k});
        for kind in FacetKind::ALL {
            if let Some(value) = facets.get(kind) {
                body[kind.as_str()] = Value::from(value);
            }
        }
        let raw = self.gateway.call("/ask", CallOptions::post(body)).await?;
        Ok(normalise::normalize_answer(&raw))
    }

    pub async fn library(&self, query: &LibraryQueryState) -> Result<LibraryPage> {
        let options = CallOptions::get().queries(query.query_pairs());
        let raw = self.gateway.call("/library", options).await?;
        Ok(normalise::normalize_library_page(&raw, query.page, query.page_size))
    }

    // ── Generated views ──────────────────────────────────────────────────────

    #[instrument(skip(self, request))]
    pub async fn mindmap(&self, request: &MindMapRequest) -> Result<MindMap> {
        let body = serde_json::to_value(request)?;
        let raw = self.gateway.call("/mindmap", CallOptions::post(body)).await?;
        Ok(normalise::normalize_mindmap(&raw))
    }

    /// Try each configured story endpoint in order; the first success wins.
    #[instrument(skip(self, request))]
    pub async fn story(&self, request: &StoryRequest) -> Result<Story> {
        let body = serde_json::to_value(request)?;
        let mut last_err = None;
        for endpoint in &self.story.endpoints {
            match self.gateway.call(endpoint, CallOptions::post(body.clone())).await {
                Ok(raw) => return Ok(normalise::normalize_story(&raw)),
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Story endpoint failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| ClientError::InvalidEndpoint {
            endpoint: "story".to_string(),
            reason: "no candidate endpoints configured".to_string(),
        }))
    }

    // ── Speech ───────────────────────────────────────────────────────────────

    pub async fn tts(&self, text: &str, voice: Option<&str>) -> Result<TtsAudio> {
        let mut body = json!({"text": text});
        if let Some(voice) = voice.or(self.query.voice.as_deref()) {
            body["voice"] = Value::from(voice);
        }
        let raw = self.gateway.call("/tts", CallOptions::post(body)).await?;
        Ok(normalise::normalize_tts(&raw))
    }

    pub async fn voices(&self) -> Result<VoiceList> {
        let raw = self.gateway.call("/tts/voices", CallOptions::get()).await?;
        Ok(normalise::normalize_voices(&raw))
    }

    /// Transcribe a recorded audio file.
    #[instrument(skip(self))]
    pub async fn stt(&self, path: &Path) -> Result<Transcript> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => ClientError::DeviceAccessDenied(path.display().to_string()),
            _ => ClientError::Storage(format!("read {}: {e}", path.display())),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());
        self.stt_bytes(&file_name, bytes).await
    }

    pub async fn stt_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<Transcript> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(audio_mime(file_name))?;
        let raw = self.gateway.call_multipart("/stt", Form::new().part("file", part)).await?;
        Ok(normalise::normalize_transcript(&raw))
    }

    // ── Auth ─────────────────────────────────────────────────────────────────

    /// Log in and hold the returned token for subsequent requests.
    pub async fn login(&self, password: &str) -> Result<AuthToken> {
        let raw = self
            .gateway
            .call("/auth/login", CallOptions::post(json!({"password": password})))
            .await?;
        let token = normalise::normalize_token(&raw);
        if token.access_token.is_empty() {
            return Err(ClientError::RequestFailed {
                status: 200,
                detail: "login response carried no access_token".to_string(),
            });
        }
        self.gateway.set_token(Some(token.access_token.clone()));
        info!(expires_in = token.expires_in, "Logged in");
        Ok(token)
    }

    pub fn set_token(&self, token: Option<String>) {
        self.gateway.set_token(token);
    }
}

#[async_trait]
impl LibrarySource for KnowledgeClient {
    async fn fetch_library(&self, query: &LibraryQueryState) -> Result<LibraryPage> {
        self.library(query).await
    }
}

fn audio_mime(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_story_request_wire_shape() {
        let mut req = StoryRequest::from_config(&StoryConfig::default(), Some("bone loss".into()));
        req.facets.set(FacetKind::Organism, Some("Mouse".into()));
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "question": "bone loss",
                "mode": "scientific",
                "length": "short",
                "top_k": 15,
                "organism": "Mouse"
            })
        );
    }

    #[test]
    fn test_mindmap_request_omits_empty_fields() {
        let client = KnowledgeClient::with_base_url("http://localhost:8000").unwrap();
        let v = serde_json::to_value(client.mindmap_request(None)).unwrap();
        assert_eq!(v, json!({"top_k": 20}));
    }

    #[test]
    fn test_audio_mime() {
        assert_eq!(audio_mime("clip.WAV"), "audio/wav");
        assert_eq!(audio_mime("clip.webm"), "audio/webm");
        assert_eq!(audio_mime("clip"), "application/octet-stream");
    }
}
