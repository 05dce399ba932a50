//! Normalisation for the auxiliary endpoints: ping, speech, auth, mind map
//! and story.

use std::collections::BTreeMap;

use serde_json::Value;
use spacebio_common::entities::{
    AuthToken, MindMap, MindMapEdge, MindMapNode, PingStatus, Story, StoryOutlineItem, Transcript,
    TtsAudio, VoiceList,
};

use crate::numeric::{bool_or_false, count_or_zero, first_present, float_or, string_opt, string_or_empty};
use crate::records::normalize_search_item;

pub fn normalize_ping(raw: &Value) -> PingStatus {
    PingStatus {
        status: string_or_empty(&raw["status"]),
        index_loaded: bool_or_false(&raw["index_loaded"]),
        vectors: count_or_zero(&raw["vectors"]),
    }
}

pub fn normalize_tts(raw: &Value) -> TtsAudio {
    TtsAudio {
        audio_url: string_or_empty(&raw["audio_url"]),
        file_path: string_or_empty(&raw["file_path"]),
    }
}

pub fn normalize_transcript(raw: &Value) -> Transcript {
    Transcript { text: string_or_empty(&raw["text"]).trim().to_string() }
}

pub fn normalize_voices(raw: &Value) -> VoiceList {
    VoiceList { voices: string_list(&raw["voices"]) }
}

pub fn normalize_token(raw: &Value) -> AuthToken {
    AuthToken {
        access_token: string_or_empty(&raw["access_token"]),
        token_type: string_opt(&raw["token_type"]).unwrap_or_else(|| "bearer".to_string()),
        expires_in: count_or_zero(&raw["expires_in"]),
    }
}

/// Nodes without an id and edges without both endpoints are dropped; a
/// missing label falls back to the id and missing weights to 1.0.
pub fn normalize_mindmap(raw: &Value) -> MindMap {
    let nodes = array(&raw["nodes"])
        .filter_map(|n| {
            let id = string_opt(&n["id"])?;
            Some(MindMapNode {
                label: string_opt(&n["label"]).unwrap_or_else(|| id.clone()),
                kind: string_opt(&n["kind"]).unwrap_or_else(|| "concept".to_string()),
                weight: float_or(&n["weight"], 1.0),
                id,
            })
        })
        .collect();

    let edges = array(&raw["edges"])
        .filter_map(|e| {
            Some(MindMapEdge {
                source: string_opt(&e["source"])?,
                target: string_opt(&e["target"])?,
                relation: string_or_empty(&e["relation"]),
                weight: float_or(&e["weight"], 1.0),
            })
        })
        .collect();

    let mut support_by_node = BTreeMap::new();
    if let Some(map) = first_present(raw, &["supportByNode", "support_by_node"]).as_object() {
        for (node_id, sources) in map {
            support_by_node.insert(node_id.clone(), array(sources).map(normalize_search_item).collect());
        }
    }

    MindMap { nodes, edges, support_by_node }
}

pub fn normalize_story(raw: &Value) -> Story {
    let outline = array(&raw["outline"])
        .filter_map(|item| {
            Some(StoryOutlineItem {
                heading: string_opt(&item["heading"])?,
                key_points: string_list(&item["key_points"]),
            })
        })
        .collect();

    Story {
        markdown: string_or_empty(&raw["markdown"]),
        outline,
        sources: array(&raw["sources"]).map(normalize_search_item).collect(),
    }
}

fn array(v: &Value) -> impl Iterator<Item = &Value> {
    v.as_array().into_iter().flatten()
}

fn string_list(v: &Value) -> Vec<String> {
    array(v).filter_map(string_opt).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ping() {
        let p = normalize_ping(&json!({"status": "ok", "index_loaded": true, "vectors": 4096}));
        assert_eq!(p.status, "ok");
        assert!(p.index_loaded);
        assert_eq!(p.vectors, 4096);
        assert_eq!(normalize_ping(&json!({})), PingStatus::default());
    }

    #[test]
    fn test_token_defaults_to_bearer() {
        let t = normalize_token(&json!({"access_token": "abc", "expires_in": 86400}));
        assert_eq!(t.token_type, "bearer");
        assert_eq!(t.expires_in, 86400);
    }

    #[test]
    fn test_mindmap_drops_incomplete_items() {
        let m = normalize_mindmap(&json!({
            "nodes": [
                {"id": "mouse", "label": "Mouse", "kind": "organism", "weight": 1.5},
                {"label": "no id"},
                {"id": "iss"}
            ],
            "edges": [
                {"source": "mouse", "target": "iss", "relation": "measured_in"},
                {"source": "mouse"}
            ],
            "supportByNode": {
                "mouse": [{"title": "t", "year": "2015", "page": 2, "path": "p.pdf", "snippet": "s"}]
            }
        }));
        assert_eq!(m.nodes.len(), 2);
        assert_eq!(m.nodes[1].label, "iss");
        assert_eq!(m.nodes[1].kind, "concept");
        assert_eq!(m.nodes[1].weight, 1.0);
        assert_eq!(m.edges.len(), 1);
        assert_eq!(m.support_by_node["mouse"][0].source.year, 2015);
    }

    #[test]
    fn test_story_outline_and_sources() {
        let s = normalize_story(&json!({
            "markdown": "## Background\nBone loss [1].",
            "outline": [{"heading": "Background", "key_points": ["bone", 3, null]}, {"key_points": []}],
            "sources": [{"title": "t", "path": "p.pdf", "snippet": "s"}]
        }));
        assert_eq!(s.outline.len(), 1);
        assert_eq!(s.outline[0].key_points, vec!["bone", "3"]);
        assert_eq!(s.sources[0].source.path, "p.pdf");
    }

    #[test]
    fn test_transcript_trimmed() {
        assert_eq!(normalize_transcript(&json!({"text": "  hello  "})).text, "hello");
    }
}
