//! Canned backend payloads in the shapes the live service returns.

use serde_json::{json, Value};

pub fn ping() -> Value {
    json!({"status": "ok", "index_loaded": true, "vectors": 5120})
}

/// `/stats` as the backend emits it: `Counter.most_common()` pairs.
pub fn stats() -> Value {
    json!({
        "organisms": [["Mouse", 5], ["Rat", 3], ["Fly", 3]],
        "stressors": [["Microgravity", 8], ["Radiation", "4"]],
        "platforms": [["ISS", 6], ["Shuttle", 2]],
        "chunks": 5120
    })
}

pub fn search_results() -> Value {
    json!({"results": [
        {
            "title": "Bone loss in spaceflown mice",
            "year": "2020",
            "page": 4,
            "snippet": "Trabecular bone volume fell by 30%...",
            "path": "papers/bone_mice.pdf",
            "organism": "Mouse",
            "stressor": "Microgravity",
            "platform": "ISS"
        },
        {
            "title": "Muscle atrophy after hindlimb unloading",
            "year": 2018,
            "page": null,
            "snippet": "Soleus mass decreased...",
            "path": "papers/muscle_rat.pdf",
            "organism": "Rat",
            "stressor": "Microgravity",
            "platform": null
        },
        {
            "title": "Drosophila immunity in orbit",
            "year": null,
            "page": "12",
            "snippet": "Flies raised on the ISS...",
            "path": "papers/fly_immunity.pdf",
            "organism": "Mouse",
            "stressor": "Radiation",
            "platform": "ISS"
        }
    ]})
}

pub fn ask_simple() -> Value {
    json!({
        "answer": "Microgravity drives bone loss [2] and muscle atrophy [1][2].",
        "sources": [
            {"title": "Muscle atrophy after hindlimb unloading", "year": 2018, "page": 3,
             "path": "papers/muscle_rat.pdf", "organism": "Rat", "stressor": "Microgravity",
             "platform": null, "score": 0.71},
            {"title": "Bone loss in spaceflown mice", "year": 2020, "page": 4,
             "path": "papers/bone_mice.pdf", "organism": "Mouse", "stressor": "Microgravity",
             "platform": "ISS", "score": 0.83}
        ],
        "inferred_facets": {"organism": "Mouse", "stressor": "Microgravity", "platform": "ISS"},
        "query_guess": {"organism": null, "stressor": "Microgravity", "platform": null}
    })
}

pub fn library_page() -> Value {
    json!({
        "total": 45,
        "page": 1,
        "page_size": 20,
        "results": search_results()["results"].clone()
    })
}

pub fn mindmap() -> Value {
    json!({
        "nodes": [
            {"id": "mouse", "label": "Mouse", "kind": "organism", "weight": 1.6},
            {"id": "bone-loss", "label": "Bone loss", "kind": "concept", "weight": 1.2}
        ],
        "edges": [
            {"source": "mouse", "target": "bone-loss", "relation": "affects", "weight": 1.0}
        ],
        "supportByNode": {
            "mouse": [{"title": "Bone loss in spaceflown mice", "year": "2020", "page": 4,
                       "path": "papers/bone_mice.pdf", "snippet": "Trabecular bone..."}]
        }
    })
}

pub fn story() -> Value {
    json!({
        "markdown": "## Background\nSpaceflight causes bone loss [1].\n\n## Findings\nMuscle mass drops [2].",
        "outline": [
            {"heading": "Background", "key_points": ["bone loss"]},
            {"heading": "Findings", "key_points": ["muscle atrophy"]}
        ],
        "sources": [
            {"title": "Bone loss in spaceflown mice", "year": "2020", "page": 4,
             "path": "papers/bone_mice.pdf", "snippet": "Trabecular bone..."},
            {"title": "Muscle atrophy after hindlimb unloading", "year": "2018", "page": null,
             "path": "papers/muscle_rat.pdf", "snippet": "Soleus mass..."}
        ]
    })
}

pub fn tts() -> Value {
    json!({"audio_url": "/audio/3f2a.wav", "file_path": "data/audio/3f2a.wav"})
}

pub fn voices() -> Value {
    json!({"voices": ["en_US-amy-medium", "en_GB-alan-low"]})
}

pub fn transcript() -> Value {
    json!({"text": " What happens to bone in microgravity? "})
}

pub fn token() -> Value {
    json!({"access_token": "test-token-123", "token_type": "bearer", "expires_in": 86400})
}

pub fn index_missing() -> Value {
    json!({"error": "Index missing. Set BOOT_MODE=full and run ingest to build FAISS."})
}
