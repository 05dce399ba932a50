//! Source, search-result, answer and library-page normalisation.
//!
//! Field aliases follow what the backend actually emits: `/search` and
//! `/library` use the `_row_to_result` shape (`title`, `page`, `path`), while
//! raw index rows use `doc_title`, `page_start`, `doc_path`, `text`.

use serde_json::Value;
use spacebio_common::{AnswerPayload, FacetKind, Facets, LibraryPage, SearchResult, SourceRecord};

use crate::numeric::{count_or_zero, first_present, float_opt, int_or_zero, string_opt, string_or_empty};

/// Facets from flat `organism`/`stressor`/`platform` fields, falling back to
/// a nested `facets` object for any the flat fields leave empty.
pub fn normalize_facets(raw: &Value) -> Facets {
    let mut facets = Facets::default();
    for kind in FacetKind::ALL {
        let key = kind.as_str();
        let value = string_opt(&raw[key]).or_else(|| string_opt(&raw["facets"][key]));
        facets.set(kind, value);
    }
    facets
}

pub fn normalize_source(raw: &Value) -> SourceRecord {
    SourceRecord {
        title: string_or_empty(first_present(raw, &["title", "doc_title"])),
        year: int_or_zero(&raw["year"]),
        page: int_or_zero(first_present(raw, &["page", "page_start"])),
        path: string_or_empty(first_present(raw, &["path", "doc_path"])),
        facets: normalize_facets(raw),
        score: float_opt(&raw["score"]),
    }
}

/// `year`/`page` are forced to integers, 0 when missing or non-numeric.
pub fn normalize_search_item(raw: &Value) -> SearchResult {
    SearchResult {
        source: normalize_source(raw),
        snippet: string_or_empty(first_present(raw, &["snippet", "text"])),
    }
}

/// Accepts `{ "results": [...] }` or a bare array.
pub fn normalize_search_results(raw: &Value) -> Vec<SearchResult> {
    let items = match raw {
        Value::Array(items) => items,
        _ => match raw["results"].as_array() {
            Some(items) => items,
            None => return Vec::new(),
        },
    };
    items.iter().map(normalize_search_item).collect()
}

pub fn normalize_answer(raw: &Value) -> AnswerPayload {
    let sources = raw["sources"]
        .as_array()
        .map(|items| items.iter().map(normalize_source).collect())
        .unwrap_or_default();

    AnswerPayload {
        answer: string_or_empty(&raw["answer"]),
        sources,
        tts_audio_url: string_opt(first_present(raw, &["tts_audio_url", "ttsAudioUrl"])),
        inferred_facets: raw["inferred_facets"].is_object().then(|| normalize_facets(&raw["inferred_facets"])),
        query_guess: raw["query_guess"].is_object().then(|| normalize_facets(&raw["query_guess"])),
    }
}

/// `page` and `page_size` fall back to the values that were requested when
/// the backend omits them.
pub fn normalize_library_page(raw: &Value, requested_page: u32, requested_page_size: u32) -> LibraryPage {
    let as_u32 = |v: &Value, fallback: u32| {
        u32::try_from(count_or_zero(v)).ok().filter(|n| *n > 0).unwrap_or(fallback)
    };
    LibraryPage {
        total: count_or_zero(&raw["total"]),
        page: as_u32(&raw["page"], requested_page.max(1)),
        page_size: as_u32(&raw["page_size"], requested_page_size.max(1)),
        results: normalize_search_results(&raw["results"]),
    }
}
