//! Stable UI-facing records produced from backend payloads.
//! Everything here is built by the normaliser and never mutated afterwards.

use std::collections::{BTreeMap, HashSet};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// One of the three categorical dimensions attached to a corpus entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Organism,
    Stressor,
    Platform,
}

impl FacetKind {
    /// Display and layout order: organism → stressor → platform.
    pub const ALL: [FacetKind; 3] = [FacetKind::Organism, FacetKind::Stressor, FacetKind::Platform];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKind::Organism => "organism",
            FacetKind::Stressor => "stressor",
            FacetKind::Platform => "platform",
        }
    }
}

impl std::fmt::Display for FacetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional facet values. A facet counts as present only when it holds a
/// non-empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stressor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl Facets {
    pub fn get(&self, kind: FacetKind) -> Option<&str> {
        let value = match kind {
            FacetKind::Organism => &self.organism,
            FacetKind::Stressor => &self.stressor,
            FacetKind::Platform => &self.platform,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, kind: FacetKind, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match kind {
            FacetKind::Organism => self.organism = value,
            FacetKind::Stressor => self.stressor = value,
            FacetKind::Platform => self.platform = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        FacetKind::ALL.iter().all(|k| self.get(*k).is_none())
    }
}

// ---------------------------------------------------------------------------
// Sources and search results
// ---------------------------------------------------------------------------

/// A retrieved passage reference. `year` and `page` use 0 for "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub year: i32,
    pub page: i32,
    pub path: String,
    #[serde(flatten)]
    pub facets: Facets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SourceRecord {
    /// Score used for ranking; a missing score ranks as 0.
    pub fn rank_score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

impl AsRef<SourceRecord> for SourceRecord {
    fn as_ref(&self) -> &SourceRecord {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub source: SourceRecord,
    pub snippet: String,
}

impl AsRef<SourceRecord> for SearchResult {
    fn as_ref(&self) -> &SourceRecord {
        &self.source
    }
}

/// Generated answer plus the ordered sources its `[n]` markers refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_audio_url: Option<String>,
    /// Majority facet values among the selected sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_facets: Option<Facets>,
    /// Facet values the backend guessed from the question text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_guess: Option<Facets>,
}

// ---------------------------------------------------------------------------
// Frequency tables and corpus statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: u64,
}

/// Label counts with unique labels. Ranked input keeps the backend's order;
/// unranked input is sorted by descending count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Wrap entries that are already rank-sorted. Order is kept as given and
    /// a repeated label keeps only its first row.
    pub fn from_ranked(entries: Vec<FrequencyEntry>) -> Self {
        Self { entries: first_per_label(entries) }
    }

    /// Sort arbitrary entries by descending count. The sort is stable, so
    /// equal counts keep their incoming order.
    pub fn from_unranked(entries: Vec<FrequencyEntry>) -> Self {
        let mut entries = first_per_label(entries);
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequencyEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    /// The first `n` entries (fewer if the table is shorter).
    pub fn top(&self, n: usize) -> &[FrequencyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn count_of(&self, label: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn first_per_label(entries: Vec<FrequencyEntry>) -> Vec<FrequencyEntry> {
    let mut seen = HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.label.clone())).collect()
}

/// Global corpus statistics from `/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub organisms: FrequencyTable,
    pub stressors: FrequencyTable,
    pub platforms: FrequencyTable,
    pub chunks: u64,
}

impl Stats {
    pub fn table(&self, kind: FacetKind) -> &FrequencyTable {
        match kind {
            FacetKind::Organism => &self.organisms,
            FacetKind::Stressor => &self.stressors,
            FacetKind::Platform => &self.platforms,
        }
    }
}

// ---------------------------------------------------------------------------
// Library browsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPage {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<SearchResult>,
}

// ---------------------------------------------------------------------------
// Auxiliary endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingStatus {
    pub status: String,
    pub index_loaded: bool,
    pub vectors: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsAudio {
    pub audio_url: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceList {
    pub voices: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Mind map (backend-generated concept graph)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub id: String,
    pub label: String,
    /// organism | stressor | platform | method | gene | concept
    pub kind: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub nodes: Vec<MindMapNode>,
    pub edges: Vec<MindMapEdge>,
    pub support_by_node: BTreeMap<String, Vec<SearchResult>>,
}

// ---------------------------------------------------------------------------
// Story (generated narrative)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOutlineItem {
    pub heading: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub markdown: String,
    pub outline: Vec<StoryOutlineItem>,
    pub sources: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(label: &str, count: u64) -> FrequencyEntry {
        FrequencyEntry { label: label.to_string(), count }
    }

    #[test]
    fn test_facets_treat_empty_string_as_absent() {
        let mut f = Facets::default();
        f.set(FacetKind::Organism, Some(String::new()));
        assert_eq!(f.get(FacetKind::Organism), None);
        assert!(f.is_empty());

        f.set(FacetKind::Stressor, Some("Microgravity".into()));
        assert_eq!(f.get(FacetKind::Stressor), Some("Microgravity"));
        assert!(!f.is_empty());
    }

    #[test]
    fn test_unranked_table_sorts_descending_and_stable() {
        let t = FrequencyTable::from_unranked(vec![entry("Rat", 3), entry("Mouse", 5), entry("Fly", 3)]);
        let labels: Vec<&str> = t.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Mouse", "Rat", "Fly"]);
    }

    #[test]
    fn test_repeated_label_keeps_first_row() {
        let t = FrequencyTable::from_ranked(vec![entry("Mouse", 5), entry("Mouse", 3), entry("Rat", 1)]);
        assert_eq!(t.iter().cloned().collect::<Vec<_>>(), vec![entry("Mouse", 5), entry("Rat", 1)]);

        let t = FrequencyTable::from_unranked(vec![entry("Rat", 1), entry("Mouse", 2), entry("Rat", 9)]);
        assert_eq!(t.iter().cloned().collect::<Vec<_>>(), vec![entry("Mouse", 2), entry("Rat", 1)]);
    }

    #[test]
    fn test_top_is_bounded_by_len() {
        let t = FrequencyTable::from_ranked(vec![entry("Mouse", 5), entry("Rat", 3)]);
        assert_eq!(t.top(7).len(), 2);
        assert_eq!(t.top(1)[0].label, "Mouse");
        assert_eq!(t.count_of("Rat"), Some(3));
        assert_eq!(t.count_of("Fly"), None);
    }

    #[test]
    fn test_source_record_flattens_facets_in_json() {
        let s = SourceRecord {
            title: "Bone loss in mice".into(),
            year: 2020,
            page: 4,
            path: "papers/bone.pdf".into(),
            facets: Facets { organism: Some("Mouse".into()), ..Default::default() },
            score: Some(0.8),
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["organism"], "Mouse");
        assert!(v.get("stressor").is_none());
        assert_eq!(s.rank_score(), 0.8);
    }
}
