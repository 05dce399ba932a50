//! spacebio-citations — maps inline `[n]` markers in generated text back to
//! the ordered source list that came with it.
//!
//! Resolution never fails. Text without usable markers falls back to the
//! highest-scoring sources so an answer view always has something to show.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use spacebio_common::SourceRecord;
use tracing::debug;

/// Number of sources shown when the text cites nothing.
pub const FALLBACK_LIMIT: usize = 4;

fn citation_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("citation pattern is valid"))
}

/// How a `ResolvedCitations` was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationMode {
    /// The text carried at least one in-range marker.
    Inline,
    /// No usable markers; sources picked by score.
    TopScored,
}

/// One displayed source. `number` is the 1-based position in the original
/// source list, which is what the `[n]` markers refer to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitedSource<'a, T> {
    pub number: usize,
    pub source: &'a T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCitations<'a, T> {
    pub mode: CitationMode,
    pub cited: Vec<CitedSource<'a, T>>,
}

impl<'a, T> ResolvedCitations<'a, T> {
    /// 0-based indices into the source list, in display order.
    pub fn indices(&self) -> Vec<usize> {
        self.cited.iter().map(|c| c.number - 1).collect()
    }

    pub fn sources(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.cited.iter().map(|c| c.source)
    }

    pub fn len(&self) -> usize {
        self.cited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cited.is_empty()
    }
}

/// Distinct marker numbers in `[1, source_count]`, ordered by first
/// appearance. Markers that overflow or fall outside the range are skipped.
pub fn citation_numbers(text: &str, source_count: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut numbers = Vec::new();
    for cap in citation_regex().captures_iter(text) {
        let Ok(n) = cap[1].parse::<usize>() else {
            continue;
        };
        if n == 0 || n > source_count {
            continue;
        }
        if seen.insert(n) {
            numbers.push(n);
        }
    }
    numbers
}

/// Resolve the markers in `text` against `sources`.
///
/// Works for answer sources (`SourceRecord`) and story sources
/// (`SearchResult`) alike.
pub fn resolve_citations<'a, T: AsRef<SourceRecord>>(
    text: &str,
    sources: &'a [T],
) -> ResolvedCitations<'a, T> {
    let numbers = citation_numbers(text, sources.len());
    if !numbers.is_empty() {
        let cited = numbers
            .into_iter()
            .map(|number| CitedSource { number, source: &sources[number - 1] })
            .collect();
        return ResolvedCitations { mode: CitationMode::Inline, cited };
    }

    debug!(sources = sources.len(), "No inline citations, falling back to top-scored sources");
    ResolvedCitations { mode: CitationMode::TopScored, cited: top_scored(sources, FALLBACK_LIMIT) }
}

/// The `limit` best sources by score, missing scores ranking as 0. Equal
/// scores keep their original order.
pub fn top_scored<T: AsRef<SourceRecord>>(sources: &[T], limit: usize) -> Vec<CitedSource<'_, T>> {
    let mut ranked: Vec<CitedSource<'_, T>> = sources
        .iter()
        .enumerate()
        .map(|(i, source)| CitedSource { number: i + 1, source })
        .collect();
    ranked.sort_by(|a, b| {
        b.source
            .as_ref()
            .rank_score()
            .total_cmp(&a.source.as_ref().rank_score())
    });
    ranked.truncate(limit);
    ranked
}

/// Short human label: `Title (2020), p. 4`. Unknown year or page (0) is
/// left out; an untitled source falls back to its path.
pub fn reference_label(source: &SourceRecord) -> String {
    let mut label = if source.title.is_empty() { source.path.clone() } else { source.title.clone() };
    if source.year > 0 {
        label.push_str(&format!(" ({})", source.year));
    }
    if source.page > 0 {
        label.push_str(&format!(", p. {}", source.page));
    }
    label
}
