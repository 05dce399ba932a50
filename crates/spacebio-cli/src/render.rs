//! Terminal output. With `--json` every command prints its normalised
//! record instead.

use serde::Serialize;
use spacebio_citations::{reference_label, resolve_citations, CitationMode};
use spacebio_common::bookmarks::BookmarkRecord;
use spacebio_common::entities::{AuthToken, MindMap, PingStatus, Story, Transcript, TtsAudio, VoiceList};
use spacebio_common::{AnswerPayload, FacetKind, FrequencyTable, LibraryPage, SearchResult, SourceRecord, Stats};
use spacebio_kg::{ConceptGraph, ConceptGroup, GraphOrigin};

const STATS_ROWS: usize = 8;

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn ping(&self, ping: &PingStatus) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(ping);
        }
        let index = if ping.index_loaded { "loaded" } else { "not loaded" };
        println!("{} (index {index}, {} vectors)", ping.status, ping.vectors);
        Ok(())
    }

    pub fn stats(&self, stats: &Stats) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(stats);
        }
        println!("{} chunks", stats.chunks);
        for kind in FacetKind::ALL {
            println!("\n{kind}s");
            print_table(stats.table(kind));
        }
        Ok(())
    }

    pub fn search_results(&self, results: &[SearchResult]) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(results);
        }
        if results.is_empty() {
            println!("No results.");
        }
        for (i, r) in results.iter().enumerate() {
            println!("{:>2}. {}", i + 1, reference_label(&r.source));
            println!("    {}", r.source.path);
            let facets = facet_line(&r.source);
            if !facets.is_empty() {
                println!("    {facets}");
            }
            println!("    {}", r.snippet.trim());
        }
        Ok(())
    }

    pub fn answer(&self, answer: &AnswerPayload, results: Option<&[SearchResult]>) -> anyhow::Result<()> {
        let resolved = resolve_citations(&answer.answer, &answer.sources);
        if self.json {
            #[derive(Serialize)]
            struct AnswerView<'a> {
                #[serde(flatten)]
                answer: &'a AnswerPayload,
                cited: Vec<usize>,
                citation_mode: CitationMode,
                #[serde(skip_serializing_if = "Option::is_none")]
                results: Option<&'a [SearchResult]>,
            }
            return self.print_json(&AnswerView {
                answer,
                cited: resolved.cited.iter().map(|c| c.number).collect(),
                citation_mode: resolved.mode,
                results,
            });
        }

        println!("{}\n", answer.answer.trim());
        let heading = match resolved.mode {
            CitationMode::Inline => "References",
            CitationMode::TopScored => "Top sources",
        };
        println!("{heading}:");
        for cited in &resolved.cited {
            println!("  [{}] {}", cited.number, reference_label(cited.source));
        }
        if let Some(url) = &answer.tts_audio_url {
            println!("\nAudio: {url}");
        }
        if let Some(results) = results {
            println!("\n{} raw passages cached; `spacebio bookmarks add` saves this answer.", results.len());
        }
        Ok(())
    }

    pub fn library(&self, page: &LibraryPage, page_count: Option<u32>) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(page);
        }
        let pages = page_count.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
        println!("Page {} of {pages} ({} entries)\n", page.page, page.total);
        self.search_results(&page.results)
    }

    pub fn graph(&self, graph: &ConceptGraph, origin: GraphOrigin) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(graph);
        }
        let source = match origin {
            GraphOrigin::LiveResults => "live results",
            GraphOrigin::CorpusStats => "corpus stats",
        };
        let center = graph.center().map(|c| c.label.as_str()).unwrap_or_default();
        println!("{center} (from {source})");
        for group in [ConceptGroup::Organism, ConceptGroup::Stressor, ConceptGroup::Platform] {
            let row: Vec<String> = graph.group(group).map(|n| format!("{} ({})", n.label, n.weight)).collect();
            if !row.is_empty() {
                println!("  {:<9} {}", group.as_str(), row.join(", "));
            }
        }
        Ok(())
    }

    pub fn mindmap(&self, map: &MindMap) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(map);
        }
        for node in &map.nodes {
            let support = map.support_by_node.get(&node.id).map_or(0, Vec::len);
            println!("{} [{}] weight {:.1}, {support} supporting passages", node.label, node.kind, node.weight);
        }
        for edge in &map.edges {
            println!("  {} --{}--> {}", edge.source, edge.relation, edge.target);
        }
        Ok(())
    }

    pub fn story(&self, story: &Story) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(story);
        }
        println!("{}\n", story.markdown.trim());
        let resolved = resolve_citations(&story.markdown, &story.sources);
        println!("Sources:");
        for cited in &resolved.cited {
            println!("  [{}] {}", cited.number, reference_label(&cited.source.source));
        }
        Ok(())
    }

    pub fn tts(&self, audio: &TtsAudio) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(audio);
        }
        println!("{}", audio.audio_url);
        Ok(())
    }

    pub fn voices(&self, voices: &VoiceList) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(voices);
        }
        for v in &voices.voices {
            println!("{v}");
        }
        Ok(())
    }

    pub fn transcript(&self, transcript: &Transcript) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(transcript);
        }
        println!("{}", transcript.text);
        Ok(())
    }

    pub fn token(&self, token: &AuthToken) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(token);
        }
        println!("{}", token.access_token);
        Ok(())
    }

    pub fn bookmarks(&self, bookmarks: &[BookmarkRecord]) -> anyhow::Result<()> {
        if self.json {
            return self.print_json(bookmarks);
        }
        if bookmarks.is_empty() {
            println!("No bookmarks.");
        }
        for b in bookmarks {
            let when = chrono::DateTime::from_timestamp_millis(b.timestamp)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!("{}  {when}  {} ({} sources)", b.id, b.question, b.source_count);
        }
        Ok(())
    }
}

fn print_table(table: &FrequencyTable) {
    if table.is_empty() {
        println!("  (none)");
    }
    for entry in table.top(STATS_ROWS) {
        println!("  {:<24} {:>6}", entry.label, entry.count);
    }
}

fn facet_line(source: &SourceRecord) -> String {
    FacetKind::ALL
        .iter()
        .filter_map(|k| source.facets.get(*k))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacebio_common::Facets;

    #[test]
    fn test_facet_line_skips_missing() {
        let source = SourceRecord {
            title: "t".into(),
            year: 0,
            page: 0,
            path: "p".into(),
            facets: Facets { organism: Some("Mouse".into()), stressor: None, platform: Some("ISS".into()) },
            score: None,
        };
        assert_eq!(facet_line(&source), "Mouse · ISS");
    }
}
