//! Facet frequency counting over a live result set.

use std::collections::HashMap;

use spacebio_common::{FacetKind, FrequencyEntry, FrequencyTable, SearchResult};

/// Count non-empty values of `kind` across `results`. Labels keep the order
/// in which they first appeared, so equal counts rank by first appearance.
pub fn count_facet(results: &[SearchResult], kind: FacetKind) -> FrequencyTable {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();

    for value in results.iter().filter_map(|r| r.source.facets.get(kind)) {
        match positions.get(value) {
            Some(&i) => entries[i].count += 1,
            None => {
                positions.insert(value, entries.len());
                entries.push(FrequencyEntry { label: value.to_string(), count: 1 });
            }
        }
    }

    FrequencyTable::from_unranked(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacebio_common::{Facets, SourceRecord};

    fn with_organism(organism: Option<&str>) -> SearchResult {
        SearchResult {
            source: SourceRecord {
                title: String::new(),
                year: 0,
                page: 0,
                path: String::new(),
                facets: Facets { organism: organism.map(String::from), ..Default::default() },
                score: None,
            },
            snippet: String::new(),
        }
    }

    #[test]
    fn test_counts_rank_by_count_then_first_seen() {
        let results: Vec<SearchResult> = ["Fly", "Rat", "Rat", "Fly", "Mouse", "Mouse", "Mouse"]
            .into_iter()
            .map(|o| with_organism(Some(o)))
            .collect();
        let t = count_facet(&results, FacetKind::Organism);
        let labels: Vec<&str> = t.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Mouse", "Fly", "Rat"]);
    }

    #[test]
    fn test_skips_missing_and_empty_values() {
        let results = vec![with_organism(None), with_organism(Some("")), with_organism(Some("Mouse"))];
        let t = count_facet(&results, FacetKind::Organism);
        assert_eq!(t.len(), 1);
        assert!(count_facet(&results, FacetKind::Platform).is_empty());
    }
}
