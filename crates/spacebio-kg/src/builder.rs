//! Star graph construction.

use serde::Serialize;
use spacebio_common::{FacetKind, FrequencyTable, SearchResult, Stats};
use tracing::debug;

use crate::counting::count_facet;
use crate::graph::{ConceptEdge, ConceptGraph, ConceptGroup, ConceptNode, Position, CENTER_ID};
use crate::layout::position;

pub const GENERIC_CENTER_LABEL: &str = "Space Biology";

/// Where the facet counts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphOrigin {
    LiveResults,
    CorpusStats,
}

impl GraphOrigin {
    /// Leaves kept per facet group.
    pub fn per_group(&self) -> usize {
        match self {
            GraphOrigin::LiveResults => 7,
            GraphOrigin::CorpusStats => 5,
        }
    }
}

/// Build from the live results when there are any, otherwise from corpus
/// stats. With neither, the graph is the center node alone.
pub fn build_concept_graph(
    query: Option<&str>,
    results: &[SearchResult],
    stats: Option<&Stats>,
) -> ConceptGraph {
    match stats {
        _ if !results.is_empty() => build_from_results(query, results),
        Some(stats) => build_from_stats(query, stats),
        None => assemble(query, GraphOrigin::CorpusStats, 0, |_| FrequencyTable::default()),
    }
}

pub fn build_from_results(query: Option<&str>, results: &[SearchResult]) -> ConceptGraph {
    assemble(query, GraphOrigin::LiveResults, results.len() as u64, |kind| count_facet(results, kind))
}

pub fn build_from_stats(query: Option<&str>, stats: &Stats) -> ConceptGraph {
    assemble(query, GraphOrigin::CorpusStats, stats.chunks, |kind| stats.table(kind).clone())
}

fn center_label(query: Option<&str>) -> String {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => format!("\"{q}\""),
        None => GENERIC_CENTER_LABEL.to_string(),
    }
}

fn assemble(
    query: Option<&str>,
    origin: GraphOrigin,
    center_weight: u64,
    table_for: impl Fn(FacetKind) -> FrequencyTable,
) -> ConceptGraph {
    let mut nodes = vec![ConceptNode {
        id: CENTER_ID.to_string(),
        label: center_label(query),
        group: ConceptGroup::Center,
        weight: center_weight,
        position: Position::default(),
    }];
    let mut edges = Vec::new();

    for kind in FacetKind::ALL {
        let group = ConceptGroup::from(kind);
        let table = table_for(kind);
        let top = table.top(origin.per_group());
        for (i, entry) in top.iter().enumerate() {
            let id = ConceptNode::leaf_id(group, &entry.label);
            edges.push(ConceptEdge::from_center(&id));
            nodes.push(ConceptNode {
                id,
                label: entry.label.clone(),
                group,
                weight: entry.count,
                position: position(group, i, top.len()),
            });
        }
    }

    debug!(?origin, nodes = nodes.len(), "Built concept graph");
    ConceptGraph { nodes, edges }
}
