//! Graph types.

use serde::Serialize;
use spacebio_common::FacetKind;

pub const CENTER_ID: &str = "center";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptGroup {
    Center,
    Organism,
    Stressor,
    Platform,
}

impl ConceptGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptGroup::Center => "center",
            ConceptGroup::Organism => "organism",
            ConceptGroup::Stressor => "stressor",
            ConceptGroup::Platform => "platform",
        }
    }
}

impl From<FacetKind> for ConceptGroup {
    fn from(kind: FacetKind) -> Self {
        match kind {
            FacetKind::Organism => ConceptGroup::Organism,
            FacetKind::Stressor => ConceptGroup::Stressor,
            FacetKind::Platform => ConceptGroup::Platform,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptNode {
    /// `"center"` or `"<group>-<label>"`.
    pub id: String,
    pub label: String,
    pub group: ConceptGroup,
    pub weight: u64,
    pub position: Position,
}

impl ConceptNode {
    pub fn leaf_id(group: ConceptGroup, label: &str) -> String {
        format!("{}-{}", group.as_str(), label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl ConceptEdge {
    pub(crate) fn from_center(target: &str) -> Self {
        Self {
            id: format!("{CENTER_ID}->{target}"),
            source: CENTER_ID.to_string(),
            target: target.to_string(),
        }
    }
}

/// A depth-1 tree: every edge runs from the center node to a leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptGraph {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
}

impl ConceptGraph {
    pub fn center(&self) -> Option<&ConceptNode> {
        self.node(CENTER_ID)
    }

    pub fn node(&self, id: &str) -> Option<&ConceptNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn group(&self, group: ConceptGroup) -> impl Iterator<Item = &ConceptNode> {
        self.nodes.iter().filter(move |n| n.group == group)
    }

    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &ConceptEdge> {
        let id = id.to_string();
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.group != ConceptGroup::Center).count()
    }
}
