//! spacebio-kg — concept star graph built from ranked facet frequencies.
//! One center node for the query, one leaf per top facet value, laid out in
//! fixed horizontal bands without any physics simulation.

pub mod graph;
pub mod counting;
pub mod layout;
pub mod builder;

pub use builder::{build_concept_graph, build_from_results, build_from_stats, GraphOrigin};
pub use graph::{ConceptEdge, ConceptGraph, ConceptGroup, ConceptNode, Position, CENTER_ID};
