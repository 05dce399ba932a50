//! spacebio-client — HTTP gateway and typed API for the knowledge-base
//! backend, plus the multi-call workflows the CLI drives.

pub mod gateway;
pub mod api;
pub mod workflow;

pub use api::{KnowledgeClient, MindMapRequest, StoryRequest};
pub use gateway::{CallOptions, Gateway};
pub use workflow::{ask_with_results, concept_graph_for, AskOutcome};
