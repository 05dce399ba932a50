//! spacebio-common — Shared types, errors, and persistence used across all spacebio crates.

pub mod error;
pub mod entities;
pub mod store;
pub mod bookmarks;
pub mod session;

// Re-export commonly used types
pub use entities::{
    AnswerPayload, FacetKind, Facets, FrequencyEntry, FrequencyTable, LibraryPage, SearchResult,
    SourceRecord, Stats,
};
pub use error::{ClientError, Result};
pub use store::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};
