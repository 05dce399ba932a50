//! spacebio-normalise — the single place where loosely-shaped backend JSON
//! becomes the stable records in `spacebio-common`.
//!
//! Nothing here returns an error: missing or malformed fields degrade to
//! defaults (numbers to 0, strings to empty, lists to empty).

pub mod numeric;
pub mod frequency;
pub mod records;
pub mod stats;
pub mod auxiliary;

pub use auxiliary::{
    normalize_mindmap, normalize_ping, normalize_story, normalize_token, normalize_transcript,
    normalize_tts, normalize_voices,
};
pub use frequency::normalize_frequency_table;
pub use records::{
    normalize_answer, normalize_facets, normalize_library_page, normalize_search_item,
    normalize_search_results, normalize_source,
};
pub use stats::normalize_stats;
