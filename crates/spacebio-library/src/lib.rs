//! spacebio-library — paged, filterable corpus browsing.
//!
//! `LibraryComposer` is a synchronous state machine: every `Transition`
//! mutates the query state and yields exactly one `LibraryRequest`. Responses
//! come back tagged with the request's sequence number and anything older
//! than the most recently issued request is discarded.

pub mod state;
pub mod composer;
pub mod browser;

pub use browser::{BrowseOutcome, LibraryBrowser, LibrarySource};
pub use composer::{Accepted, LibraryComposer, LibraryRequest, Transition};
pub use state::{LibraryQueryState, SortField, SortOrder, MAX_PAGE_SIZE};
