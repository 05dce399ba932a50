//! Transition handling and the stale-response guard.

use spacebio_common::{FacetKind, LibraryPage};
use tracing::debug;

use crate::state::{LibraryQueryState, SortField, SortOrder, MAX_PAGE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SetText(String),
    ClearText,
    SetFacet(FacetKind, String),
    ClearFacet(FacetKind),
    SetPageSize(u32),
    SetSort(Option<SortField>),
    SetOrder(SortOrder),
    GoToPage(u32),
    NextPage,
    PrevPage,
    /// Re-issue the current query unchanged.
    Refresh,
}

/// One backend query, tagged with its issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRequest {
    pub seq: u64,
    pub query: LibraryQueryState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    Applied,
    /// A newer request has been issued since this one.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct LibraryComposer {
    state: LibraryQueryState,
    issued: u64,
    /// Total for the current filter set, once a response has reported it.
    total: Option<u64>,
    current: Option<LibraryPage>,
}

impl LibraryComposer {
    pub fn new(page_size: u32) -> Self {
        Self { state: LibraryQueryState::new(page_size), ..Default::default() }
    }

    /// Start from a prepared query, e.g. one built from command-line flags.
    /// Nothing is issued until the first transition.
    pub fn with_state(mut state: LibraryQueryState) -> Self {
        state.page = state.page.max(1);
        state.page_size = state.page_size.clamp(1, MAX_PAGE_SIZE);
        Self { state, ..Default::default() }
    }

    pub fn state(&self) -> &LibraryQueryState {
        &self.state
    }

    pub fn current(&self) -> Option<&LibraryPage> {
        self.current.as_ref()
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// `ceil(total / page_size)`, at least 1. `None` until a total is known.
    pub fn page_count(&self) -> Option<u32> {
        let total = self.total?;
        let size = u64::from(self.state.page_size);
        let pages = total.div_ceil(size).max(1);
        Some(u32::try_from(pages).unwrap_or(u32::MAX))
    }

    /// Apply `transition` and return the single request it produces.
    pub fn apply(&mut self, transition: Transition) -> LibraryRequest {
        match transition {
            Transition::SetText(q) => {
                self.state.q = q;
                self.reset_filters_changed();
            }
            Transition::ClearText => {
                self.state.q.clear();
                self.reset_filters_changed();
            }
            Transition::SetFacet(kind, value) => {
                self.state.facets.set(kind, Some(value));
                self.reset_filters_changed();
            }
            Transition::ClearFacet(kind) => {
                self.state.facets.set(kind, None);
                self.reset_filters_changed();
            }
            Transition::SetPageSize(size) => {
                self.state.page_size = size.clamp(1, MAX_PAGE_SIZE);
                self.state.page = 1;
            }
            Transition::SetSort(sort) => {
                self.state.sort = sort;
                self.state.page = 1;
            }
            Transition::SetOrder(order) => {
                self.state.order = order;
                self.state.page = 1;
            }
            Transition::GoToPage(page) => self.state.page = self.clamp_page(page),
            Transition::NextPage => self.state.page = self.clamp_page(self.state.page.saturating_add(1)),
            Transition::PrevPage => self.state.page = self.clamp_page(self.state.page.saturating_sub(1)),
            Transition::Refresh => {}
        }

        self.issued += 1;
        debug!(seq = self.issued, page = self.state.page, "Issuing library query");
        LibraryRequest { seq: self.issued, query: self.state.clone() }
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Record a response. Only the most recently issued request is applied.
    pub fn accept(&mut self, seq: u64, page: LibraryPage) -> Accepted {
        if !self.is_latest(seq) {
            debug!(seq, latest = self.issued, "Discarding stale library response");
            return Accepted::Stale;
        }
        self.total = Some(page.total);
        self.current = Some(page);
        Accepted::Applied
    }

    fn reset_filters_changed(&mut self) {
        self.state.page = 1;
        self.total = None;
    }

    fn clamp_page(&self, page: u32) -> u32 {
        let upper = self.page_count().unwrap_or(u32::MAX);
        page.clamp(1, upper)
    }
}
