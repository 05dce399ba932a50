//! Library query state and its wire form.

use serde::{Deserialize, Serialize};
use spacebio_common::{FacetKind, Facets};

/// The backend rejects larger pages.
pub const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Year,
    Path,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Year => "year",
            SortField::Path => "path",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryQueryState {
    pub q: String,
    #[serde(flatten)]
    pub facets: Facets,
    /// Always ≥ 1.
    pub page: u32,
    /// Always in `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    pub sort: Option<SortField>,
    pub order: SortOrder,
}

impl LibraryQueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            q: String::new(),
            facets: Facets::default(),
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
            order: SortOrder::default(),
        }
    }

    /// `/library` query parameters. Empty text and absent facets are left
    /// out so the backend applies no filter for them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let q = self.q.trim();
        if !q.is_empty() {
            pairs.push(("q", q.to_string()));
        }
        for kind in FacetKind::ALL {
            if let Some(value) = self.facets.get(kind) {
                pairs.push((kind.as_str(), value.to_string()));
            }
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("page_size", self.page_size.to_string()));
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs.push(("order", self.order.as_str().to_string()));
        pairs
    }
}

impl Default for LibraryQueryState {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_pairs_skip_empty_filters() {
        let mut s = LibraryQueryState::new(20);
        s.q = "  ".into();
        s.facets.set(FacetKind::Stressor, Some("Radiation".into()));
        let pairs = s.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("stressor", "Radiation".to_string()),
                ("page", "1".to_string()),
                ("page_size", "20".to_string()),
                ("order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_size_clamped_on_construction() {
        assert_eq!(LibraryQueryState::new(0).page_size, 1);
        assert_eq!(LibraryQueryState::new(5000).page_size, MAX_PAGE_SIZE);
    }
}
