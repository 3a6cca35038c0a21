//! Listing query state and its URL query-string round-trip.
//!
//! The browse state is pure client/session state: it is reconstructible from
//! a URL alone, so bookmarked and shared links land on the same view. Parsing
//! is lenient — malformed values fall back to defaults — while serialization
//! omits default-valued fields to keep URLs minimal.

use serde::Serialize;
use url::form_urlencoded;

use crate::models::villa::{VillaStatus, VillaSummary};

/// The listings grid shows a fixed 9 cards per page.
pub const LISTING_PAGE_SIZE: i64 = 9;

/// Status facet of the browse filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(VillaStatus),
}

impl StatusFilter {
    /// URL parameter value; `None` when the filter is inactive.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status.as_str()),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        VillaStatus::parse(value).map(Self::Only)
    }
}

/// Sort order of the listings grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first (`created_at-desc`), the default.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    RoiDesc,
}

impl SortKey {
    /// URL parameter value, `field-direction` style.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Newest => "created_at-desc",
            Self::PriceAsc => "harga-asc",
            Self::PriceDesc => "harga-desc",
            Self::RoiDesc => "roi_perkiraan-desc",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at-desc" => Some(Self::Newest),
            "harga-asc" => Some(Self::PriceAsc),
            "harga-desc" => Some(Self::PriceDesc),
            "roi_perkiraan-desc" => Some(Self::RoiDesc),
            _ => None,
        }
    }

    /// ORDER BY clause fragment for the backing query.
    pub fn order_clause(&self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC",
            Self::PriceAsc => "harga ASC",
            Self::PriceDesc => "harga DESC",
            Self::RoiDesc => "roi_perkiraan DESC NULLS LAST",
        }
    }
}

/// Browse state for the listings grid.
///
/// Invariant: any change to `search_term`, `status`, or `sort` resets `page`
/// to 1 — a stale page combined with a new filter could point past the new
/// result count or skip unseen results.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub search_term: String,
    pub status: StatusFilter,
    pub sort: SortKey,
    pub page: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status: StatusFilter::All,
            sort: SortKey::Newest,
            page: 1,
        }
    }
}

impl ListingQuery {
    /// Parse browse state from a raw URL query string. Unknown parameters
    /// and malformed values degrade to the field defaults.
    pub fn from_query_str(query: &str) -> Self {
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => state.search_term = value.into_owned(),
                "status" => {
                    if let Some(filter) = StatusFilter::parse(&value) {
                        state.status = filter;
                    }
                }
                "sort" => {
                    if let Some(sort) = SortKey::parse(&value) {
                        state.sort = sort;
                    }
                }
                "page" => {
                    if let Ok(page) = value.parse::<i64>() {
                        if page >= 1 {
                            state.page = page;
                        }
                    }
                }
                _ => {}
            }
        }
        state
    }

    /// Serialize to a URL query string, omitting default-valued fields.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search_term.is_empty() {
            serializer.append_pair("search", &self.search_term);
        }
        if let Some(status) = self.status.as_param() {
            serializer.append_pair("status", status);
        }
        if self.sort != SortKey::Newest {
            serializer.append_pair("sort", self.sort.as_param());
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * LISTING_PAGE_SIZE
    }

    pub fn limit(&self) -> i64 {
        LISTING_PAGE_SIZE
    }

    /// Set the settled search term, resetting pagination when it changed.
    pub fn set_search_term(&mut self, term: &str) {
        if self.search_term != term {
            self.search_term = term.to_string();
            self.page = 1;
        }
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        if self.status != status {
            self.status = status;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    /// Page navigation alone never touches the other filter fields.
    pub fn set_page(&mut self, page: i64) {
        self.page = page.max(1);
    }

    pub fn reset_filters(&mut self) {
        *self = Self::default();
    }

    /// Whether any non-default filter is active (drives the filter badge).
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty()
            || self.status != StatusFilter::All
            || self.sort != SortKey::Newest
    }

    /// Request issued to the backing store for this state.
    pub fn to_request(&self) -> ListingRequest {
        ListingRequest {
            search_term: self.search_term.clone(),
            status: self.status,
            sort: self.sort,
            offset: self.offset(),
            limit: self.limit(),
        }
    }
}

/// One filtered, sorted, paginated read issued to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub search_term: String,
    pub status: StatusFilter,
    pub sort: SortKey,
    pub offset: i64,
    pub limit: i64,
}

/// Store response: one page of rows plus the filtered total.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    pub rows: Vec<VillaSummary>,
    pub total_count: i64,
}
