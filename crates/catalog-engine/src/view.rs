//! Read-only snapshot handed to the rendering layer.

use catalog_model::Record;
use serde::Serialize;

use crate::facets::FacetValues;

/// Which terminal or ready state the listing is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// The initial fetch has not settled yet.
    Loading,
    /// The collection is empty (including after a failed fetch).
    NoData,
    /// Records exist but none pass the current search and facets.
    NoMatches,
    Ready,
}

/// One group of a grouped view. Collapsed groups keep their count but
/// carry no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionView<'a> {
    pub key: String,
    pub expanded: bool,
    pub count: usize,
    pub records: Vec<&'a Record>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewBody<'a> {
    /// Records of the current page.
    Flat { records: Vec<&'a Record> },
    /// Every partition of the filtered set; no paging.
    Grouped { partitions: Vec<PartitionView<'a>> },
}

impl ViewBody<'_> {
    /// Number of records actually shown.
    pub fn visible_count(&self) -> usize {
        match self {
            Self::Flat { records } => records.len(),
            Self::Grouped { partitions } => partitions.iter().map(|p| p.records.len()).sum(),
        }
    }
}

/// Everything a listing page needs to render, consistent as of the last
/// recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowseView<'a> {
    pub listing: &'a str,
    pub status: ViewStatus,
    pub body: ViewBody<'a>,
    pub total_filtered: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_buttons: Vec<usize>,
    pub facets: &'a [FacetValues],
    pub raw_query: &'a str,
    pub committed_query: &'a str,
    /// Search text or a facet is active, so "clear all" should be offered.
    pub has_constraints: bool,
}
