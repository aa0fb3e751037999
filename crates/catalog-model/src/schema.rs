//! Listing schemas: which record fields a listing searches, filters and
//! groups by.
//!
//! Every listing page (exam papers, hospitals, skilled workers, ...) runs
//! the same browsing engine; the schema is the only thing that differs.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::check_field_name;

/// Default number of records on a flat page.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Default quiet interval before a typed query is committed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Names of the built-in listing presets.
pub const PRESET_NAMES: [&str; 5] = [
    "exam-papers",
    "scholarships",
    "skilled-workers",
    "hospitals",
    "institutions",
];

/// Sort order of a facet's value picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetOrder {
    #[default]
    Ascending,
    /// Most recent first, used for year pickers.
    Descending,
}

/// A filterable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSpec {
    pub field: String,
    #[serde(default)]
    pub order: FacetOrder,
}

impl FacetSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: FacetOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: FacetOrder::Descending,
        }
    }
}

/// Configuration for search debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet interval in milliseconds.
    ///
    /// Each keystroke restarts the interval; the query is committed once it
    /// elapses without further input.
    pub quiet_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DebounceConfig {
    pub fn quiet(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Describes one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSchema {
    pub name: String,
    /// Free-text fields matched by the search box.
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Exact-match filter fields, in picker display order.
    #[serde(default)]
    pub facets: Vec<FacetSpec>,
    /// Field used to split results into groups.
    #[serde(default)]
    pub partition_field: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub debounce: DebounceConfig,
}

impl ListingSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_fields: Vec::new(),
            facets: Vec::new(),
            partition_field: None,
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DebounceConfig::default(),
        }
    }

    #[must_use]
    pub fn with_search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| (*f).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_facet(mut self, facet: FacetSpec) -> Self {
        self.facets.push(facet);
        self
    }

    #[must_use]
    pub fn with_partition_field(mut self, field: impl Into<String>) -> Self {
        self.partition_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn facet(&self, field: &str) -> Option<&FacetSpec> {
        self.facets.iter().find(|f| f.field == field)
    }

    pub fn is_partitioned(&self) -> bool {
        self.partition_field.is_some()
    }

    /// Reject schemas the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ModelError::ZeroPageSize);
        }
        let mut seen = BTreeSet::new();
        for facet in &self.facets {
            check_field_name(&facet.field)?;
            if !seen.insert(facet.field.as_str()) {
                return Err(ModelError::DuplicateFacet(facet.field.clone()));
            }
        }
        for field in &self.search_fields {
            check_field_name(field)?;
        }
        if let Some(field) = &self.partition_field {
            check_field_name(field)?;
        }
        Ok(())
    }

    /// Built-in schema for one of the application's listing pages.
    pub fn preset(name: &str) -> Result<Self> {
        let schema = match name {
            "exam-papers" => Self::new(name)
                .with_search_fields(&["title", "course_code", "university"])
                .with_facet(FacetSpec::ascending("university"))
                .with_facet(FacetSpec::ascending("faculty"))
                .with_facet(FacetSpec::descending("year"))
                .with_facet(FacetSpec::ascending("semester"))
                .with_partition_field("level"),
            "scholarships" => Self::new(name)
                .with_search_fields(&["title", "provider", "description"])
                .with_facet(FacetSpec::ascending("country"))
                .with_facet(FacetSpec::ascending("level"))
                .with_partition_field("provider"),
            "skilled-workers" => Self::new(name)
                .with_search_fields(&["name", "skill", "description"])
                .with_facet(FacetSpec::ascending("category"))
                .with_facet(FacetSpec::ascending("region")),
            "hospitals" => Self::new(name)
                .with_search_fields(&["name", "address", "specialties"])
                .with_facet(FacetSpec::ascending("region"))
                .with_facet(FacetSpec::ascending("category")),
            "institutions" => Self::new(name)
                .with_search_fields(&["name", "city"])
                .with_facet(FacetSpec::ascending("country"))
                .with_facet(FacetSpec::ascending("kind"))
                .with_partition_field("institution"),
            other => return Err(ModelError::UnknownPreset(other.to_string())),
        };
        Ok(schema)
    }
}
