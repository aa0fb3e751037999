//! The browsing engine for one listing.
//!
//! Owns the collection store and every piece of view state (search text,
//! facet selection, expansion flags, page). Derived data is rebuilt from
//! scratch whenever an input it depends on changes:
//!
//! | Change                         | Facet index | Filtered set | Page        |
//! |--------------------------------|-------------|--------------|-------------|
//! | load / refresh                 | rebuilt     | recomputed   | clamped     |
//! | field update                   | if facet    | recomputed   | clamped     |
//! | search commit / clear          | -           | recomputed   | reset to 1  |
//! | facet change                   | -           | recomputed   | reset to 1  |
//! | view mode change               | -           | -            | reset to 1  |
//! | partition toggles              | -           | -            | -           |

use std::time::Instant;

use catalog_model::{FacetSelection, FieldValue, ListingSchema, Record, RecordId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::debounce::{CommitTicket, SearchDebouncer};
use crate::error::{CatalogError, Result};
use crate::facets::FacetIndex;
use crate::filter::{self, FilteredSet};
use crate::pagination::{DEFAULT_PAGE_WINDOW, Paginator};
use crate::partition::{self, PartitionExpansion};
use crate::store::CollectionStore;
use crate::view::{BrowseView, PartitionView, ViewBody, ViewStatus};

/// How filtered records are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One page at a time.
    #[default]
    Flat,
    /// All records, split into partitions; paging is bypassed.
    Grouped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Loading,
    Loaded,
}

/// Faceted browsing state machine for a single listing.
#[derive(Debug, Clone)]
pub struct BrowseEngine {
    schema: ListingSchema,
    store: CollectionStore,
    facet_index: FacetIndex,
    search: SearchDebouncer,
    selection: FacetSelection,
    expansion: PartitionExpansion,
    paginator: Paginator,
    mode: ViewMode,
    load: LoadState,
    page_window: usize,
    filtered: FilteredSet,
}

impl BrowseEngine {
    /// Mount a listing. The engine starts in the loading state; grouped
    /// listings start in grouped mode.
    pub fn new(schema: ListingSchema) -> Result<Self> {
        schema.validate()?;
        let mode = if schema.is_partitioned() {
            ViewMode::Grouped
        } else {
            ViewMode::Flat
        };
        Ok(Self {
            search: SearchDebouncer::new(schema.debounce),
            paginator: Paginator::new(schema.page_size),
            store: CollectionStore::new(),
            facet_index: FacetIndex::build(&[], &schema),
            selection: FacetSelection::new(),
            expansion: PartitionExpansion::new(),
            mode,
            load: LoadState::Loading,
            page_window: DEFAULT_PAGE_WINDOW,
            filtered: FilteredSet::default(),
            schema,
        })
    }

    /// Mount a listing with records already at hand.
    pub fn with_records(schema: ListingSchema, records: Vec<Record>) -> Result<Self> {
        let mut engine = Self::new(schema)?;
        engine.finish_load(records);
        Ok(engine)
    }

    #[must_use]
    pub fn with_page_window(mut self, max_buttons: usize) -> Self {
        self.page_window = max_buttons;
        self
    }

    pub fn schema(&self) -> &ListingSchema {
        &self.schema
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn facet_index(&self) -> &FacetIndex {
        &self.facet_index
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn expansion(&self) -> &PartitionExpansion {
        &self.expansion
    }

    pub fn search(&self) -> &SearchDebouncer {
        &self.search
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn current_page(&self) -> usize {
        match self.mode {
            ViewMode::Flat => self.paginator.current_page(),
            ViewMode::Grouped => 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        match self.mode {
            ViewMode::Flat => self.paginator.total_pages(self.filtered.len()),
            ViewMode::Grouped => 1,
        }
    }

    pub fn filtered(&self) -> &FilteredSet {
        &self.filtered
    }

    pub fn filtered_records(&self) -> impl Iterator<Item = &Record> {
        self.filtered.records(self.store.records())
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// A refresh has started; the view shows the loading state until it
    /// settles.
    pub fn begin_load(&mut self) {
        self.load = LoadState::Loading;
    }

    /// Replace the collection with a fresh snapshot.
    pub fn finish_load(&mut self, records: Vec<Record>) {
        self.store.replace(records);
        self.load = LoadState::Loaded;
        self.rebuild_facets();
        self.recompute(false);
        info!(
            listing = %self.schema.name,
            records = self.store.len(),
            "collection loaded"
        );
    }

    /// The fetch failed: settle into an empty collection.
    pub fn fail_load(&mut self) {
        self.finish_load(Vec::new());
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Update the raw query and schedule its commit.
    pub fn on_keystroke(&mut self, raw: &str, now: Instant) -> CommitTicket {
        self.search.on_keystroke(raw, now)
    }

    /// Commit the query if its quiet interval has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let committed = self.search.poll(now).is_some();
        if committed {
            self.after_commit();
        }
        committed
    }

    /// Commit on behalf of a timer; stale tickets are ignored.
    pub fn commit_ticket(&mut self, ticket: CommitTicket) -> bool {
        let committed = self.search.commit_ticket(ticket).is_some();
        if committed {
            self.after_commit();
        }
        committed
    }

    /// Commit the pending query without waiting.
    pub fn flush_search(&mut self) -> bool {
        let committed = self.search.flush().is_some();
        if committed {
            self.after_commit();
        }
        committed
    }

    /// Empty the search box immediately.
    pub fn on_clear(&mut self) {
        self.search.clear();
        self.recompute(true);
    }

    fn after_commit(&mut self) {
        debug!(query = self.search.committed(), "search committed");
        self.recompute(true);
    }

    // ------------------------------------------------------------------
    // Facets
    // ------------------------------------------------------------------

    /// Select a facet value, or unset the facet with `None`.
    pub fn select_facet(&mut self, facet: &str, value: Option<FieldValue>) -> Result<bool> {
        if self.schema.facet(facet).is_none() {
            return Err(CatalogError::UnknownFacet(facet.to_string()));
        }
        let changed = self.selection.set(facet, value);
        if changed {
            self.recompute(true);
        }
        Ok(changed)
    }

    pub fn clear_facet(&mut self, facet: &str) -> Result<bool> {
        self.select_facet(facet, None)
    }

    /// Drop the search text and every facet.
    pub fn clear_all(&mut self) {
        self.search.clear();
        self.selection.clear();
        self.recompute(true);
    }

    pub fn has_constraints(&self) -> bool {
        !self.search.raw().is_empty()
            || !self.search.committed().is_empty()
            || !self.selection.is_empty()
    }

    // ------------------------------------------------------------------
    // Grouping
    // ------------------------------------------------------------------

    /// Switch layout. Grouped mode needs a partition field.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> bool {
        if mode == self.mode || (mode == ViewMode::Grouped && !self.schema.is_partitioned()) {
            return false;
        }
        self.mode = mode;
        self.paginator.reset();
        true
    }

    /// Flip one partition; returns its new state.
    pub fn toggle_partition(&mut self, key: &str) -> bool {
        self.expansion.toggle(key)
    }

    /// Collapse or expand every partition currently shown.
    pub fn toggle_all(&mut self) -> Option<bool> {
        let field = self.schema.partition_field.as_deref()?;
        let groups = partition::group(self.store.records(), &self.filtered, field);
        if groups.is_empty() {
            return None;
        }
        Some(
            self.expansion
                .toggle_all(groups.iter().map(|g| g.key.as_str())),
        )
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    pub fn next_page(&mut self) -> bool {
        self.mode == ViewMode::Flat && self.paginator.next(self.filtered.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.mode == ViewMode::Flat && self.paginator.prev(self.filtered.len())
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.mode == ViewMode::Flat && self.paginator.go_to(page, self.filtered.len())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Optimistically add one to a counter field; returns the new value.
    pub fn increment_field(&mut self, id: &RecordId, field: &str) -> Result<i64> {
        let value = self.store.increment(id, field)?;
        self.after_mutation(field);
        Ok(value)
    }

    /// Optimistically overwrite one field.
    pub fn set_field(&mut self, id: &RecordId, field: &str, value: FieldValue) -> Result<()> {
        self.store.set_field(id, field, value)?;
        self.after_mutation(field);
        Ok(())
    }

    fn after_mutation(&mut self, field: &str) {
        if self.schema.facet(field).is_some() {
            self.rebuild_facets();
        }
        self.recompute(false);
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    fn rebuild_facets(&mut self) {
        self.facet_index = FacetIndex::build(self.store.records(), &self.schema);
    }

    fn recompute(&mut self, reset_page: bool) {
        self.filtered = filter::compute(
            self.store.records(),
            &self.schema,
            self.search.committed(),
            &self.selection,
        );
        if reset_page {
            self.paginator.reset();
        }
        self.paginator.clamp(self.filtered.len());
        debug!(
            listing = %self.schema.name,
            filtered = self.filtered.len(),
            page = self.paginator.current_page(),
            "filtered set recomputed"
        );
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> BrowseView<'_> {
        let records = self.store.records();
        let status = if self.is_loading() {
            ViewStatus::Loading
        } else if self.store.is_empty() {
            ViewStatus::NoData
        } else if self.filtered.is_empty() {
            ViewStatus::NoMatches
        } else {
            ViewStatus::Ready
        };

        let body = match (self.mode, self.schema.partition_field.as_deref()) {
            (ViewMode::Grouped, Some(field)) if !self.is_loading() => {
                let groups = partition::group(records, &self.filtered, field);
                let partitions = groups
                    .into_iter()
                    .map(|group| {
                        let expanded = self.expansion.is_expanded(&group.key);
                        PartitionView {
                            key: group.key,
                            expanded,
                            count: group.indices.len(),
                            records: if expanded {
                                group.indices.iter().map(|&i| &records[i]).collect()
                            } else {
                                Vec::new()
                            },
                        }
                    })
                    .collect();
                ViewBody::Grouped { partitions }
            }
            _ if self.is_loading() => ViewBody::Flat {
                records: Vec::new(),
            },
            _ => {
                let page = self.paginator.paginate(self.filtered.indices());
                ViewBody::Flat {
                    records: page.iter().map(|&i| &records[i]).collect(),
                }
            }
        };

        // While loading, the previous snapshot's counts are not shown.
        let (total_filtered, current_page, total_pages, page_buttons) = if self.is_loading() {
            (0, 1, 1, Vec::new())
        } else {
            let page_buttons = match self.mode {
                ViewMode::Flat => self.paginator.window(self.filtered.len(), self.page_window),
                ViewMode::Grouped => Vec::new(),
            };
            (
                self.filtered.len(),
                self.current_page(),
                self.total_pages(),
                page_buttons,
            )
        };

        BrowseView {
            listing: &self.schema.name,
            status,
            body,
            total_filtered,
            current_page,
            total_pages,
            page_buttons,
            facets: self.facet_index.facets(),
            raw_query: self.search.raw(),
            committed_query: self.search.committed(),
            has_constraints: self.has_constraints(),
        }
    }
}
