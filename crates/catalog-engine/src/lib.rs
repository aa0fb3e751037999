//! Faceted browsing engine shared by every listing page.
//!
//! A [`BrowseEngine`] takes the records of one listing plus the user's view
//! parameters and produces the exact subset, grouping and page to render:
//!
//! - [`debounce`]: raw vs. committed search text, one cancellable commit
//! - [`filter`]: committed search AND every active facet
//! - [`partition`]: sorted groups with default-expanded flags
//! - [`pagination`]: page slicing, navigation and the page-button window
//! - [`facets`]: picker values derived from the whole collection
//! - [`store`]: the collection itself, with single-field updates
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use catalog_engine::{BrowseEngine, ViewStatus};
//! use catalog_model::{FacetSpec, FieldValue, ListingSchema, Record, RecordId};
//!
//! let schema = ListingSchema::new("hospitals")
//!     .with_search_fields(&["name"])
//!     .with_facet(FacetSpec::ascending("region"));
//! let records = vec![
//!     Record::new(RecordId::new("h1").unwrap())
//!         .with_field("name", "City General")
//!         .with_field("region", "North"),
//!     Record::new(RecordId::new("h2").unwrap())
//!         .with_field("name", "Harbour Clinic")
//!         .with_field("region", "South"),
//! ];
//! let mut engine = BrowseEngine::with_records(schema, records).unwrap();
//!
//! let start = Instant::now();
//! engine.on_keystroke("clinic", start);
//! engine.poll(start + Duration::from_millis(300));
//! engine.select_facet("region", Some(FieldValue::text("South"))).unwrap();
//!
//! let view = engine.view();
//! assert_eq!(view.status, ViewStatus::Ready);
//! assert_eq!(view.total_filtered, 1);
//! ```

pub mod debounce;
pub mod engine;
pub mod error;
pub mod facets;
pub mod filter;
pub mod pagination;
pub mod partition;
pub mod store;
pub mod view;

pub use debounce::{CommitTicket, SearchDebouncer};
pub use engine::{BrowseEngine, ViewMode};
pub use error::{CatalogError, Result};
pub use facets::{FacetIndex, FacetValues, distinct_values};
pub use filter::{FilteredSet, SearchQuery};
pub use pagination::{DEFAULT_PAGE_WINDOW, Paginator, page_window, total_pages};
pub use partition::{Partition, PartitionExpansion, UNPARTITIONED_KEY};
pub use store::CollectionStore;
pub use view::{BrowseView, PartitionView, ViewBody, ViewStatus};
