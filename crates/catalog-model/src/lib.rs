//! Data model shared by the catalog browser crates.

pub mod error;
pub mod ids;
pub mod record;
pub mod schema;
pub mod selection;
pub mod value;

pub use error::{ModelError, Result};
pub use ids::RecordId;
pub use record::{RESERVED_FIELDS, Record, check_field_name};
pub use schema::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE, DebounceConfig, FacetOrder, FacetSpec, ListingSchema,
    PRESET_NAMES,
};
pub use selection::FacetSelection;
pub use value::FieldValue;
