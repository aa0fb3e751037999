//! Async boundary of the catalog browser.
//!
//! The browsing engine itself is synchronous. This crate connects it to
//! the outside world:
//!
//! - `source/` - the [`RecordSource`] contract plus in-memory and JSON-file
//!   implementations
//! - `session.rs` - [`ListingSession`]: fetch/refresh with graceful
//!   degradation, optimistic field writes, debounced search on a Tokio timer
//! - `timer.rs` - [`SearchTimer`], one cancellable sleep per keystroke
//! - `error.rs` - [`SourceError`] with user-facing messages

mod error;
mod session;
pub mod source;
mod timer;

pub use error::{Result, SourceError};
pub use session::ListingSession;
pub use source::{JsonFileSource, MemorySource, RecordSource, load_records, save_records};
pub use timer::SearchTimer;
