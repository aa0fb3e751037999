//! A mounted listing: engine state plus the source it was fetched from.

use std::sync::Arc;
use std::time::Instant;

use catalog_engine::{BrowseEngine, BrowseView, CommitTicket};
use catalog_model::{FieldValue, ListingSchema, RecordId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

use crate::source::RecordSource;
use crate::timer::SearchTimer;

/// One listing page's session.
///
/// All engine operations are synchronous. The only awaits are the fetch in
/// [`ListingSession::refresh`] and waiting for a debounced search commit.
/// Field writes to the source run in the background and never undo the
/// local update.
pub struct ListingSession<S: RecordSource> {
    source: Arc<S>,
    engine: BrowseEngine,
    timer: SearchTimer,
    commits: mpsc::UnboundedReceiver<CommitTicket>,
}

impl<S: RecordSource> ListingSession<S> {
    pub fn new(schema: ListingSchema, source: S) -> catalog_engine::Result<Self> {
        Self::with_shared_source(schema, Arc::new(source))
    }

    pub fn with_shared_source(
        schema: ListingSchema,
        source: Arc<S>,
    ) -> catalog_engine::Result<Self> {
        let (timer, commits) = SearchTimer::new();
        Ok(Self {
            source,
            engine: BrowseEngine::new(schema)?,
            timer,
            commits,
        })
    }

    pub fn engine(&self) -> &BrowseEngine {
        &self.engine
    }

    /// Direct access for the synchronous view operations (facets, toggles,
    /// paging).
    pub fn engine_mut(&mut self) -> &mut BrowseEngine {
        &mut self.engine
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn view(&self) -> BrowseView<'_> {
        self.engine.view()
    }

    /// Fetch everything and replace the collection.
    ///
    /// A failed fetch settles into an empty collection. Returns the number
    /// of records loaded.
    pub async fn refresh(&mut self) -> usize {
        let span = info_span!("refresh", listing = %self.engine.schema().name);
        self.engine.begin_load();
        match self.source.fetch_all().instrument(span).await {
            Ok(records) => self.engine.finish_load(records),
            Err(error) => {
                warn!(%error, "fetch failed, showing an empty listing");
                self.engine.fail_load();
            }
        }
        self.engine.store().len()
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Record a keystroke and (re)start the debounce timer.
    pub fn on_keystroke(&mut self, raw: &str) {
        let ticket = self.engine.on_keystroke(raw, now());
        self.timer.schedule(ticket, self.engine.search().quiet());
    }

    /// Clear the search box, cancelling any pending commit.
    pub fn on_clear(&mut self) {
        self.timer.cancel();
        self.engine.on_clear();
    }

    /// Commit now instead of waiting for the timer.
    pub fn submit_search(&mut self) -> bool {
        self.timer.cancel();
        self.engine.flush_search()
    }

    /// Wait for the pending search commit, if any. Returns `true` once a
    /// commit has been applied, `false` when nothing was pending.
    ///
    /// A commit scheduled directly on the engine has no timer ticket; it is
    /// applied once its deadline passes.
    pub async fn settle_search(&mut self) -> bool {
        while let Some(deadline) = self.engine.search().deadline() {
            tokio::select! {
                fired = self.commits.recv() => {
                    if let Some(ticket) = fired
                        && self.engine.commit_ticket(ticket)
                    {
                        return true;
                    }
                }
                () = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {
                    if self.engine.poll(now()) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Apply any timer tickets that already fired. Returns how many of
    /// them committed.
    pub fn drain_commits(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(ticket) = self.commits.try_recv() {
            if self.engine.commit_ticket(ticket) {
                applied += 1;
            }
        }
        applied
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Increment a counter locally and write it to the source in the
    /// background.
    ///
    /// The returned handle resolves to whether the write succeeded; the
    /// local value is kept either way. Repeated calls each count once.
    pub fn increment(
        &mut self,
        id: &RecordId,
        field: &str,
    ) -> catalog_engine::Result<JoinHandle<bool>> {
        let value = self.engine.increment_field(id, field)?;
        Ok(self.write_through(id, field, FieldValue::Integer(value)))
    }

    /// Overwrite a field locally and write it to the source in the background.
    pub fn update(
        &mut self,
        id: &RecordId,
        field: &str,
        value: FieldValue,
    ) -> catalog_engine::Result<JoinHandle<bool>> {
        self.engine.set_field(id, field, value.clone())?;
        Ok(self.write_through(id, field, value))
    }

    fn write_through(&self, id: &RecordId, field: &str, value: FieldValue) -> JoinHandle<bool> {
        let source = Arc::clone(&self.source);
        let id = id.clone();
        let field = field.to_string();
        tokio::spawn(async move {
            match source.update_field(&id, &field, value).await {
                Ok(()) => {
                    debug!(%id, field = %field, "remote update applied");
                    true
                }
                Err(error) => {
                    warn!(%id, field = %field, %error, "remote update failed; keeping local value");
                    false
                }
            }
        })
    }
}

/// Current time on Tokio's clock, so paused test runtimes see the same
/// deadlines as the search timer.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
