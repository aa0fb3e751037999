//! Debounced search input.
//!
//! The raw query follows every keystroke so the input box stays responsive.
//! The committed query, which drives filtering, only changes once the user
//! has stopped typing for the quiet interval.
//!
//! A keystroke schedules a commit and hands back a [`CommitTicket`]. Hosts
//! either poll with the current time or run a timer per ticket and report
//! it back through [`SearchDebouncer::commit_ticket`]. Each keystroke
//! replaces the pending ticket, so a timer that fires for an older one is
//! ignored: the last keystroke before the quiet interval always wins.

use std::time::{Duration, Instant};

use catalog_model::DebounceConfig;
use tracing::trace;

/// Identifies one scheduled commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitTicket(u64);

#[derive(Debug, Clone, Copy)]
struct PendingCommit {
    ticket: CommitTicket,
    deadline: Instant,
}

/// Raw/committed search text with at most one pending commit.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    raw: String,
    committed: String,
    pending: Option<PendingCommit>,
    next_ticket: u64,
    quiet: Duration,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl SearchDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            raw: String::new(),
            committed: String::new(),
            pending: None,
            next_ticket: 0,
            quiet: config.quiet(),
        }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending commit fires, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Record a keystroke: update the raw text now and reschedule the commit.
    pub fn on_keystroke(&mut self, raw: &str, now: Instant) -> CommitTicket {
        self.raw.clear();
        self.raw.push_str(raw);
        self.next_ticket += 1;
        let ticket = CommitTicket(self.next_ticket);
        self.pending = Some(PendingCommit {
            ticket,
            deadline: now + self.quiet,
        });
        trace!(ticket = ticket.0, "search commit scheduled");
        ticket
    }

    /// Commit if the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        match self.pending {
            Some(pending) if now >= pending.deadline => Some(self.commit()),
            _ => None,
        }
    }

    /// Commit on behalf of a timer. Stale tickets do nothing.
    pub fn commit_ticket(&mut self, ticket: CommitTicket) -> Option<&str> {
        match self.pending {
            Some(pending) if pending.ticket == ticket => Some(self.commit()),
            _ => {
                trace!(ticket = ticket.0, "ignoring stale search commit");
                None
            }
        }
    }

    /// Commit the pending text immediately, e.g. when Enter is pressed.
    pub fn flush(&mut self) -> Option<&str> {
        if self.pending.is_some() {
            Some(self.commit())
        } else {
            None
        }
    }

    /// Empty both texts and drop any pending commit.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.committed.clear();
        self.pending = None;
    }

    fn commit(&mut self) -> &str {
        self.pending = None;
        self.committed.clone_from(&self.raw);
        &self.committed
    }
}
