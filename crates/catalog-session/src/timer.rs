//! Tokio timer driving debounced search commits.

use std::time::Duration;

use catalog_engine::CommitTicket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One cancellable sleep per keystroke.
///
/// Scheduling aborts the previous sleep, so at most one ticket is in flight.
/// Fired tickets arrive on the receiver returned by [`SearchTimer::new`].
/// Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct SearchTimer {
    handle: Option<JoinHandle<()>>,
    fired: mpsc::UnboundedSender<CommitTicket>,
}

impl SearchTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CommitTicket>) {
        let (fired, receiver) = mpsc::unbounded_channel();
        (
            Self {
                handle: None,
                fired,
            },
            receiver,
        )
    }

    /// Replace the running timer with one for `ticket`.
    pub fn schedule(&mut self, ticket: CommitTicket, delay: Duration) {
        self.cancel();
        let fired = self.fired.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver may be gone if the session was dropped.
            let _ = fired.send(ticket);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use catalog_engine::SearchDebouncer;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_schedule_fires() {
        let (mut timer, mut fired) = SearchTimer::new();
        let mut search = SearchDebouncer::default();
        let now = std::time::Instant::now();
        let delay = Duration::from_millis(300);

        let a = search.on_keystroke("a", now);
        timer.schedule(a, delay);
        let ab = search.on_keystroke("ab", now);
        timer.schedule(ab, delay);
        let abc = search.on_keystroke("abc", now);
        timer.schedule(abc, delay);

        let ticket = fired.recv().await.unwrap();
        assert_eq!(ticket, abc);
        assert_eq!(search.commit_ticket(ticket), Some("abc"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let (mut timer, mut fired) = SearchTimer::new();
        let ticket = SearchDebouncer::default().on_keystroke("x", std::time::Instant::now());
        timer.schedule(ticket, Duration::from_millis(300));
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fired.try_recv().is_err());
    }
}
