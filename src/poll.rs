//! Latest-wins request slots and interval pollers.
//!
//! Every fetch takes a [`RequestTicket`] from a [`TicketIssuer`] before it
//! starts. A [`LatestSlot`] only accepts the outcome carrying the most
//! recently issued ticket, so a slow response to an older request can never
//! overwrite a newer one.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Identifies one initiated request. Higher tickets were initiated later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Shared, monotonically increasing ticket counter.
#[derive(Debug, Clone, Default)]
pub struct TicketIssuer(Arc<AtomicU64>);

impl TicketIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a new request as initiated.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Ticket id of the most recently initiated request (0 if none).
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Holds the latest accepted result of one kind of request.
#[derive(Debug)]
pub struct LatestSlot<T> {
    issuer: TicketIssuer,
    committed: u64,
    value: Option<T>,
    error: Option<String>,
    updated_at: Option<Instant>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            issuer: TicketIssuer::new(),
            committed: 0,
            value: None,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issuer to hand to background fetchers feeding this slot.
    pub fn issuer(&self) -> TicketIssuer {
        self.issuer.clone()
    }

    pub fn begin(&self) -> RequestTicket {
        self.issuer.begin()
    }

    /// Store an outcome if `ticket` is the most recently initiated request.
    ///
    /// Returns `false` and leaves the slot untouched for stale tickets. An
    /// error keeps the last good value but marks it stale.
    pub fn commit<E: Display>(&mut self, ticket: RequestTicket, outcome: Result<T, E>) -> bool {
        if ticket.0 != self.issuer.latest() || ticket.0 <= self.committed {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issuer.latest(),
                "Dropping stale response"
            );
            return false;
        }
        self.committed = ticket.0;
        self.updated_at = Some(Instant::now());
        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Last good value, which may be stale.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Last good value only if the latest committed request succeeded.
    pub fn fresh(&self) -> Option<&T> {
        if self.error.is_some() {
            None
        } else {
            self.value.as_ref()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A value is present but the latest committed request failed.
    pub fn is_stale(&self) -> bool {
        self.value.is_some() && self.error.is_some()
    }

    /// A request has been initiated that has not been committed yet.
    pub fn is_loading(&self) -> bool {
        self.issuer.latest() > self.committed
    }

    pub fn updated_at(&self) -> Option<Instant> {
        self.updated_at
    }
}

/// Background task that runs a fetch on a fixed interval.
///
/// Results go to an mpsc channel. Stopping the poller (or dropping it)
/// cancels any in-flight request.
pub struct Poller {
    cancel: CancellationToken,
    wake: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn a poller. The first fetch runs immediately.
    ///
    /// `fetch` receives the ticket issued for that run and produces the
    /// message to send. The poller exits when cancelled or when the
    /// receiver is dropped.
    pub fn spawn<M, F, Fut>(
        period: Duration,
        issuer: TicketIssuer,
        tx: mpsc::Sender<M>,
        fetch: F,
    ) -> Self
    where
        M: Send + 'static,
        F: Fn(RequestTicket) -> Fut + Send + 'static,
        Fut: Future<Output = M> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let wake = Arc::new(Notify::new());

        let task_cancel = cancel.clone();
        let task_wake = wake.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                    _ = task_wake.notified() => {
                        ticker.reset();
                    }
                }

                let ticket = issuer.begin();
                tracing::debug!(ticket = ticket.0, "Polling");
                let message = tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    message = fetch(ticket) => message,
                };

                if tx.send(message).await.is_err() {
                    tracing::debug!("Poll receiver dropped, stopping");
                    break;
                }
            }
        });

        Self {
            cancel,
            wake,
            handle: Some(handle),
        }
    }

    /// Run the next fetch now instead of waiting for the interval.
    pub fn refresh(&self) {
        self.wake.notify_one();
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Poller task failed: {}", e);
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_ticket_committing_after_newer_is_dropped() {
        let mut slot: LatestSlot<u32> = LatestSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.commit::<String>(second, Ok(2)));
        assert!(!slot.commit::<String>(first, Ok(1)));
        assert_eq!(slot.value(), Some(&2));
    }

    #[test]
    fn test_superseded_ticket_is_dropped_even_if_first_to_arrive() {
        let mut slot: LatestSlot<u32> = LatestSlot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.commit::<String>(first, Ok(1)));
        assert!(slot.value().is_none());
        assert!(slot.is_loading());
    }

    #[test]
    fn test_stale_error_cannot_mask_fresh_data() {
        let mut slot: LatestSlot<u32> = LatestSlot::new();
        let old = slot.begin();
        let new = slot.begin();
        assert!(slot.commit::<String>(new, Ok(7)));
        assert!(!slot.commit(old, Err("connection reset")));
        assert_eq!(slot.fresh(), Some(&7));
        assert!(slot.error().is_none());
    }

    #[test]
    fn test_fresh_error_marks_value_stale() {
        let mut slot: LatestSlot<u32> = LatestSlot::new();
        let t = slot.begin();
        slot.commit::<String>(t, Ok(3));

        let t = slot.begin();
        assert!(slot.commit(t, Err("503 Service Unavailable")));
        assert!(slot.is_stale());
        assert_eq!(slot.value(), Some(&3));
        assert!(slot.fresh().is_none());
        assert_eq!(slot.error(), Some("503 Service Unavailable"));

        let t = slot.begin();
        slot.commit::<String>(t, Ok(4));
        assert!(!slot.is_stale());
        assert_eq!(slot.fresh(), Some(&4));
    }

    #[test]
    fn test_ticket_cannot_commit_twice() {
        let mut slot: LatestSlot<u32> = LatestSlot::new();
        let t = slot.begin();
        assert!(slot.commit::<String>(t, Ok(1)));
        assert!(!slot.commit::<String>(t, Ok(2)));
        assert_eq!(slot.value(), Some(&1));
    }

    #[tokio::test]
    async fn test_poller_sends_until_stopped() {
        let issuer = TicketIssuer::new();
        let (tx, mut rx) = mpsc::channel(8);
        let poller = Poller::spawn(Duration::from_millis(10), issuer.clone(), tx, |ticket| async move {
            ticket.id()
        });

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(rx.recv().await.unwrap());
        }
        assert_eq!(seen, vec![1, 2, 3]);

        poller.shutdown().await;
        // The sender is dropped with the task; drain whatever was buffered.
        while rx.recv().await.is_some() {}
    }

    #[tokio::test]
    async fn test_shutdown_drops_in_flight_request() {
        let (tx, mut rx) = mpsc::channel::<u64>(1);
        let poller = Poller::spawn(Duration::from_secs(60), TicketIssuer::new(), tx, |_| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            0
        });

        tokio::time::timeout(Duration::from_secs(5), poller.shutdown())
            .await
            .unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_runs_fetch_early() {
        let (tx, mut rx) = mpsc::channel(4);
        let poller = Poller::spawn(Duration::from_secs(3600), TicketIssuer::new(), tx, |ticket| async move {
            ticket.id()
        });

        assert_eq!(rx.recv().await, Some(1));
        poller.refresh();
        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(second, Some(2));
        poller.stop();
    }
}
