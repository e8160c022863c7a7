use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet interval before a search term is published.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Publishes a value only after input has been quiet for `delay`.
///
/// Holds at most one scheduled timer. Every `push` aborts the pending timer
/// and schedules a new one, so only the last value of a burst is published.
/// Subscribers observe published values through a `watch` channel.
pub struct Debouncer<T> {
    delay: Duration,
    tx: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            delay,
            tx: Arc::new(tx),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Last published value.
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Schedule `value` for publication after the quiet interval.
    /// Must be called from within a Tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_replace(value);
        }));
    }

    /// Publish `value` now, dropping anything still scheduled.
    pub fn flush(&mut self, value: T) {
        self.cancel();
        self.tx.send_replace(value);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn burst_publishes_only_final_value() {
        let mut debouncer = Debouncer::new(String::new(), SEARCH_DEBOUNCE);
        let mut rx = debouncer.subscribe();

        debouncer.push("r".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("re".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("rea".to_string());

        sleep(Duration::from_millis(299)).await;
        assert!(!rx.has_changed().unwrap());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "rea");

        sleep(Duration::from_secs(5)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(debouncer.current(), "rea");
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_inputs_each_publish() {
        let mut debouncer = Debouncer::new(0u32, Duration::from_millis(50));
        let mut rx = debouncer.subscribe();

        debouncer.push(1);
        sleep(Duration::from_millis(60)).await;
        assert_eq!(*rx.borrow_and_update(), 1);

        debouncer.push(2);
        sleep(Duration::from_millis(60)).await;
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_publishes_immediately_and_cancels_pending() {
        let mut debouncer = Debouncer::new(String::new(), SEARCH_DEBOUNCE);
        let mut rx = debouncer.subscribe();

        debouncer.push("draft".to_string());
        debouncer.flush("final".to_string());
        assert_eq!(*rx.borrow_and_update(), "final");
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_scheduled_value() {
        let mut debouncer = Debouncer::new(String::new(), SEARCH_DEBOUNCE);
        let rx = debouncer.subscribe();

        debouncer.push("typo".to_string());
        debouncer.cancel();
        sleep(Duration::from_secs(1)).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(debouncer.current(), "");
    }
}
