//! Auto-advance timer.
//!
//! A [`Ticker`] owns a background interval task. Stopping or dropping the
//! ticker cancels the task, so no timer outlives the view that started it.
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct Ticker {
    rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
    period: Duration,
}

impl Ticker {
    /// Start ticking every `period` (first tick one period from now).
    /// Must be called inside a tokio runtime.
    pub fn start(period: Duration) -> Self {
        Self::start_with_token(period, CancellationToken::new())
    }

    /// Like [`Ticker::start`], but also stops when `parent` is cancelled.
    pub fn start_child(period: Duration, parent: &CancellationToken) -> Self {
        Self::start_with_token(period, parent.child_token())
    }

    fn start_with_token(period: Duration, cancel: CancellationToken) -> Self {
        let period = period.max(MIN_PERIOD);
        // One pending tick at most; a slow consumer sees ticks coalesce.
        let (tx, rx) = mpsc::channel(1);
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => match tx.try_send(()) {
                        Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                        Err(mpsc::error::TrySendError::Closed(())) => break,
                    },
                }
            }
            tracing::debug!(period_ms = period.as_millis() as u64, "ticker stopped");
        });

        Self { rx, cancel, period }
    }

    /// Wait for the next tick. Returns `None` once the ticker is stopped
    /// and any pending tick has been consumed.
    pub async fn tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    #[cfg(test)]
    fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
