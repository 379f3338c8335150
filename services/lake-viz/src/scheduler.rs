//! Fixed-rate repeating task with explicit cancellation.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What the task body wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Runs a closure every `period` until cancelled or the closure asks to stop.
///
/// The first tick fires immediately. Ticks never overlap: a slow tick delays
/// the next one instead of queueing a burst. Once [`cancel`](Self::cancel)
/// returns no further tick starts.
pub struct RepeatingTask {
    token: CancellationToken,
    handle: Option<JoinHandle<u64>>,
}

impl RepeatingTask {
    pub fn spawn<F>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut(u64) -> TickControl + Send + 'static,
    {
        Self::spawn_async(name, period, move |n| {
            let control = tick(n);
            async move { control }
        })
    }

    /// Like [`spawn`](Self::spawn) with an async body.
    pub fn spawn_async<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut(u64) -> Fut + Send + 'static,
        Fut: Future<Output = TickControl> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut count = 0u64;

            info!(task = name, period_ms = period.as_millis() as u64, "Repeating task started");
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = timer.tick() => {}
                }
                if child.is_cancelled() {
                    break;
                }
                let control = tick(count).await;
                count += 1;
                if control == TickControl::Stop {
                    debug!(task = name, ticks = count, "Repeating task finished");
                    break;
                }
            }
            info!(task = name, ticks = count, "Repeating task stopped");
            count
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Token that cancels this task; can be handed to signal handlers.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the task to end and return how many ticks ran.
    pub async fn join(mut self) -> u64 {
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or(0),
            None => 0,
        }
    }

    /// Cancel, then wait for the task to end.
    pub async fn stop(self) -> u64 {
        self.cancel();
        self.join().await
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_fixed_rate() {
        let seen = Arc::new(AtomicU64::new(0));
        let counter = seen.clone();
        let task = RepeatingTask::spawn("test", Duration::from_millis(50), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });

        // ticks at 0, 50, 100, 150, 200
        tokio::time::sleep(Duration::from_millis(220)).await;
        let ran = task.stop().await;
        assert_eq!(ran, 5);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_cancel() {
        let seen = Arc::new(AtomicU64::new(0));
        let counter = seen.clone();
        let task = RepeatingTask::spawn("test", Duration::from_millis(10), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        task.cancel();
        let at_cancel = seen.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(seen.load(Ordering::SeqCst), at_cancel);
        assert_eq!(task.join().await, at_cancel);
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_can_stop() {
        let task = RepeatingTask::spawn("test", Duration::from_millis(10), |n| {
            if n == 2 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });
        assert_eq!(task.join().await, 3);
    }
}
