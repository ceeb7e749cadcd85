//! Cancellable periodic tasks on the tokio runtime.

use super::{ThinkingIndicator, TypingReveal};
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a running ticker. Cancelling is idempotent; dropping cancels.
#[derive(Debug)]
pub struct TickerHandle {
    handle: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True until cancelled or until the callback asked to stop
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl ThinkingIndicator for TickerHandle {
    fn stop(mut self) {
        self.cancel();
    }
}

/// Call `on_tick` every `period`, first call after one full period.
///
/// The ticker ends when the callback returns `ControlFlow::Break` or the
/// handle is cancelled.
pub fn spawn_ticker<F>(period: Duration, mut on_tick: F) -> TickerHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if on_tick().is_break() {
                break;
            }
        }
    });

    TickerHandle {
        handle: Some(handle),
    }
}

/// Play a typing reveal to completion, calling `render` with each new prefix
pub async fn play_typing<F>(mut reveal: TypingReveal, period: Duration, mut render: F)
where
    F: FnMut(&str),
{
    if reveal.is_done() {
        return;
    }
    let mut interval = interval_at(Instant::now() + period, period);
    while let Some(frame) = {
        interval.tick().await;
        reveal.tick()
    } {
        render(frame);
    }
}
