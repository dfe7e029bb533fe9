use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::error::TimerError;

const TICK_BUFFER: usize = 8;

/// Periodic tick source for a countdown.
///
/// The spawned task only emits ticks; whoever owns the timer applies them.
/// The task is aborted on [`CountdownTimer::cancel`] and on drop, and exits by
/// itself once the receiving side is gone.
#[derive(Debug)]
pub struct CountdownTimer {
    task: JoinHandle<()>,
    ticks: mpsc::Receiver<()>,
}

impl CountdownTimer {
    /// Spawn a timer that ticks every `period`, first tick one period from now.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NoRuntime` when called outside a Tokio runtime.
    pub fn start(period: Duration) -> Result<Self, TimerError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        let (tx, ticks) = mpsc::channel(TICK_BUFFER);

        let task = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { task, ticks })
    }

    /// Waits for the next tick. `None` once the timer is cancelled.
    pub async fn next_tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Stops the timer. Ticks already buffered are discarded.
    pub fn cancel(&mut self) {
        self.task.abort();
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
    }

    /// Handle for observing or aborting the tick task independently.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
