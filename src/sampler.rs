//! Periodic sampling service
//!
//! Arming returns a handle; dropping the handle cancels the ticks.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::events::{AppEvent, EventSender, WatchId};

pub trait SamplingService {
    type Handle;

    /// Deliver a sample tick for `watch` every `every` until the handle drops
    fn arm(&self, watch: WatchId, every: Duration) -> Self::Handle;
}

/// Interval task on the tokio runtime, feeding the app event channel
#[derive(Clone)]
pub struct TokioSampler {
    runtime: tokio::runtime::Handle,
    tx: EventSender,
}

impl TokioSampler {
    pub fn new(runtime: tokio::runtime::Handle, tx: EventSender) -> Self {
        Self { runtime, tx }
    }
}

pub struct TickHandle {
    watch: WatchId,
    task: JoinHandle<()>,
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        trace!(watch = self.watch, "sampling cancelled");
        self.task.abort();
    }
}

impl SamplingService for TokioSampler {
    type Handle = TickHandle;

    fn arm(&self, watch: WatchId, every: Duration) -> TickHandle {
        trace!(watch, interval_ms = every.as_millis() as u64, "sampling armed");
        let tx = self.tx.clone();
        let task = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Sample(watch)).is_err() {
                    break;
                }
            }
        });
        TickHandle { watch, task }
    }
}
