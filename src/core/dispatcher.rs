use crate::core::tracker::UnitTracker;
use crate::domain::model::{DispatchReport, DrainOutcome, Line};
use crate::domain::ports::{ConfigProvider, LineProcessor, LineSource};
use crate::utils::error::{DispatchError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// `None` keeps the unbounded fan-out. `Some(n)` gates unit start on a
    /// semaphore with `n` permits, which also stalls reading while full.
    pub max_concurrency: Option<usize>,
}

impl DispatchOptions {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: Some(max_concurrency),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            max_concurrency: config.max_concurrency(),
        }
    }
}

/// Reads lines from a source and starts one OS thread per line.
///
/// Units never run on the tokio runtime, so a reader backed by the runtime's
/// blocking pool (stdin, files) is never queued behind them. In the default
/// unbounded mode nothing limits how many units are live at once: a source
/// that outpaces the processor grows the number of threads without limit.
/// `run` returns at end-of-stream without waiting for any unit; use
/// [`Dispatcher::drain`] when in-flight work must finish.
pub struct Dispatcher<S, P: ?Sized> {
    source: S,
    processor: Arc<P>,
    tracker: UnitTracker,
    limiter: Option<Arc<Semaphore>>,
}

impl<S, P> Dispatcher<S, P>
where
    S: LineSource,
    P: LineProcessor + ?Sized,
{
    pub fn new(source: S, processor: Arc<P>, options: DispatchOptions) -> Self {
        let limiter = options
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits)));

        Self {
            source,
            processor,
            tracker: UnitTracker::new(),
            limiter,
        }
    }

    /// Handle on the unit counters, usable after the dispatcher is gone.
    pub fn tracker(&self) -> UnitTracker {
        self.tracker.clone()
    }

    pub fn is_bounded(&self) -> bool {
        self.limiter.is_some()
    }

    pub async fn run(&mut self) -> Result<DispatchReport> {
        let mut lines_dispatched = 0u64;

        loop {
            let line = match self.source.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(
                        "Input failed after {} dispatched lines: {}",
                        lines_dispatched,
                        e
                    );
                    return Err(e);
                }
            };

            let permit = self.admit(line.index()).await?;
            self.start_unit(line, permit)?;
            lines_dispatched += 1;
        }

        let report = DispatchReport {
            lines_dispatched,
            live_at_return: self.tracker.live(),
        };
        tracing::debug!(
            "Dispatch loop finished: {} lines, {} units still live",
            report.lines_dispatched,
            report.live_at_return
        );
        Ok(report)
    }

    /// Waits until no unit is live, or until `timeout` elapses.
    pub async fn drain(&self, timeout: Option<Duration>) -> DrainOutcome {
        drain_tracker(&self.tracker, timeout).await
    }

    async fn admit(&self, index: u64) -> Result<Option<OwnedSemaphorePermit>> {
        let Some(limiter) = &self.limiter else {
            return Ok(None);
        };

        // limiter 只存在於 Dispatcher 內且從不 close，acquire 不會失敗
        let permit = Arc::clone(limiter)
            .acquire_owned()
            .await
            .map_err(|e| DispatchError::Runtime {
                message: format!("admission for line {}: {}", index, e),
            })?;
        Ok(Some(permit))
    }

    fn start_unit(&self, line: Line, permit: Option<OwnedSemaphorePermit>) -> Result<()> {
        let processor = Arc::clone(&self.processor);
        let index = line.index();
        let guard = self.tracker.begin().for_line(index);

        tracing::trace!("Dispatching line {}", index);

        // JoinHandle 直接丟棄，派發迴圈不持有也不等待任何單元
        let spawned = std::thread::Builder::new()
            .name(format!("line-{}", index))
            .spawn(move || {
                let _permit = permit;
                match processor.process_line(line) {
                    Ok(()) => guard.complete(),
                    Err(e) => {
                        tracing::warn!("Line {} failed: {:#}", index, e);
                        guard.fail();
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                drop(handle);
                Ok(())
            }
            Err(source) => {
                tracing::error!("Could not start a thread for line {}: {}", index, source);
                Err(DispatchError::UnitSpawn { index, source })
            }
        }
    }
}

pub async fn drain_tracker(tracker: &UnitTracker, timeout: Option<Duration>) -> DrainOutcome {
    match timeout {
        None => {
            tracker.wait_idle().await;
            DrainOutcome::Drained
        }
        Some(limit) => match tokio::time::timeout(limit, tracker.wait_idle()).await {
            Ok(()) => DrainOutcome::Drained,
            Err(_) => DrainOutcome::TimedOut {
                abandoned: tracker.live(),
            },
        },
    }
}
