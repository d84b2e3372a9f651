use crate::domain::model::UnitStats;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
    live: AtomicUsize,
    idle: Notify,
}

/// Countable, waitable group of dispatched units.
///
/// Holds counters only, never a handle to a unit. Cloning shares the counters.
#[derive(Debug, Clone, Default)]
pub struct UnitTracker {
    inner: Arc<Inner>,
}

impl UnitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit as started. The returned guard must travel with the unit.
    pub fn begin(&self) -> UnitGuard {
        self.inner.started.fetch_add(1, Ordering::SeqCst);
        self.inner.live.fetch_add(1, Ordering::SeqCst);
        UnitGuard {
            inner: Arc::clone(&self.inner),
            index: None,
            outcome: Outcome::Unfinished,
        }
    }

    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> UnitStats {
        UnitStats {
            started: self.inner.started.load(Ordering::SeqCst),
            completed: self.inner.completed.load(Ordering::SeqCst),
            failed: self.inner.failed.load(Ordering::SeqCst),
            panicked: self.inner.panicked.load(Ordering::SeqCst),
            live: self.live(),
        }
    }

    /// Resolves once no unit is live. Returns immediately on an idle tracker.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // 先註冊再檢查，避免錯過最後一個單元的通知
            notified.as_mut().enable();
            if self.live() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unfinished,
    Completed,
    Failed,
}

/// Records the end of one unit when dropped.
///
/// A guard dropped without `complete` or `fail` while its thread unwinds is
/// counted as panicked; dropped any other way, the unit never ran and counts
/// as failed.
#[derive(Debug)]
pub struct UnitGuard {
    inner: Arc<Inner>,
    index: Option<u64>,
    outcome: Outcome,
}

impl UnitGuard {
    pub fn for_line(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn complete(mut self) {
        self.outcome = Outcome::Completed;
    }

    pub fn fail(mut self) {
        self.outcome = Outcome::Failed;
    }
}

impl Drop for UnitGuard {
    fn drop(&mut self) {
        match self.outcome {
            Outcome::Completed => {
                self.inner.completed.fetch_add(1, Ordering::SeqCst);
            }
            Outcome::Failed => {
                self.inner.failed.fetch_add(1, Ordering::SeqCst);
            }
            Outcome::Unfinished if std::thread::panicking() => {
                self.inner.panicked.fetch_add(1, Ordering::SeqCst);
                match self.index {
                    Some(index) => tracing::error!("Unit for line {} panicked", index),
                    None => tracing::error!("Unit panicked"),
                }
            }
            Outcome::Unfinished => {
                // 單元從未執行，例如執行緒建立失敗
                self.inner.failed.fetch_add(1, Ordering::SeqCst);
                tracing::warn!("Unit for line {:?} dropped before it ran", self.index);
            }
        }

        if self.inner.live.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
