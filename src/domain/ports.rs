use crate::domain::model::Line;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Forward-only producer of input lines. Returns `Ok(None)` at end-of-stream.
#[async_trait]
pub trait LineSource: Send {
    async fn next_line(&mut self) -> Result<Option<Line>>;
}

/// The per-line processing capability invoked once for every dispatched line.
///
/// Implementations are called from many threads at once and must arbitrate
/// any shared output themselves. Errors never reach the dispatcher; they are
/// logged by the unit that produced them.
pub trait LineProcessor: Send + Sync + 'static {
    fn process_line(&self, line: Line) -> anyhow::Result<()>;
}

impl<F> LineProcessor for F
where
    F: Fn(Line) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn process_line(&self, line: Line) -> anyhow::Result<()> {
        self(line)
    }
}

pub trait ConfigProvider: Send + Sync {
    /// `None` means no limit on concurrently live units.
    fn max_concurrency(&self) -> Option<usize>;
    fn drain_on_exit(&self) -> bool;
    fn drain_timeout(&self) -> Option<Duration>;
}
