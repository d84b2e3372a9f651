use crate::domain::model::Line;
use crate::domain::ports::LineSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Line source over any buffered async reader.
///
/// Lines keep their trailing newline; a final line without one is still
/// yielded. Once end-of-stream is seen every later call returns `Ok(None)`.
pub struct ReaderLineSource<R> {
    reader: R,
    next_index: u64,
    exhausted: bool,
}

pub type StdinLineSource = ReaderLineSource<BufReader<Stdin>>;

/// 標準輸入是唯一的讀取者
pub fn stdin_source() -> StdinLineSource {
    ReaderLineSource::new(BufReader::new(tokio::io::stdin()))
}

impl<R> ReaderLineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next_index: 0,
            exhausted: false,
        }
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.next_index
    }
}

#[async_trait]
impl<R> LineSource for ReaderLineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> Result<Option<Line>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut text = String::new();
        let bytes = self.reader.read_line(&mut text).await?;
        if bytes == 0 {
            self.exhausted = true;
            tracing::debug!("Input exhausted after {} lines", self.next_index);
            return Ok(None);
        }

        let line = Line::new(self.next_index, text);
        self.next_index += 1;
        Ok(Some(line))
    }
}
