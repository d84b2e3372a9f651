use crate::domain::model::Line;
use crate::domain::ports::LineProcessor;
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes every line back out verbatim.
///
/// Writes are serialized through a mutex so a line is never torn, but lines
/// appear in whatever order their units reach the lock.
pub struct EchoProcessor<W> {
    sink: Mutex<W>,
}

impl EchoProcessor<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> EchoProcessor<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

impl<W: Write + Send + 'static> LineProcessor for EchoProcessor<W> {
    fn process_line(&self, line: Line) -> anyhow::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| anyhow::anyhow!("output sink poisoned"))?;
        sink.write_all(line.text().as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_echo_writes_text_verbatim() {
        let buffer = SharedBuffer::default();
        let processor = EchoProcessor::new(buffer.clone());

        processor.process_line(Line::new(0, "# Title\n")).unwrap();
        processor.process_line(Line::new(1, "no newline")).unwrap();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "# Title\nno newline");
    }

    #[test]
    fn test_concurrent_lines_are_not_torn() {
        let buffer = SharedBuffer::default();
        let processor = Arc::new(EchoProcessor::new(buffer.clone()));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let processor = Arc::clone(&processor);
                std::thread::spawn(move || {
                    processor
                        .process_line(Line::new(i, format!("{}\n", "x".repeat(64))))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written.lines().count(), 16);
        assert!(written.lines().all(|l| l.len() == 64));
    }
}
