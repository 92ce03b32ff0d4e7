/*!
 * Printers
 *
 * Sinks for log records:
 * - `TracingPrinter`: forwards each record to `tracing` at the matching level
 * - `MemoryPrinter`: keeps formatted lines in a bounded buffer
 * - `WriterPrinter`: writes text or JSON lines to any `io::Write`
 *
 * A closed printer rejects further records with `PrinterError::Closed`.
 */

use super::record::{LogLevel, LogRecord};
use crate::core::errors::{PrinterError, PrinterResult};
use crate::core::limits::MEMORY_PRINTER_DEFAULT_LINES;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{event, Level};

/// Destination for log records
pub trait Printer: Send + Sync {
    fn print(&self, record: &LogRecord) -> PrinterResult<()>;

    /// Push buffered output to its destination
    fn flush(&self) -> PrinterResult<()> {
        Ok(())
    }

    /// Flush and stop accepting records
    fn close(&self) -> PrinterResult<()>;

    /// Discard retained output
    fn clear(&self) -> PrinterResult<()> {
        Ok(())
    }
}

/// Printer emitting `tracing` events
#[derive(Debug, Default)]
pub struct TracingPrinter {
    closed: AtomicBool,
}

impl TracingPrinter {
    /// Target attached to every emitted event
    pub const TARGET: &'static str = "waitkit::printer";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Printer for TracingPrinter {
    fn print(&self, record: &LogRecord) -> PrinterResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PrinterError::Closed);
        }

        let origin = record.target.as_str();
        let message = record.message.as_str();
        match record.level {
            LogLevel::Trace => event!(target: TracingPrinter::TARGET, Level::TRACE, origin, "{}", message),
            LogLevel::Debug => event!(target: TracingPrinter::TARGET, Level::DEBUG, origin, "{}", message),
            LogLevel::Info => event!(target: TracingPrinter::TARGET, Level::INFO, origin, "{}", message),
            LogLevel::Warn => event!(target: TracingPrinter::TARGET, Level::WARN, origin, "{}", message),
            LogLevel::Error => event!(target: TracingPrinter::TARGET, Level::ERROR, origin, "{}", message),
        }
        Ok(())
    }

    fn close(&self) -> PrinterResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Printer retaining the most recent formatted lines in memory
#[derive(Debug)]
pub struct MemoryPrinter {
    lines: Mutex<VecDeque<String>>,
    max_lines: usize,
    closed: AtomicBool,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        Self::with_max_lines(MEMORY_PRINTER_DEFAULT_LINES)
    }

    /// Printer keeping at most `max_lines`; older lines drop first
    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::new()),
            max_lines: max_lines.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Snapshot of the retained lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Default for MemoryPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer for MemoryPrinter {
    fn print(&self, record: &LogRecord) -> PrinterResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PrinterError::Closed);
        }

        let mut lines = self.lines.lock();
        if lines.len() == self.max_lines {
            lines.pop_front();
        }
        lines.push_back(record.to_string());
        Ok(())
    }

    fn close(&self) -> PrinterResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn clear(&self) -> PrinterResult<()> {
        self.lines.lock().clear();
        Ok(())
    }
}

/// Line layout used by `WriterPrinter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// `LEVEL target: message`
    #[default]
    Text,
    /// One serialized `LogRecord` per line
    Json,
}

/// Printer writing one line per record to an `io::Write` sink
pub struct WriterPrinter<W> {
    writer: Mutex<W>,
    format: LineFormat,
    closed: AtomicBool,
}

impl<W: Write + Send> WriterPrinter<W> {
    pub fn new(writer: W, format: LineFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
            closed: AtomicBool::new(false),
        }
    }

    pub fn format(&self) -> LineFormat {
        self.format
    }

    /// Recover the sink, e.g. to inspect an in-memory buffer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W> fmt::Debug for WriterPrinter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterPrinter")
            .field("format", &self.format)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl<W: Write + Send> Printer for WriterPrinter<W> {
    fn print(&self, record: &LogRecord) -> PrinterResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PrinterError::Closed);
        }

        let mut writer = self.writer.lock();
        match self.format {
            LineFormat::Text => writeln!(writer, "{}", record)?,
            LineFormat::Json => {
                serde_json::to_writer(&mut *writer, record)
                    .map_err(|e| PrinterError::Io(e.to_string()))?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn flush(&self) -> PrinterResult<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn close(&self) -> PrinterResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.flush()
    }
}
