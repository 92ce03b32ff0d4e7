/*!
 * Logger
 * Fans log records out to a set of printers above a minimum level
 */

use super::printer::Printer;
use super::record::{LogLevel, LogRecord};
use crate::core::errors::PrinterResult;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Multi-printer logger
///
/// A failing printer does not stop delivery to the others; the first error
/// is returned once every printer has been tried.
pub struct Logger {
    target: String,
    min_level: RwLock<LogLevel>,
    printers: RwLock<Vec<Arc<dyn Printer>>>,
}

impl Logger {
    pub fn new(target: impl Into<String>, min_level: LogLevel) -> Self {
        Self {
            target: target.into(),
            min_level: RwLock::new(min_level),
            printers: RwLock::new(Vec::new()),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn add_printer(&self, printer: Arc<dyn Printer>) {
        self.printers.write().push(printer);
    }

    pub fn printer_count(&self) -> usize {
        self.printers.read().len()
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Deliver `message` at `level`; returns whether it passed the level filter
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> PrinterResult<bool> {
        if !self.enabled(level) {
            return Ok(false);
        }
        let record = LogRecord::new(level, self.target.clone(), message);
        self.each("print", |printer| printer.print(&record))?;
        Ok(true)
    }

    pub fn trace(&self, message: impl Into<String>) -> PrinterResult<bool> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: impl Into<String>) -> PrinterResult<bool> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> PrinterResult<bool> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: impl Into<String>) -> PrinterResult<bool> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: impl Into<String>) -> PrinterResult<bool> {
        self.log(LogLevel::Error, message)
    }

    pub fn flush(&self) -> PrinterResult<()> {
        self.each("flush", |printer| printer.flush())
    }

    pub fn close(&self) -> PrinterResult<()> {
        self.each("close", |printer| printer.close())
    }

    pub fn clear(&self) -> PrinterResult<()> {
        self.each("clear", |printer| printer.clear())
    }

    fn each<F>(&self, action: &'static str, mut f: F) -> PrinterResult<()>
    where
        F: FnMut(&dyn Printer) -> PrinterResult<()>,
    {
        // Snapshot so printers may call back into the logger
        let printers: Vec<Arc<dyn Printer>> = self.printers.read().clone();
        let mut first_error = None;

        for printer in &printers {
            if let Err(e) = f(printer.as_ref()) {
                warn!(action, error = %e, "Printer failed");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("target", &self.target)
            .field("min_level", &self.min_level())
            .field("printers", &self.printer_count())
            .finish()
    }
}
