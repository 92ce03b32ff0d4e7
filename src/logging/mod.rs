/*!
 * Logging
 *
 * Printer abstraction for application log output. `Logger` filters by level
 * and fans records out; printers decide where they go.
 */

mod logger;
mod printer;
mod record;

pub use logger::Logger;
pub use printer::{LineFormat, MemoryPrinter, Printer, TracingPrinter, WriterPrinter};
pub use record::{LogLevel, LogRecord};
