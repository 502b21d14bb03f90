//! Custom logging module.
//!
//! This module provides the `log` backend for the application: records at or
//! above the configured level are formatted with a timestamp and written to a
//! sink, standard error unless told otherwise.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::{self, Write};
use std::sync::Mutex;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger writing formatted records to a sink.
///
pub struct Logger {
    level: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Logger::with_sink(level, Box::new(io::stderr()))
    }

    pub fn with_sink(level: LevelFilter, sink: Box<dyn Write + Send>) -> Self {
        Logger {
            level,
            sink: Mutex::new(sink),
        }
    }

    /// Install this logger as the global `log` backend.
    ///
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A poisoned sink only loses this line
            if let Ok(mut sink) = self.sink.lock() {
                let _ = writeln!(sink, "{}", format_log(record));
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}

/// Raise `base` by one level per `-v`, up to trace.
///
pub fn verbosity(base: LevelFilter, occurrences: u64) -> LevelFilter {
    let levels = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let start = levels.iter().position(|l| *l == base).unwrap_or(2);
    let index = (start + occurrences as usize).min(levels.len() - 1);
    levels[index]
}
