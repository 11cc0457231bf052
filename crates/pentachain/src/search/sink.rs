//! Destinations for improving results.
//!
//! The log format is one block per improvement:
//!
//! ```text
//! 0.5877853 (0.5877852522924731)
//! [2, 3, 3, 3]
//!
//! ```

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::best::BestRecord;

/// Receives every accepted improvement, in version order.
pub trait ResultSink: Sync {
    fn record(&self, record: &BestRecord);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn record(&self, _record: &BestRecord) {}
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<BestRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<BestRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResultSink for MemorySink {
    fn record(&self, record: &BestRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}

/// Rounded distance, exact distance, then the sequence.
pub fn format_record(record: &BestRecord) -> String {
    format!(
        "{:.7} ({})\n{:?}\n\n",
        record.distance, record.distance, record.sequence
    )
}

/// Append-only text log. Each record is flushed as soon as it is written so an
/// interrupted run keeps everything found so far.
///
/// Write failures do not stop the search; the first one is kept and returned by `finish`.
#[derive(Debug)]
pub struct LogSink<W: Write + Send> {
    inner: Mutex<LogState<W>>,
}

#[derive(Debug)]
struct LogState<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write + Send> LogSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(LogState { out, error: None }),
        }
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        let mut state = self.inner.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(err) = state.error.take() {
            return Err(err);
        }
        state.out.flush()?;
        Ok(state.out)
    }
}

impl<W: Write + Send> ResultSink for LogSink<W> {
    fn record(&self, record: &BestRecord) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let written = state
            .out
            .write_all(format_record(record).as_bytes())
            .and_then(|()| state.out.flush());
        if let Err(err) = written {
            tracing::error!(error = %err, version = record.version, "result log write failed");
            if state.error.is_none() {
                state.error = Some(err);
            }
        }
    }
}
