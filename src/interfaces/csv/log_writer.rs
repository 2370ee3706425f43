use crate::domain::log::LogEntry;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct LogRecord<'a> {
    id: u64,
    time: String,
    event: &'a str,
    log: String,
}

/// Writes log rows as CSV with `id, time, event, log` columns.
///
/// The `log` blob is written as UTF-8 text, which holds for the JSON payloads
/// the loggers persist.
pub struct LogWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LogWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_entries(&mut self, entries: impl IntoIterator<Item = LogEntry>) -> Result<()> {
        for entry in entries {
            self.writer.serialize(LogRecord {
                id: entry.id,
                time: entry.time.to_rfc3339(),
                event: &entry.event,
                log: String::from_utf8_lossy(&entry.log).into_owned(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
