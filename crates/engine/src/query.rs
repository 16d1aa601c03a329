use std::collections::HashMap;

use logsift_core::error::Result;
use logsift_core::filter::LogFilter;
use logsift_core::model::log::LogRecord;
use logsift_core::query::{LogsEnvelope, StatusResponse};

use crate::loader::Snapshot;

impl Snapshot {
    /// Matching records in load order. No re-sorting, even for ranges.
    pub fn filter(&self, filter: &LogFilter) -> Vec<&LogRecord> {
        self.records()
            .iter()
            .filter(|record| filter.matches(record))
            .collect()
    }

    pub fn envelope(&self, filter: &LogFilter) -> LogsEnvelope {
        LogsEnvelope::from_records(self.filter(filter))
    }

    pub fn status(&self) -> StatusResponse {
        let records = self.records();
        StatusResponse {
            log_dir: self.log_dir().display().to_string(),
            file_pattern: self.file_pattern().map(str::to_string),
            files_read: self.files_read(),
            records: records.len(),
            skipped_lines: self.skipped_lines(),
            oldest_ts: records.iter().map(LogRecord::timestamp).min(),
            newest_ts: records.iter().map(LogRecord::timestamp).max(),
            by_level: count_by_level(records),
        }
    }
}

pub fn render_envelope(envelope: &LogsEnvelope) -> Result<String> {
    envelope.to_pretty_json()
}

fn count_by_level(records: &[LogRecord]) -> Vec<(String, usize)> {
    let mut by_level: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *by_level.entry(record.level()).or_insert(0) += 1;
    }

    let mut out = by_level
        .into_iter()
        .map(|(level, count)| (level.to_string(), count))
        .collect::<Vec<_>>();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}
