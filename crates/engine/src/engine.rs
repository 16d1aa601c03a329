use chrono::{DateTime, FixedOffset};
use logsift_core::error::Result;
use logsift_core::filter::LogFilter;
use logsift_core::query::{LogsEnvelope, StatusResponse};

use crate::loader::LogLoader;

/// Answers queries against a log directory. Holds no records: every call
/// takes a fresh snapshot and drops it when the response is built.
#[derive(Debug, Clone)]
pub struct LogEngine {
    loader: LogLoader,
}

impl LogEngine {
    pub fn new(loader: LogLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &LogLoader {
        &self.loader
    }

    pub fn query(&self, filter: &LogFilter) -> Result<LogsEnvelope> {
        let snapshot = self.loader.load()?;
        let envelope = snapshot.envelope(filter);
        tracing::debug!(
            ?filter,
            matched = envelope.logs.len(),
            loaded = snapshot.records().len(),
            "query evaluated"
        );
        Ok(envelope)
    }

    pub fn by_level(&self, level: Option<&str>) -> Result<LogsEnvelope> {
        self.query(&LogFilter::Level(level.map(str::to_string)))
    }

    pub fn by_range(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<LogsEnvelope> {
        self.query(&LogFilter::Range { start, end })
    }

    pub fn by_template(&self, message: &str) -> Result<LogsEnvelope> {
        self.query(&LogFilter::Template(message.to_string()))
    }

    pub fn status(&self) -> Result<StatusResponse> {
        Ok(self.loader.load()?.status())
    }
}
