use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LogsiftError, Result};
use crate::filter::LogFilter;
use crate::model::log::LogRecord;
use crate::time::parse_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LevelQuery {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: DateTime<FixedOffset>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<FixedOffset>,
}

impl RangeQuery {
    /// Builds a range from caller-supplied bounds. Both are required; their
    /// ordering is not checked.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start
            .ok_or_else(|| LogsiftError::InvalidArgument("startDate is required".to_string()))?;
        let end =
            end.ok_or_else(|| LogsiftError::InvalidArgument("endDate is required".to_string()))?;
        Ok(Self {
            start_date: parse_timestamp(start)?,
            end_date: parse_timestamp(end)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateQuery {
    pub message: String,
}

impl From<LevelQuery> for LogFilter {
    fn from(q: LevelQuery) -> Self {
        LogFilter::Level(q.level)
    }
}

impl From<RangeQuery> for LogFilter {
    fn from(q: RangeQuery) -> Self {
        LogFilter::Range {
            start: q.start_date,
            end: q.end_date,
        }
    }
}

impl From<TemplateQuery> for LogFilter {
    fn from(q: TemplateQuery) -> Self {
        LogFilter::Template(q.message)
    }
}

/// The response body shared by every query: `{ "logs": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LogsEnvelope {
    pub logs: Vec<Value>,
}

impl LogsEnvelope {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        Self {
            logs: records.into_iter().map(|r| r.document().clone()).collect(),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LogsiftError::Internal(format!("failed to render envelope: {e}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub log_dir: String,
    pub file_pattern: Option<String>,
    pub files_read: usize,
    pub records: usize,
    pub skipped_lines: usize,
    pub oldest_ts: Option<DateTime<FixedOffset>>,
    pub newest_ts: Option<DateTime<FixedOffset>>,
    pub by_level: Vec<(String, usize)>,
}
