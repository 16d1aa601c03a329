use chrono::{DateTime, FixedOffset};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::error::{LogsiftError, Result};
use crate::model::log::LogRecord;

/// A single query predicate. Callers pick exactly one per query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogFilter {
    /// Exact, case-sensitive level match. `None` or `""` passes everything.
    Level(Option<String>),
    /// Inclusive on both ends. An inverted range matches nothing.
    Range {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    /// Case-sensitive substring of the message template.
    Template(String),
}

impl LogFilter {
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Self::Level(None) => true,
            Self::Level(Some(level)) => level.is_empty() || record.level() == level,
            Self::Range { start, end } => {
                let ts = record.timestamp();
                *start <= ts && ts <= *end
            }
            Self::Template(needle) => record.message_template().contains(needle.as_str()),
        }
    }
}

/// Restricts which files in the log directory are read, by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    raw: String,
    pattern: Pattern,
}

impl FilePattern {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LogsiftError::Config("file pattern cannot be empty".to_string()));
        }
        let pattern = Pattern::new(trimmed)
            .map_err(|e| LogsiftError::Config(format!("invalid file pattern {trimmed}: {e}")))?;
        Ok(Self {
            raw: trimmed.to_string(),
            pattern,
        })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.matches(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, level: &str, template: &str) -> LogRecord {
        LogRecord::parse(
            &serde_json::json!({
                "Timestamp": ts,
                "Level": level,
                "MessageTemplate": template,
            })
            .to_string(),
        )
        .unwrap()
    }

    fn ts(input: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(input).unwrap()
    }

    #[test]
    fn level_filter_is_exact_and_case_sensitive() {
        let r = record("2024-05-01T10:00:00Z", "Error", "x");
        assert!(LogFilter::Level(Some("Error".into())).matches(&r));
        assert!(!LogFilter::Level(Some("error".into())).matches(&r));
        assert!(!LogFilter::Level(Some("Err".into())).matches(&r));
        assert!(!LogFilter::Level(Some("Fatal".into())).matches(&r));
    }

    #[test]
    fn absent_or_empty_level_passes_everything() {
        let r = record("2024-05-01T10:00:00Z", "Debug", "x");
        assert!(LogFilter::Level(None).matches(&r));
        assert!(LogFilter::Level(Some(String::new())).matches(&r));
    }

    #[test]
    fn range_filter_is_inclusive() {
        let r = record("2024-05-01T10:00:00Z", "Error", "x");
        let exact = LogFilter::Range {
            start: ts("2024-05-01T10:00:00Z"),
            end: ts("2024-05-01T10:00:00Z"),
        };
        assert!(exact.matches(&r));

        let before = LogFilter::Range {
            start: ts("2024-05-01T09:00:00Z"),
            end: ts("2024-05-01T09:59:59Z"),
        };
        assert!(!before.matches(&r));
    }

    #[test]
    fn range_filter_compares_instants_across_offsets() {
        let r = record("2024-05-01T12:00:00+02:00", "Error", "x");
        let window = LogFilter::Range {
            start: ts("2024-05-01T10:00:00Z"),
            end: ts("2024-05-01T10:00:00Z"),
        };
        assert!(window.matches(&r));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let r = record("2024-05-01T10:00:00Z", "Error", "x");
        let inverted = LogFilter::Range {
            start: ts("2024-05-01T11:00:00Z"),
            end: ts("2024-05-01T09:00:00Z"),
        };
        assert!(!inverted.matches(&r));
    }

    #[test]
    fn template_filter_is_case_sensitive_substring() {
        let r = record("2024-05-01T10:00:00Z", "Error", "disk failure on {node}");
        assert!(LogFilter::Template("disk".into()).matches(&r));
        assert!(LogFilter::Template("{node}".into()).matches(&r));
        assert!(LogFilter::Template(String::new()).matches(&r));
        assert!(!LogFilter::Template("Disk".into()).matches(&r));
        assert!(!LogFilter::Template("db-1".into()).matches(&r));
    }

    #[test]
    fn file_pattern_parse_and_match() {
        let p = FilePattern::parse("log-*.json").unwrap();
        assert!(p.matches("log-20240501.json"));
        assert!(!p.matches("log-20240501.txt"));
        assert_eq!(p.as_str(), "log-*.json");
        assert!(FilePattern::parse("  ").is_err());
        assert!(FilePattern::parse("[").is_err());
    }
}
