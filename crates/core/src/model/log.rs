use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LogsiftError, Result};

/// One parsed line of structured log output.
///
/// The filterable fields and the output document come from a single parse of
/// `raw`, so a record can never be filtered on values that differ from what
/// it renders. Fields are private; a record does not change after `parse`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    timestamp: DateTime<FixedOffset>,
    level: String,
    message_template: String,
    raw: String,
    document: Value,
}

/// The subset of a Serilog JSON event used for filtering. Accepts the
/// verbose formatter's names and the compact formatter's `@` names.
#[derive(Debug, Deserialize)]
struct RecordFields {
    #[serde(rename = "Timestamp", alias = "timestamp", alias = "@t")]
    timestamp: DateTime<FixedOffset>,
    #[serde(
        rename = "Level",
        alias = "level",
        alias = "@l",
        default = "default_level"
    )]
    level: String,
    #[serde(
        rename = "MessageTemplate",
        alias = "messageTemplate",
        alias = "@mt"
    )]
    message_template: String,
}

/// Compact-format events omit the level when it is `Information`.
fn default_level() -> String {
    "Information".to_string()
}

impl LogRecord {
    pub fn parse(line: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(line)
            .map_err(|e| LogsiftError::Parse(format!("invalid json: {e}")))?;
        if !document.is_object() {
            return Err(LogsiftError::Parse(
                "log line is not a json object".to_string(),
            ));
        }

        let fields = RecordFields::deserialize(&document)
            .map_err(|e| LogsiftError::Parse(format!("missing or invalid field: {e}")))?;

        Ok(Self {
            timestamp: fields.timestamp,
            level: fields.level,
            message_template: fields.message_template,
            raw: line.to_string(),
            document,
        })
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// The line exactly as it was read, without its terminator.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Full structured form of the line, including fields not modelled here.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl Serialize for LogRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.document.serialize(serializer)
    }
}
