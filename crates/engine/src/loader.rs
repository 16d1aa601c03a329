use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use logsift_core::error::{LogsiftError, Result};
use logsift_core::filter::FilePattern;
use logsift_core::model::log::LogRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads every log file in one flat directory into memory.
#[derive(Debug, Clone)]
pub struct LogLoader {
    dir: PathBuf,
    pattern: Option<FilePattern>,
}

/// Records loaded by a single [`LogLoader::load`] call, in file-name order
/// then line order. Not sorted by time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    log_dir: PathBuf,
    file_pattern: Option<String>,
    records: Vec<LogRecord>,
    files_read: usize,
    skipped_lines: usize,
}

impl LogLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pattern: None,
        }
    }

    pub fn with_file_pattern(mut self, pattern: Option<FilePattern>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self) -> Result<Snapshot> {
        let files = self.list_files()?;

        let mut snapshot = Snapshot {
            log_dir: self.dir.clone(),
            file_pattern: self.pattern.as_ref().map(|p| p.as_str().to_string()),
            records: Vec::new(),
            files_read: 0,
            skipped_lines: 0,
        };

        for path in files {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::warn!(file = %path.display(), "log file vanished before read");
                    continue;
                }
                Err(e) => {
                    return Err(LogsiftError::Load(format!(
                        "failed reading {}: {e}",
                        path.display()
                    )));
                }
            };
            snapshot.files_read += 1;
            snapshot.ingest_file(&path, &bytes);
        }

        tracing::info!(
            dir = %self.dir.display(),
            files = snapshot.files_read,
            records = snapshot.records.len(),
            skipped = snapshot.skipped_lines,
            "log directory loaded"
        );
        Ok(snapshot)
    }

    fn list_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            LogsiftError::Load(format!(
                "cannot read log directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LogsiftError::Load(format!(
                    "cannot list log directory {}: {e}",
                    self.dir.display()
                ))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(pattern) = &self.pattern {
                let name = entry.file_name();
                if !pattern.matches(&name.to_string_lossy()) {
                    continue;
                }
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }
}

impl Snapshot {
    fn ingest_file(&mut self, path: &Path, bytes: &[u8]) {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut lines = bytes.split(|b| *b == b'\n').collect::<Vec<_>>();
        // A trailing newline terminates the last line; it does not start one.
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let parsed = std::str::from_utf8(line)
                .map_err(|e| LogsiftError::Parse(format!("invalid utf-8: {e}")))
                .and_then(LogRecord::parse);
            match parsed {
                Ok(record) => self.records.push(record),
                Err(err) => {
                    self.skipped_lines += 1;
                    tracing::debug!(
                        file = %path.display(),
                        line = idx + 1,
                        error = %err,
                        "skipping unparseable log line"
                    );
                }
            }
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// The file-name glob this snapshot was restricted to, if any.
    pub fn file_pattern(&self) -> Option<&str> {
        self.file_pattern.as_deref()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn files_read(&self) -> usize {
        self.files_read
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}
