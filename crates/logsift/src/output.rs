use chrono::SecondsFormat;
use logsift_core::query::{LogsEnvelope, StatusResponse};
use owo_colors::OwoColorize;
use serde_json::Value;

pub fn print_envelope_human(v: &LogsEnvelope) {
    for doc in &v.logs {
        println!("{}", human_line(doc));
    }
    println!("-- {} records --", v.logs.len());
}

pub fn print_status_human(v: &StatusResponse) {
    println!("log_dir={}", v.log_dir);
    if let Some(pattern) = &v.file_pattern {
        println!("file_pattern={pattern}");
    }
    println!(
        "files={} records={} skipped_lines={}",
        v.files_read, v.records, v.skipped_lines
    );
    if let Some(oldest) = v.oldest_ts {
        println!("oldest={}", oldest.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Some(newest) = v.newest_ts {
        println!("newest={}", newest.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    for (level, count) in &v.by_level {
        println!("level={level} count={count}");
    }
}

fn human_line(doc: &Value) -> String {
    let ts = field(doc, &["Timestamp", "timestamp", "@t"]).unwrap_or("-");
    let level = field(doc, &["Level", "level", "@l"]).unwrap_or("Information");
    let message = field(doc, &["RenderedMessage", "@m"])
        .or_else(|| field(doc, &["MessageTemplate", "messageTemplate", "@mt"]))
        .unwrap_or_default();
    format!("{ts} {} | {message}", colored_level(level))
}

fn field<'a>(doc: &'a Value, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| doc.get(*name).and_then(Value::as_str))
}

fn colored_level(level: &str) -> String {
    match level {
        "Verbose" | "Trace" => level.blue().to_string(),
        "Debug" => level.bright_black().to_string(),
        "Information" => level.green().to_string(),
        "Warning" => level.yellow().to_string(),
        "Error" => level.red().to_string(),
        "Fatal" | "Critical" => level.magenta().to_string(),
        other => other.to_string(),
    }
}
