use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

/// A line in the shape Serilog's JSON formatter writes.
pub fn serilog_line(ts: &str, level: &str, template: &str) -> String {
    json!({
        "Timestamp": ts,
        "Level": level,
        "MessageTemplate": template,
        "Properties": { "SourceContext": "testkit" },
    })
    .to_string()
}

pub fn serilog_line_with_node(ts: &str, level: &str, template: &str, node: &str) -> String {
    json!({
        "Timestamp": ts,
        "Level": level,
        "MessageTemplate": template,
        "RenderedMessage": template.replace("{node}", &format!("\"{node}\"")),
        "Properties": { "node": node, "SourceContext": "Storage.Monitor" },
    })
    .to_string()
}

pub fn write_log_file(dir: &Path, name: &str, lines: &[String]) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content)?;
    Ok(path)
}

/// Two files: `a.json` holds an Error and an Information record, `b.json`
/// holds one malformed line followed by a second Error record.
pub fn scenario_dir(dir: &Path) -> anyhow::Result<()> {
    write_log_file(
        dir,
        "a.json",
        &[
            serilog_line_with_node(
                "2024-05-01T10:00:00+00:00",
                "Error",
                "disk failure on {node}",
                "db-1",
            ),
            serilog_line("2024-05-01T09:00:00+00:00", "Information", "startup complete"),
        ],
    )?;
    write_log_file(
        dir,
        "b.json",
        &[
            "{\"Timestamp\":\"2024-05-01T10:30:00+00:00\",\"Level\":".to_string(),
            serilog_line_with_node(
                "2024-05-01T11:00:00+00:00",
                "Error",
                "disk failure on {node}",
                "db-2",
            ),
        ],
    )?;
    Ok(())
}
