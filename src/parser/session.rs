use anyhow::Result;
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::SESSION_DURATION_HOURS;

/// A single line of a session JSONL file. Only the fields needed to seed a
/// session are deserialized; everything else in the record is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub timestamp: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// A reconstructed session window derived from one JSONL file.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub source_path: PathBuf,
    pub project: String,
}

/// Parse a session JSONL file into a session window.
///
/// The first line that deserializes, has `type == "user"` and carries a
/// parseable timestamp seeds the session; later lines are never inspected.
/// Returns `Ok(None)` when no line qualifies. Malformed or partial lines
/// (the writer may still be appending) are skipped, not errors.
pub fn parse_session_file(path: &Path) -> Result<Option<Session>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let entry: LogEntry = match serde_json::from_str(&line) {
            Ok(e) => e,
            Err(_) => continue,
        };

        if entry.entry_type.as_deref() != Some("user") {
            continue;
        }

        let Some(ts) = entry.timestamp.as_deref() else {
            continue;
        };
        let Ok(start_time) = DateTime::parse_from_rfc3339(ts) else {
            continue;
        };
        let start_time = start_time.with_timezone(&Local);

        let session_id = entry.session_id.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string()
        });

        return Ok(Some(Session {
            session_id,
            start_time,
            end_time: start_time + Duration::hours(SESSION_DURATION_HOURS),
            source_path: path.to_path_buf(),
            project: extract_project_name(path),
        }));
    }

    Ok(None)
}

/// Derive a project name from a session file path.
///
/// The directory under `projects/` is the project name with `/` flattened to
/// `-`; undo that. Paths without a `projects` component map to `"unknown"`.
pub fn extract_project_name(path: &Path) -> String {
    let components: Vec<&str> = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    components
        .iter()
        .position(|&c| c == "projects")
        .and_then(|i| components.get(i + 1))
        .map(|s| s.replace('-', "/"))
        .unwrap_or_else(|| "unknown".to_string())
}
