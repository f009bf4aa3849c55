use crate::config::Config;
use crate::parser::{session, Session};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Duration, Local};
use std::fs;

/// All reconstructed sessions, rebuilt from disk on every run.
#[derive(Debug)]
pub struct SessionTracker {
    pub config: Config,
    /// Sorted ascending by start time after `load_all`.
    pub sessions: Vec<Session>,
}

impl SessionTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            sessions: Vec::new(),
        }
    }

    /// Load every session file under the projects directory.
    ///
    /// A missing projects directory is fatal; a single unreadable or empty
    /// file is logged and skipped so it never discards the rest of the batch.
    pub fn load_all(&mut self) -> Result<()> {
        self.sessions.clear();

        if !self.config.projects_dir.is_dir() {
            bail!(
                "Claude projects directory not found: {}",
                self.config.projects_dir.display()
            );
        }

        for project_entry in fs::read_dir(&self.config.projects_dir)
            .with_context(|| format!("reading {}", self.config.projects_dir.display()))?
        {
            let project_path = project_entry?.path();

            if !project_path.is_dir() {
                continue;
            }

            for session_entry in fs::read_dir(&project_path)
                .with_context(|| format!("reading {}", project_path.display()))?
            {
                let session_path = session_entry?.path();

                // Only process .jsonl files
                if session_path.extension().and_then(|s| s.to_str()) != Some("jsonl") {
                    continue;
                }

                match session::parse_session_file(&session_path) {
                    Ok(Some(session)) => self.sessions.push(session),
                    Ok(None) => {
                        tracing::debug!("No user message in {:?}, skipped", session_path);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse session file {:?}: {}", session_path, e);
                    }
                }
            }
        }

        self.sessions.sort_by_key(|s| s.start_time);
        tracing::info!("Loaded {} sessions", self.sessions.len());
        Ok(())
    }

    /// Sessions started in the same local calendar month as `now`.
    pub fn current_month_sessions(&self, now: DateTime<Local>) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| {
                s.start_time.month() == now.month() && s.start_time.year() == now.year()
            })
            .collect()
    }

    /// The session whose window contains `now`, if any. Overlapping windows
    /// resolve to the earliest-started one.
    pub fn current_session(&self, now: DateTime<Local>) -> Option<&Session> {
        self.sessions
            .iter()
            .find(|s| s.start_time <= now && now <= s.end_time)
    }

    /// Sessions started within the last `days` days.
    pub fn recent_sessions(&self, now: DateTime<Local>, days: i64) -> Vec<&Session> {
        let cutoff = now - Duration::days(days);
        self.sessions
            .iter()
            .filter(|s| s.start_time >= cutoff)
            .collect()
    }
}
