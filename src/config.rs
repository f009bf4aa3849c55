use std::path::PathBuf;

/// Length of a session window, counted from its first user message.
pub const SESSION_DURATION_HOURS: i64 = 5;

/// Monthly session quota.
pub const MAX_SESSIONS_PER_MONTH: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Claude Code projects directory
    pub projects_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");

        Self {
            projects_dir: home.join(".claude").join("projects"),
        }
    }
}
