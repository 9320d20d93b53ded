use directories::ProjectDirs;
use std::path::PathBuf;

const LOG_FILE: &str = "ccat-timer.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Logs are runtime state rather than user data, so the XDG state dir wins
    /// where the platform has one (Linux). Elsewhere they go in the local data dir.
    pub fn log_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "ccat-timer")?;
        let dir = dirs
            .state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf();
        Some(dir.join(LOG_FILE))
    }
}
