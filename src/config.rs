use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::session::SessionConfig;
use crate::settings::{QUESTIONS_RANGE, SECONDS_RANGE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub total_questions: u32,
    pub secs_per_question: u32,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            total_questions: session.total_questions,
            secs_per_question: session.default_secs_per_question,
            sound: true,
        }
    }
}

impl Config {
    /// Pull values that were hand-edited out of range back into the allowed bounds
    pub fn clamped(self) -> Self {
        Self {
            total_questions: self
                .total_questions
                .clamp(*QUESTIONS_RANGE.start(), *QUESTIONS_RANGE.end()),
            secs_per_question: self
                .secs_per_question
                .clamp(*SECONDS_RANGE.start(), *SECONDS_RANGE.end()),
            sound: self.sound,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.total_questions, self.secs_per_question)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "ccat-timer") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("ccat_timer_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.clamped(),
                Err(e) => warn!(path = %self.path.display(), error = %e, "ignoring unreadable config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
