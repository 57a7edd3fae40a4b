use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_REMINDER_HOUR: u32 = 9;
pub const DEFAULT_REMINDER_MINUTE: u32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("prefs file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("prefs file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reminder settings kept next to, but outside of, the reflection database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPrefs {
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default = "default_hour")]
    pub reminder_hour: u32,
    #[serde(default = "default_minute")]
    pub reminder_minute: u32,
}

fn default_hour() -> u32 {
    DEFAULT_REMINDER_HOUR
}

fn default_minute() -> u32 {
    DEFAULT_REMINDER_MINUTE
}

impl Default for ReminderPrefs {
    fn default() -> Self {
        Self {
            reminder_enabled: false,
            reminder_hour: DEFAULT_REMINDER_HOUR,
            reminder_minute: DEFAULT_REMINDER_MINUTE,
        }
    }
}

/// Small JSON key-value file holding [`ReminderPrefs`].
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<ReminderPrefs>, PrefsError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PrefsError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Replace the prefs file. The JSON goes to a sibling temp file first
    /// and is renamed over the old one, so a crash never leaves it half
    /// written.
    pub async fn save(&self, prefs: &ReminderPrefs) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let content = serde_json::to_string_pretty(prefs).map_err(|source| PrefsError::Json {
            path: self.path.clone(),
            source,
        })?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, content)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
