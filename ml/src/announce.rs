//! One-time update announcement

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Current announcement; changing it shows the message again once
pub const UPDATE_MESSAGE: &str = "Milestone Levels v1.1.0 is here. Enjoy the XP milestones!";

#[derive(Debug, Default, Serialize, Deserialize)]
struct NoticeState {
    #[serde(rename = "last-update-message", default)]
    last_update_message: Option<String>,
}

/// Tracks whether the current update message has been shown, persisted in a
/// YAML state file
#[derive(Debug, Clone)]
pub struct UpdateNotice {
    path: PathBuf,
}

impl UpdateNotice {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Called on login; returns the chat message to show when the stored
    /// announcement is not the current one
    pub fn check_on_login(&self) -> Result<Option<String>> {
        let last = self.last_message()?;
        if last.as_deref() == Some(UPDATE_MESSAGE) {
            debug!(?last, "UpdateNotice::check_on_login: already shown");
            return Ok(None);
        }

        debug!(previous = ?last, "UpdateNotice::check_on_login: storing new message");
        self.store(Some(UPDATE_MESSAGE.to_string()))?;
        info!("Showing update notice");
        Ok(Some(format!("<col=ff0000>{}</col>", UPDATE_MESSAGE)))
    }

    /// Last stored announcement, if any
    pub fn last_message(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .context(format!("Failed to read notice state: {}", self.path.display()))?;
        let state: NoticeState = serde_yaml::from_str(&content).context("Failed to parse notice state")?;
        Ok(state.last_update_message)
    }

    /// Forget the stored announcement so it shows on the next login
    pub fn clear(&self) -> Result<()> {
        self.store(None)
    }

    fn store(&self, message: Option<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }
        let state = NoticeState {
            last_update_message: message,
        };
        let content = serde_yaml::to_string(&state).context("Failed to serialize notice state")?;
        fs::write(&self.path, content).context(format!("Failed to write notice state: {}", self.path.display()))
    }
}
