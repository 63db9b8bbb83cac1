//! Milestones configuration types and loading

use eyre::{Context, Result};
use notifysched::{Rgb, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::skill::SkillToggles;

/// Dark orange interface text
pub const DEFAULT_COLOR: Rgb = Rgb::from_u32(0xFF981F);

/// Last Man Standing map regions; level changes there are not real progress
pub const LAST_MAN_STANDING_REGIONS: [u32; 15] = [
    13658, 13659, 13660, 13914, 13915, 13916, 13918, 13919, 13920, 14174, 14175, 14176, 14430, 14431, 14432,
];

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Enables the `level` developer command
    #[serde(rename = "developer-mode")]
    pub developer_mode: bool,

    /// Host tick period in milliseconds
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,

    /// Level notification settings
    pub levels: LevelsConfig,

    /// Per-skill toggles
    pub skills: SkillToggles,

    /// Map regions in which level changes are ignored
    #[serde(rename = "excluded-regions")]
    pub excluded_regions: Vec<u32>,

    /// Display scheduler settings
    pub scheduler: SchedulerConfig,

    /// Where the update-notice state is stored
    #[serde(rename = "state-path")]
    pub state_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            developer_mode: false,
            tick_ms: 600,
            levels: LevelsConfig::default(),
            skills: SkillToggles::default(),
            excluded_regions: LAST_MAN_STANDING_REGIONS.to_vec(),
            scheduler: SchedulerConfig::default(),
            state_path: None,
        }
    }
}

/// Level notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    /// Title template; may contain `$level` and `$skill`
    pub title: String,

    /// Text template; may contain `$level` and `$skill`
    pub text: String,

    /// Title and text color; `null` uses the surface default
    pub color: Option<Rgb>,

    /// Comma separated levels to notify on
    #[serde(rename = "show-on-levels")]
    pub show_on_levels: String,

    /// Notify on every virtual level, ignoring the level list and skill toggles
    #[serde(rename = "show-virtual-levels")]
    pub show_virtual_levels: bool,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            title: "Level milestone".to_string(),
            text: "Gained level $level in $skill!".to_string(),
            color: Some(DEFAULT_COLOR),
            show_on_levels: "10, 20, 30, 40, 50, 60, 70, 80, 90, 99".to_string(),
            show_virtual_levels: true,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .milestones.yml
        let local_config = PathBuf::from(".milestones.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/milestones/milestones.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("milestones").join("milestones.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".milestones.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("milestones").join("milestones.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    /// Location of the update-notice state file
    pub fn state_path(&self) -> PathBuf {
        self.state_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("milestones")
                .join("state.yml")
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
