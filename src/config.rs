use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::setup::Difficulty;

/// Idle delay for each difficulty, in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DifficultyPresets {
    pub relaxing_ms: u64,
    pub semi_ms: u64,
    pub pro_ms: u64,
}

impl Default for DifficultyPresets {
    fn default() -> Self {
        Self {
            relaxing_ms: 700,
            semi_ms: 300,
            pro_ms: 169,
        }
    }
}

impl DifficultyPresets {
    pub fn idle_delay(&self, difficulty: Difficulty) -> Duration {
        let ms = match difficulty {
            Difficulty::Relaxing => self.relaxing_ms,
            Difficulty::Semi => self.semi_ms,
            Difficulty::Pro => self.pro_ms,
        };
        Duration::from_millis(ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub presets: DifficultyPresets,
    pub default_difficulty: Difficulty,
    /// Overrides the preset delay when set
    pub idle_delay_ms: Option<u64>,
    pub volume: f32,
    pub repeat_track: bool,
    pub backspace_resets_idle_timer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presets: DifficultyPresets::default(),
            default_difficulty: Difficulty::Semi,
            idle_delay_ms: None,
            volume: 1.0,
            repeat_track: true,
            backspace_resets_idle_timer: true,
        }
    }
}

impl Config {
    pub fn idle_delay(&self, difficulty: Difficulty) -> Duration {
        match self.idle_delay_ms {
            Some(ms) => Duration::from_millis(ms.max(1)),
            None => self.presets.idle_delay(difficulty),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "tempotype") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tempotype_config.json")
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
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
