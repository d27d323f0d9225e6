use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::timing::DEFAULT_FIXATION_RATIO;

pub const DEFAULT_WPM: u32 = 300;
pub const MIN_WPM: u32 = 100;
pub const MAX_WPM: u32 = 1000;
pub const WPM_STEP: u32 = 50;

/// Inclusive range of accepted reading rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub min: u32,
    pub max: u32,
}

impl RateLimits {
    /// Range of `min..=max`, repaired to `1 <= min <= max`.
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Never returns zero, and never panics on a hand-built inverted range.
    pub fn clamp(&self, wpm: u32) -> u32 {
        wpm.min(self.max).max(self.min).max(1)
    }

    pub fn contains(&self, wpm: u32) -> bool {
        (self.min..=self.max).contains(&wpm)
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            min: MIN_WPM,
            max: MAX_WPM,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub wpm: u32,
    pub min_wpm: u32,
    pub max_wpm: u32,
    pub wpm_step: u32,
    pub fixation_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            min_wpm: MIN_WPM,
            max_wpm: MAX_WPM,
            wpm_step: WPM_STEP,
            fixation_ratio: DEFAULT_FIXATION_RATIO,
        }
    }
}

impl Config {
    /// Repair values a hand-edited file may carry: an empty or inverted
    /// range, a zero step, a rate outside the range or a fixation point off
    /// the surface.
    pub fn sanitized(mut self) -> Self {
        self.min_wpm = self.min_wpm.max(1);
        if self.max_wpm < self.min_wpm {
            self.max_wpm = self.min_wpm;
        }
        self.wpm = self.wpm.clamp(self.min_wpm, self.max_wpm);
        self.wpm_step = self.wpm_step.max(1);
        if !(0.0..=1.0).contains(&self.fixation_ratio) {
            self.fixation_ratio = DEFAULT_FIXATION_RATIO;
        }
        self
    }

    pub fn rate_limits(&self) -> RateLimits {
        RateLimits::new(self.min_wpm, self.max_wpm)
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "zone-reader") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("zone_reader_config.json")
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

    /// Like [`ConfigStore::load`] but reports why the file was unusable.
    /// `Ok(None)` means there is no config file yet.
    pub fn try_load(&self) -> Result<Option<Config>, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cfg = serde_json::from_slice::<Config>(&bytes)?;
        Ok(Some(cfg.sanitized()))
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(cfg)) => {
                debug!(path = %self.path.display(), "loaded config");
                cfg
            }
            Ok(None) => Config::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
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
