use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use jobtrail_core::DEFAULT_TAB_LIMIT;
use jobtrail_engine::{ExtractionSettings, PageLayout, TimeoutPolicy, DEFAULT_RECENT_LIMIT};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trail_logging::LogDestination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    #[default]
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub target: LogTarget,
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::Terminal,
            file: PathBuf::from("./jobtrail.log"),
            level: "warn".to_string(),
        }
    }
}

impl LogConfig {
    pub fn destination(&self) -> LogDestination {
        match self.target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.file.clone()),
            LogTarget::Both => LogDestination::Both(self.file.clone()),
        }
    }

    pub fn level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.level.trim())
            .map_err(|_| ConfigError::LogLevel(self.level.clone()))
    }
}

/// Settings of the `jobtrail` binary, read from a RON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one JSON file per stored key.
    pub data_dir: PathBuf,
    pub log: LogConfig,
    pub poll_interval_ms: u64,
    pub field_timeout_ms: u64,
    pub timeout_policy: TimeoutPolicy,
    pub layout: PageLayout,
    pub recent_limit: usize,
    pub tab_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let extraction = ExtractionSettings::default();
        Self {
            data_dir: PathBuf::from("./jobtrail_data"),
            log: LogConfig::default(),
            poll_interval_ms: millis(extraction.poll_interval),
            field_timeout_ms: millis(extraction.field_timeout),
            timeout_policy: extraction.timeout_policy,
            layout: PageLayout::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            tab_limit: DEFAULT_TAB_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn extraction(&self) -> ExtractionSettings {
        ExtractionSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            field_timeout: Duration::from_millis(self.field_timeout_ms),
            timeout_policy: self.timeout_policy,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
