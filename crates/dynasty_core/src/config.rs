//! Engine configuration
//!
//! Read from the file named by `DYNASTY_CONFIG_PATH` (YAML, or JSON when the
//! extension is `.json`). Unset or empty means defaults.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::error::{DynastyError, DynastyResult};
use crate::models::SCHEDULE_WEEKS;
use crate::ranking::POLL_SIZE;
use crate::teams::TeamDirectory;

pub const CONFIG_PATH_ENV: &str = "DYNASTY_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the store image
    pub data_dir: PathBuf,
    /// Store image file name inside `data_dir`
    pub store_file: String,
    /// Batch store writes until an explicit flush
    pub deferred_writes: bool,
    /// Must stay 21; the schedule layout depends on it
    pub schedule_weeks: usize,
    /// Must stay 25
    pub poll_size: usize,
    /// Optional team directory replacing the embedded one
    pub teams_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("saves"),
            store_file: "dynasty.dat".to_string(),
            deferred_writes: false,
            schedule_weeks: SCHEDULE_WEEKS,
            poll_size: POLL_SIZE,
            teams_file: None,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(yaml: &str) -> DynastyResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| DynastyError::Config(e.to_string()))
    }

    pub fn from_json(json: &str) -> DynastyResult<Self> {
        serde_json::from_str(json).map_err(|e| DynastyError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> DynastyResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DynastyError::Config(format!("failed to read config file '{}': {e}", path.display()))
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_yaml(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Config from `DYNASTY_CONFIG_PATH`, or defaults when it is unset or blank.
    pub fn from_env() -> DynastyResult<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::from_path(Path::new(path))
    }

    pub fn validate(&self) -> DynastyResult<()> {
        if self.schedule_weeks != SCHEDULE_WEEKS {
            return Err(DynastyError::Config(format!(
                "schedule_weeks must be {SCHEDULE_WEEKS}, got {}",
                self.schedule_weeks
            )));
        }
        if self.poll_size != POLL_SIZE {
            return Err(DynastyError::Config(format!(
                "poll_size must be {POLL_SIZE}, got {}",
                self.poll_size
            )));
        }
        if self.store_file.trim().is_empty() {
            return Err(DynastyError::Config("store_file must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }

    /// The configured team directory, or the embedded one.
    pub fn team_directory(&self) -> DynastyResult<TeamDirectory> {
        match &self.teams_file {
            Some(path) => TeamDirectory::from_path(path),
            None => Ok(TeamDirectory::builtin().clone()),
        }
    }
}
