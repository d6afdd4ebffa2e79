use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend base URL
pub const ENV_API_URL: &str = "SPRINTBOARD_API_URL";

/// Environment variable naming the requirements-generation service
pub const ENV_GENERATION_URL: &str = "SPRINTBOARD_GENERATION_URL";

/// Environment variable overriding the config file location
pub const ENV_CONFIG_PATH: &str = "SPRINTBOARD_CONFIG";

/// Where the client sends its requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the REST backend
    pub api_base_url: String,

    /// Requirements-generation service; requests fail with a 500 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_url: Option<String>,

    /// Request timeout; reqwest's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            generation_url: None,
            timeout_secs: None,
        }
    }
}

/// Config file contents; every key is optional
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    generation_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Loads defaults, then the config file if present, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        let file = if path.exists() {
            Some(FileConfig::read(&path)?)
        } else {
            None
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit config file that must exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = FileConfig::read(path.as_ref())?;
        Self::resolve(Some(file), |key| std::env::var(key).ok())
    }

    fn resolve<F>(file: Option<FileConfig>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let mut config = Config::default();

        if let Some(url) = non_empty(file.api_base_url) {
            config.api_base_url = url;
        }
        config.generation_url = non_empty(file.generation_url);
        config.timeout_secs = file.timeout_secs;

        if let Some(url) = non_empty(env(ENV_API_URL)) {
            config.api_base_url = url;
        }
        if let Some(url) = non_empty(env(ENV_GENERATION_URL)) {
            config.generation_url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the URLs look like HTTP endpoints
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("api_base_url", &self.api_base_url)?;
        if let Some(url) = &self.generation_url {
            check_url("generation_url", url)?;
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Saves the config as YAML, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_error = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };

        let content = serde_yaml::to_string(self).map_err(|e| write_error(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| write_error(e.to_string()))
    }
}

fn check_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("'{}' is not an http(s) URL", url),
        })
    }
}

/// Gets the path to the config file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirMissing)?;
    Ok(home_dir.join(".sprintboard.yaml"))
}
