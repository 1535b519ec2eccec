//! Configuration for the fetch pipeline.
//!
//! [`FetchConfig`] is the runtime configuration consumed by
//! [`crate::fetcher::PackageFetcher`]. [`ConfigFile`] is the optional on-disk
//! INI file that can override its defaults:
//!
//! ```ini
//! [store]
//! base_url = https://backapi.rustore.ru
//! timeout_secs = 300
//!
//! [output]
//! directory = .
//! metadata_file = app_info.json
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

/// Default RuStore backend base URL.
pub const DEFAULT_BASE_URL: &str = "https://backapi.rustore.ru";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Default name of the metadata side-car file.
pub const DEFAULT_METADATA_FILE: &str = "app_info.json";

/// Directory name under the platform config dir.
const CONFIG_DIR_NAME: &str = "rustore-fetch";

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Runtime configuration for a fetch run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Directory the package file is written to.
    pub output_dir: PathBuf,

    /// Path of the metadata side-car.
    ///
    /// Relative paths resolve against the current directory.
    pub metadata_path: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_dir: PathBuf::from("."),
            metadata_path: PathBuf::from(DEFAULT_METADATA_FILE),
        }
    }
}

impl FetchConfig {
    /// Set the backend base URL. A trailing slash is stripped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the package output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the metadata side-car path.
    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }
}

/// Errors reading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// `[store]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSection {
    pub directory: Option<PathBuf>,
    pub metadata_file: Option<PathBuf>,
}

/// Contents of the optional INI config file.
///
/// Unset keys keep the [`FetchConfig`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub store: StoreSection,
    pub output: OutputSection,
}

/// Path of the config file in the platform config directory.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

impl ConfigFile {
    /// Load the config file from [`config_file_path`].
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load the config file from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    /// Parse config from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(store) = ini.section(Some("store")) {
            config.store.base_url = non_empty(store.get("base_url")).map(str::to_string);
            if let Some(value) = non_empty(store.get("timeout_secs")) {
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "store.timeout_secs".to_string(),
                        value: value.to_string(),
                    })?;
                config.store.timeout_secs = Some(secs);
            }
        }

        if let Some(output) = ini.section(Some("output")) {
            config.output.directory = non_empty(output.get("directory")).map(PathBuf::from);
            config.output.metadata_file =
                non_empty(output.get("metadata_file")).map(PathBuf::from);
        }

        Ok(config)
    }

    /// Build the runtime configuration, applying file values over defaults.
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();

        if let Some(ref url) = self.store.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.store.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(ref dir) = self.output.directory {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(ref file) = self.output.metadata_file {
            config = config.with_metadata_path(file.clone());
        }

        config
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
