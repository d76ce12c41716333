//! Configuration loading and typed config structures for the samples.
//!
//! The configuration lives in `samples-config.yaml` at the project root
//! (override the path with `SAMPLES_CONFIG`). Every field has a default, so
//! an absent file or an empty document yields a usable configuration.
//!
//! Environment variables override YAML values:
//! - `EVIDENCE_NAMESPACE` overrides `registry.namespace`
//! - `CRATE_NAME` overrides `journey.crate_name`
//! - `JOURNEY_DELAY_MS` overrides `journey.delay_ms`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "samples-config.yaml";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "SAMPLES_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level samples configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SamplesConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registry settings shared by every sample.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Shipping-crate journey settings.
    #[serde(default)]
    pub journey: JourneyConfig,

    /// Software package scenario settings.
    #[serde(default)]
    pub sbom: SbomConfig,
}

impl SamplesConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is unusable.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is unusable.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_overrides_from(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `$SAMPLES_CONFIG`, or from `samples-config.yaml` if that
    /// file exists, or fall back to defaults.
    ///
    /// # Errors
    ///
    /// As [`from_file`](Self::from_file). A file named by
    /// `SAMPLES_CONFIG` must exist.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::from_file(&path)?, Some(path)));
        }
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            return Ok((Self::from_file(&path)?, Some(path)));
        }
        Ok((Self::parse("")?, None))
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `JOURNEY_DELAY_MS` is not a
    /// number.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("EVIDENCE_NAMESPACE") {
            self.registry.namespace = Some(val).filter(|ns| !ns.trim().is_empty());
        }
        if let Some(val) = lookup("CRATE_NAME") {
            self.journey.crate_name = Some(val).filter(|name| !name.trim().is_empty());
        }
        if let Some(val) = lookup("JOURNEY_DELAY_MS") {
            self.journey.delay_ms = val.trim().parse().map_err(|e| ConfigError::Invalid {
                reason: format!("invalid JOURNEY_DELAY_MS {val:?}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.journey.fast_forward == 0 {
            return Err(ConfigError::Invalid {
                reason: "journey.fast_forward must be at least 1".to_owned(),
            });
        }
        if self.journey.crate_display_type.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "journey.crate_display_type must not be blank".to_owned(),
            });
        }
        if self.sbom.package_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "sbom.package_name must not be blank".to_owned(),
            });
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Registry settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Suffix appended to record names so parallel runs do not collide.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Shipping-crate journey settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JourneyConfig {
    /// Crate to move. When unset, the first crate of the display type is
    /// used.
    #[serde(default)]
    pub crate_name: Option<String>,

    /// Display type of crate records.
    #[serde(default = "default_crate_display_type")]
    pub crate_display_type: String,

    /// Create the named crate if it does not exist yet.
    #[serde(default = "default_true")]
    pub seed_crate: bool,

    /// Real milliseconds between consecutive stops.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Declared time speed-up.
    #[serde(default = "default_fast_forward")]
    pub fast_forward: u32,

    /// Declared time starts at midnight UTC this many days ago.
    #[serde(default = "default_start_days_ago")]
    pub start_days_ago: u32,

    /// Issuer of the crate's tracker principal.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Units reported on board.
    #[serde(default = "default_units")]
    pub units: u32,
}

impl JourneyConfig {
    /// Delay between stops.
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            crate_name: None,
            crate_display_type: default_crate_display_type(),
            seed_crate: default_true(),
            delay_ms: default_delay_ms(),
            fast_forward: default_fast_forward(),
            start_days_ago: default_start_days_ago(),
            issuer: default_issuer(),
            units: default_units(),
        }
    }
}

/// Software package scenario settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SbomConfig {
    /// Package record name.
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Package record description.
    #[serde(default = "default_package_description")]
    pub description: String,

    /// Directory whose files are attached to the release.
    #[serde(default)]
    pub attachments_dir: Option<PathBuf>,
}

impl Default for SbomConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            description: default_package_description(),
            attachments_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_crate_display_type() -> String {
    "Widget shipping crate".to_owned()
}

const fn default_true() -> bool {
    true
}

const fn default_delay_ms() -> u64 {
    500
}

const fn default_fast_forward() -> u32 {
    crate::time_warp::DEFAULT_FAST_FORWARD
}

const fn default_start_days_ago() -> u32 {
    1
}

fn default_issuer() -> String {
    "1944.smarttags.synsation.io".to_owned()
}

const fn default_units() -> u32 {
    crate::journey::DEFAULT_UNITS
}

fn default_package_name() -> String {
    "Synsation Widget Firmware".to_owned()
}

fn default_package_description() -> String {
    "Firmware for the Synsation smart widget range".to_owned()
}
