use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for timever.
///
/// Contains the generator overrides, application identity, file locations and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Overrides passed to the version file generator.
///
/// `change`, when present, is used as the new version verbatim.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub change: Option<String>,

    /// Reject an unrecognised `change` before touching any file
    #[serde(default)]
    pub strict: bool,
}

impl GeneratorConfig {
    pub fn with_change(change: impl Into<String>) -> Self {
        GeneratorConfig {
            change: Some(change.into()),
            ..Default::default()
        }
    }
}

/// Application identity used when rendering the version file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppSection {
    /// Module that wraps `VERSION`. Falls back to the existing version file,
    /// then to the camel-cased name of the application root.
    #[serde(default)]
    pub namespace: Option<String>,
}

fn default_version_file() -> PathBuf {
    PathBuf::from("config").join("version.rb")
}

fn default_application_file() -> PathBuf {
    PathBuf::from("config").join("application.rb")
}

/// File locations, relative to the application root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default = "default_application_file")]
    pub application_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            version_file: default_version_file(),
            application_file: default_application_file(),
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    /// Print the report line with its historical "You're" wording
    #[serde(default)]
    pub legacy_report_message: bool,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `timever.toml` in current directory
/// 3. `.timever.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./timever.toml").exists() {
        fs::read_to_string("./timever.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".timever.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
