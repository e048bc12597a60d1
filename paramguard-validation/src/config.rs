// Engine configuration and document loading

use crate::{RuleConfig, RuleError, RuleSet};
use indexmap::IndexMap;
use paramguard_i18n::Locale;
use paramguard_log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Number of rendered messages kept when no cap is configured.
pub const DEFAULT_MAX_MESSAGES: usize = 10;

/// Environment variable naming the locale of rendered messages.
pub const LOCALE_ENV: &str = "PARAMGUARD_LOCALE";

/// Environment variable holding the display cap.
pub const MAX_MESSAGES_ENV: &str = "PARAMGUARD_MAX_MESSAGES";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid rules: {0}")]
    Rules(#[from] RuleError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Dotenv error: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings of a [`ValidationEngine`](crate::ValidationEngine)
///
/// ```
/// use paramguard_validation::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.max_messages, 10);
/// assert!(config.locale.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Locale of rendered messages; the process-wide locale when unset.
    pub locale: Option<Locale>,

    /// Display cap on rendered messages. `0` keeps every message.
    #[serde(alias = "max_messages")]
    pub max_messages: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: None,
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Read `PARAMGUARD_LOCALE` and `PARAMGUARD_MAX_MESSAGES`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the same variables from a `.env` file. Variables already set in
    /// the process environment take precedence over the file.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        let mut file_vars = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            file_vars.insert(key, value);
        }
        info!("Loaded {} variables from {}", file_vars.len(), path.as_ref().display());

        Self::from_lookup(|key| env::var(key).ok().or_else(|| file_vars.get(key).cloned()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(tag) = lookup(LOCALE_ENV).filter(|v| !v.trim().is_empty()) {
            let locale = Locale::parse(tag.trim()).map_err(|_| {
                warn!("Ignoring configuration: invalid {} {:?}", LOCALE_ENV, tag);
                ConfigError::InvalidValue {
                    key: LOCALE_ENV.to_string(),
                    value: tag.clone(),
                }
            })?;
            config.locale = Some(locale);
        }

        if let Some(raw) = lookup(MAX_MESSAGES_ENV) {
            config.max_messages =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: MAX_MESSAGES_ENV.to_string(),
                        value: raw.clone(),
                    })?;
        }

        Ok(config)
    }

    /// Locale for one validation call.
    pub fn resolve_locale(&self) -> Locale {
        self.locale.clone().unwrap_or_else(Locale::current)
    }

    /// Display cap, `None` when every message is kept.
    pub fn cap(&self) -> Option<usize> {
        (self.max_messages > 0).then_some(self.max_messages)
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Configuration file loader
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    /// Load configuration from file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        self.parse(&Self::read(path.as_ref())?)
    }

    /// Load a typed document from file
    pub fn load_file_as<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T> {
        self.parse_as(&Self::read(path.as_ref())?)
    }

    /// Parse configuration from string
    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => {
                let toml_value: toml::Value = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(toml_value)
                    .map_err(|e| ConfigError::ParseError(format!("TOML to JSON conversion error: {}", e)))
            }
        }
    }

    /// Parse a typed document from string. Tables keep their order when `T`
    /// stores them in an ordered map.
    pub fn parse_as<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e))),
        }
    }

    fn read(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("Failed to read file: {}", e)))?;
        info!("Loaded configuration file {}", path.display());
        Ok(content)
    }
}

/// Engine settings and field rules in one document
///
/// ```toml
/// [engine]
/// locale = "es"
/// max-messages = 5
///
/// [rules.token]
/// label = "Token"
/// min-size = 8
/// regexp = "[A-Za-z0-9+/]+=*"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationDocument {
    pub engine: EngineConfig,
    pub rules: IndexMap<String, RuleConfig>,
}

impl ValidationDocument {
    /// Load a document, detecting its format from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::auto(path.as_ref())?.load_file_as(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        ConfigLoader::new(FileFormat::Toml).parse_as(content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        ConfigLoader::new(FileFormat::Json).parse_as(content)
    }

    /// Build the rules, keeping their declaration order.
    pub fn into_parts(self) -> Result<(EngineConfig, RuleSet)> {
        let rules = RuleSet::from_config(self.rules)?;
        Ok((self.engine, rules))
    }
}
