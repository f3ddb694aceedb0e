//! CLI configuration
//!
//! Values are layered: built-in defaults, then `blueprint.toml`, then
//! `BLUEPRINT_*` environment variables, then command line flags. Every field
//! remembers where its value came from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use blueprint_schema::{Dialect, GrammarConfig, IdentifierPolicy};
use serde::Deserialize;
use thiserror::Error;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "blueprint.toml";

pub const ENV_DIALECT: &str = "BLUEPRINT_DIALECT";
pub const ENV_IDENTIFIERS: &str = "BLUEPRINT_IDENTIFIERS";
pub const ENV_QUOTE: &str = "BLUEPRINT_QUOTE";
pub const ENV_LOG: &str = "BLUEPRINT_LOG";
pub const ENV_LOG_FORMAT: &str = "BLUEPRINT_LOG_FORMAT";
pub const ENV_MIGRATIONS_DIR: &str = "BLUEPRINT_MIGRATIONS_DIR";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default
    Default(String),
    /// Configuration file
    File(String),
    /// Environment variable
    EnvVar(String),
    /// Command line flag
    Flag(String),
}

impl ConfigSource {
    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File(_))
    }

    pub fn description(&self) -> String {
        match self {
            ConfigSource::Default(value) => format!("Default value: {}", value),
            ConfigSource::File(path) => format!("Configuration file: {}", path),
            ConfigSource::EnvVar(var) => format!("Environment variable: {}", var),
            ConfigSource::Flag(flag) => format!("Command line flag: {}", flag),
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Shape of `blueprint.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    dialect: Option<Dialect>,
    identifiers: Option<IdentifierPolicy>,
    quote: Option<char>,
    migrations_dir: Option<PathBuf>,
    log: Option<String>,
    log_format: Option<LogFormat>,
}

/// Resolved CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub dialect: Dialect,
    pub identifiers: IdentifierPolicy,
    pub quote: Option<char>,
    pub migrations_dir: PathBuf,
    pub log: String,
    pub log_format: LogFormat,
    sources: BTreeMap<&'static str, ConfigSource>,
}

impl Default for CliConfig {
    fn default() -> Self {
        let mut config = Self {
            dialect: Dialect::MySql,
            identifiers: IdentifierPolicy::Reject,
            quote: None,
            migrations_dir: PathBuf::from("migrations"),
            log: "warn".to_string(),
            log_format: LogFormat::Text,
            sources: BTreeMap::new(),
        };

        let defaults = [
            ("dialect", config.dialect.to_string()),
            ("identifiers", config.identifiers.to_string()),
            ("quote", "dialect default".to_string()),
            ("migrations_dir", config.migrations_dir.display().to_string()),
            ("log", config.log.clone()),
            ("log_format", config.log_format.to_string()),
        ];
        for (field, value) in defaults {
            config.sources.insert(field, ConfigSource::Default(value));
        }

        config
    }
}

impl CliConfig {
    /// Load defaults, the configuration file and the environment
    ///
    /// An explicit `path` must exist. Without one, `blueprint.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match path {
            Some(path) => config.apply_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    config.apply_file(fallback)?;
                }
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from a TOML file
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&content)?;
        let source = ConfigSource::File(path.display().to_string());

        if let Some(dialect) = file.dialect {
            self.dialect = dialect;
            self.sources.insert("dialect", source.clone());
        }
        if let Some(identifiers) = file.identifiers {
            self.identifiers = identifiers;
            self.sources.insert("identifiers", source.clone());
        }
        if let Some(quote) = file.quote {
            self.quote = Some(quote);
            self.sources.insert("quote", source.clone());
        }
        if let Some(dir) = file.migrations_dir {
            self.migrations_dir = dir;
            self.sources.insert("migrations_dir", source.clone());
        }
        if let Some(log) = file.log {
            self.log = log;
            self.sources.insert("log", source.clone());
        }
        if let Some(format) = file.log_format {
            self.log_format = format;
            self.sources.insert("log_format", source);
        }

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(())
    }

    /// Overlay values from `BLUEPRINT_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = env_var(ENV_DIALECT) {
            self.dialect = value
                .parse()
                .map_err(|_| ConfigError::invalid_value(ENV_DIALECT, &value, "mysql or postgres"))?;
            self.sources.insert("dialect", ConfigSource::EnvVar(ENV_DIALECT.to_string()));
        }

        if let Some(value) = env_var(ENV_IDENTIFIERS) {
            self.identifiers = value
                .parse()
                .map_err(|_| ConfigError::invalid_value(ENV_IDENTIFIERS, &value, "reject or escape"))?;
            self.sources
                .insert("identifiers", ConfigSource::EnvVar(ENV_IDENTIFIERS.to_string()));
        }

        if let Some(value) = env_var(ENV_QUOTE) {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(quote), None) => self.quote = Some(quote),
                _ => return Err(ConfigError::invalid_value(ENV_QUOTE, &value, "a single character")),
            }
            self.sources.insert("quote", ConfigSource::EnvVar(ENV_QUOTE.to_string()));
        }

        if let Some(value) = env_var(ENV_LOG) {
            self.log = value;
            self.sources.insert("log", ConfigSource::EnvVar(ENV_LOG.to_string()));
        }

        if let Some(value) = env_var(ENV_LOG_FORMAT) {
            self.log_format = value
                .parse()
                .map_err(|_| ConfigError::invalid_value(ENV_LOG_FORMAT, &value, "text or json"))?;
            self.sources
                .insert("log_format", ConfigSource::EnvVar(ENV_LOG_FORMAT.to_string()));
        }

        if let Some(value) = env_var(ENV_MIGRATIONS_DIR) {
            self.migrations_dir = PathBuf::from(value);
            self.sources
                .insert("migrations_dir", ConfigSource::EnvVar(ENV_MIGRATIONS_DIR.to_string()));
        }

        Ok(())
    }

    /// Overlay the global command line flags
    pub fn apply_flags(&mut self, dialect: Option<Dialect>, verbose: bool) {
        if let Some(dialect) = dialect {
            self.dialect = dialect;
            self.sources.insert("dialect", ConfigSource::Flag("--dialect".to_string()));
        }
        if verbose {
            self.log = "debug".to_string();
            self.sources.insert("log", ConfigSource::Flag("--verbose".to_string()));
        }
    }

    /// Check that the configuration can build a grammar
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grammar_config()
            .validate()
            .map_err(|e| ConfigError::validation_failed(e.to_string()))?;

        if self.migrations_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value(
                "migrations_dir",
                "",
                "a non-empty directory path",
            ));
        }

        if self.log.trim().is_empty() {
            return Err(ConfigError::invalid_value("log", &self.log, "a tracing filter such as 'info'"));
        }

        Ok(())
    }

    /// Grammar configuration derived from this CLI configuration
    pub fn grammar_config(&self) -> GrammarConfig {
        let config = GrammarConfig::default().with_identifier_policy(self.identifiers);
        match self.quote {
            Some(quote) => config.with_quote(quote),
            None => config,
        }
    }

    /// Where the value of `field` came from
    pub fn source(&self, field: &str) -> Option<&ConfigSource> {
        self.sources.get(field)
    }

    /// Every field with its source, in field-name order
    pub fn sources(&self) -> impl Iterator<Item = (&'static str, &ConfigSource)> {
        self.sources.iter().map(|(field, source)| (*field, source))
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
