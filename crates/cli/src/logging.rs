//! Logging setup for the command line tool
//!
//! Logs go to stderr so rendered SQL on stdout stays clean. `RUST_LOG`
//! takes precedence over the configured filter.

use std::io;

use serde_json::json;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{CliConfig, LogFormat};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Enable JSON structured logging (vs plain text)
    pub json_format: bool,
    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Logging configuration for a resolved CLI configuration
    pub fn from_cli(config: &CliConfig) -> Self {
        let debugging = config.log.contains("debug") || config.log.contains("trace");

        Self {
            level: config.log.clone(),
            json_format: config.log_format == LogFormat::Json,
            include_location: debugging,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset
    ///
    /// A bare level keeps third-party crates at `warn` while this tool and
    /// the schema library log at the requested level.
    pub fn filter_directive(&self) -> String {
        if self.level.contains('=') || self.level.contains(',') {
            self.level.clone()
        } else {
            format!("warn,blueprint={0},blueprint_schema={0}", self.level)
        }
    }
}

/// Initialize logging for the process
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))?;

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stderr)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .json(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                Layer::new()
                    .with_writer(io::stderr)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .try_init()?;
    }

    let init_msg = json!({
        "message": "logging initialized",
        "level": config.level,
        "format": if config.json_format { "json" } else { "text" },
    });
    tracing::debug!(target: "blueprint::logging", "{}", init_msg);

    Ok(())
}
