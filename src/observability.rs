//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. `init_tracing` is a convenience for hosts that do not have
//! their own setup.
//!
//! ```rust,ignore
//! use ondevice_ai::observability::{init_tracing, OutputFormat, TracingConfig};
//!
//! let _guard = init_tracing(
//!     TracingConfig::builder()
//!         .level(tracing::Level::DEBUG)
//!         .output_format(OutputFormat::Json)
//!         .build(),
//! )?;
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::AiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    Json,
    /// Single-line text without span context
    Compact,
}

impl FromStr for OutputFormat {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(AiError::ConfigError(format!(
                "invalid log format: {other}. Valid options: text, json, compact"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: tracing::Level,
    pub output_format: OutputFormat,
    /// Full filter directive; overrides `level` when set.
    pub filter: Option<String>,
    /// Write to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            filter: None,
            log_file: None,
        }
    }
}

impl TracingConfig {
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::default()
    }

    pub fn debug() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    /// Build a config from `ONDEVICE_AI_LOG_LEVEL`, `ONDEVICE_AI_LOG_FORMAT`
    /// and `ONDEVICE_AI_LOG_FILE`.
    pub fn from_env() -> Result<Self, AiError> {
        let mut builder = Self::builder();
        if let Ok(level) = std::env::var("ONDEVICE_AI_LOG_LEVEL") {
            builder = builder.level_str(&level)?;
        }
        if let Ok(format) = std::env::var("ONDEVICE_AI_LOG_FORMAT") {
            builder = builder.output_format(format.parse()?);
        }
        if let Ok(path) = std::env::var("ONDEVICE_AI_LOG_FILE") {
            builder = builder.log_file(path);
        }
        Ok(builder.build())
    }

    fn env_filter(&self) -> Result<EnvFilter, AiError> {
        let directive = match &self.filter {
            Some(filter) => filter.clone(),
            None => format!("ondevice_ai={}", self.level.as_str().to_ascii_lowercase()),
        };
        EnvFilter::try_new(&directive)
            .map_err(|e| AiError::ConfigError(format!("invalid log filter {directive:?}: {e}")))
    }
}

#[derive(Debug, Default)]
pub struct TracingConfigBuilder {
    level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    filter: Option<String>,
    log_file: Option<PathBuf>,
}

impl TracingConfigBuilder {
    pub fn level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the level from `trace`, `debug`, `info`, `warn` or `error`.
    pub fn level_str(mut self, level: &str) -> Result<Self, AiError> {
        let level = tracing::Level::from_str(level).map_err(|_| {
            AiError::ConfigError(format!(
                "invalid log level: {level}. Valid options: trace, debug, info, warn, error"
            ))
        })?;
        self.level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn filter(mut self, directive: impl Into<String>) -> Self {
        self.filter = Some(directive.into());
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn build(self) -> TracingConfig {
        TracingConfig {
            level: self.level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            filter: self.filter,
            log_file: self.log_file,
        }
    }
}

/// Keeps the background log writer alive. Dropping it flushes file output.
#[derive(Debug)]
#[must_use = "dropping the guard stops file logging"]
pub struct TracingGuard {
    _worker: Option<WorkerGuard>,
}

/// Install a global subscriber for `config`.
///
/// Succeeds without changes if a global subscriber is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<TracingGuard, AiError> {
    let filter = config.env_filter()?;

    let (writer, worker, ansi) = match &config.log_file {
        Some(path) => {
            let directory = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let file_name = path.file_name().ok_or_else(|| {
                AiError::ConfigError(format!("log file path has no file name: {}", path.display()))
            })?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);
    let init_result = match config.output_format {
        OutputFormat::Text => builder.try_init(),
        OutputFormat::Compact => builder.compact().try_init(),
        OutputFormat::Json => builder.json().with_current_span(true).try_init(),
    };

    match init_result {
        Ok(()) => Ok(TracingGuard { _worker: worker }),
        Err(e) if e.to_string().contains("already") => {
            tracing::debug!("global subscriber already installed");
            Ok(TracingGuard { _worker: None })
        }
        Err(e) => Err(AiError::ConfigError(format!(
            "failed to initialize tracing: {e}"
        ))),
    }
}
