//! # Logger
//!
//! Centralized `tracing` setup for the workspace binaries.
//! Console output on stderr, an optional rolling log file (plain or JSON) written through a
//! non-blocking worker, and `EnvFilter`-based level control (`RUST_LOG` still applies).
//!
//! ## Example
//!
//! ```rust
//! # use cdmi_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("cdmi")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct FileSink {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileSink>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { console: true, level: LevelFilter::INFO, env_filter: None, file: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the logger name, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds explicit filter directives (e.g., `cdmi_storage=trace`).
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Writes logs into daily-rotated files inside `directory`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.file = Some(FileSink {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        });
        self
    }

    /// Rotation strategy of the file sink. No-op without [`LoggerBuilder::directory`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.rotation = rotation;
        }
        self
    }

    /// Number of rotated files kept. No-op without [`LoggerBuilder::directory`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.max_files = max;
        }
        self
    }

    /// Emits JSON lines into the file sink. No-op without [`LoggerBuilder::directory`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn json(mut self, enabled: bool) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.json = enabled;
        }
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// The returned [`Logger`] owns the file writer's [`WorkerGuard`]; keep it alive until
    /// shutdown or buffered lines are lost.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, bad filter
    ///   directives, or when no output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate(&self.config, &name)?;

        let filter = build_env_filter(&self.config)?;
        let mut layers = Vec::new();

        if self.config.console {
            layers.push(layer().compact().with_writer(std::io::stderr).with_ansi(true).boxed());
        }

        let guard = match self.config.file {
            Some(sink) => {
                fs::create_dir_all(&sink.directory).context(format!(
                    "Failed to create log directory: {}",
                    sink.directory.display()
                ))?;

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation)
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.directory)?;

                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled; enable the console or a log directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Dropping it flushes and stops the background file writer.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Whether a file sink (and therefore a worker guard) is active.
    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.file.as_ref().is_some_and(|f| f.max_files == 0) {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        }),
    }
}
