//! # Logger
//!
//! Logging setup shared by the scaffolding command-line tools.
//!
//! Console output is written to **stderr**, so stdout stays reserved for the
//! results a tool prints for its user (created files, listings). A daily
//! rolling file sink can be added with [`LoggerBuilder::path`].
//!
//! * Use [`verbosity_level`] to turn a repeated `-v` flag into a [`LevelFilter`].
//! * `RUST_LOG` directives (e.g., `"ssgen_scaffold=trace"`) take precedence
//!   over the configured level.
//!
//! ## Example
//!
//! ```rust
//! # use ssgen_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("addsubsys")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use private::Sealed;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Daily log files kept in the log directory.
pub const MAX_LOG_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

/// Maps the number of `-v` occurrences on a command line to a level.
///
/// No flag keeps the tool quiet apart from warnings.
#[must_use]
pub const fn verbosity_level(occurrences: u8) -> LevelFilter {
    match occurrences {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[derive(Debug)]
pub struct LoggerConfig {
    path: Option<PathBuf>,
    level: LevelFilter,
    json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { path: None, level: LevelFilter::WARN, json: false }
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
///
/// A name is mandatory; every other setting has a default suited to a
/// short-lived command-line process.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Configures the level from a `-v` occurrence count, see [`verbosity_level`].
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn verbosity(self, occurrences: u8) -> Self {
        self.level(verbosity_level(occurrences))
    }

    /// Also writes logs to daily files `<name>.<date>.log` inside `path`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    /// Emits JSON lines to the log file. Only affects file output.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. When file output is enabled the handle owns the
    /// [`WorkerGuard`] of the non-blocking writer and must be kept alive until
    /// the process exits.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an empty name,
    /// [`LoggerError::Io`] or [`LoggerError::Appender`] when the log directory
    /// cannot be prepared, and [`LoggerError::Subscriber`] if a global subscriber
    /// has already been set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.0.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }

        let env_filter =
            EnvFilter::builder().with_default_directive(self.config.level.into()).from_env_lossy();

        let console = layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .boxed();
        let mut layers = vec![console];

        let guard = if let Some(path) = self.config.path {
            fs::create_dir_all(&path)
                .context(format!("Failed to create log directory {}", path.display()))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(MAX_LOG_FILES)
                .build(&path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            layers.push(if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        tracing::trace!(name = %self.name.0, "Logger initialized");
        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Dropping it flushes and stops the file writer, if one was configured.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Whether a log file is being written.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers...");
        }
    }
}
