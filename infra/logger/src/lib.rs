//! # Logger
//!
//! Process-wide `tracing` setup for the paywall binaries.
//!
//! * Compact ANSI console output.
//! * Optional rolling file output (plain or JSON) written by a non-blocking worker.
//! * Filtering from a default directive such as `"info"` or
//!   `"paywall=debug,tower_http=info"`; `RUST_LOG` takes precedence when set.
//!
//! ## Example
//!
//! ```rust
//! # use paywall_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("my-app")
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

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct Settings {
    console: bool,
    directory: Option<PathBuf>,
    directive: String,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            directory: None,
            directive: LevelFilter::INFO.to_string(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
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

/// A builder for the global tracing subscriber. [`LoggerBuilder::init`] is only
/// available once a name has been set.
#[must_use = "The builder must be configured before it can be used to initialize the logger."]
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    name: N,
    settings: Settings,
}

impl LoggerBuilder<NoName> {
    /// Sets the name used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { name: WithName(name.into()), settings: self.settings }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    /// Minimum level emitted when no finer directive is given.
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.settings.directive = level.to_string();
        self
    }

    /// Default filter directive (e.g., `paywall=debug,hyper=info`).
    ///
    /// `RUST_LOG` still wins when present. Invalid directives make
    /// [`LoggerBuilder::init`] fail.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.settings.directive = directive.into();
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Enables rolling file output into `directory`; `None` keeps console only.
    pub fn directory(mut self, directory: Option<impl Into<PathBuf>>) -> Self {
        self.settings.directory = directory.map(Into::into);
        self
    }

    /// Writes JSON lines to the log files. Console output stays human-readable.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.settings.json = enabled;
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }
}

impl LoggerBuilder<WithName> {
    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// The returned [`Logger`] owns the file worker guard; keep it alive until
    /// shutdown so buffered lines are flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`,
    ///   a malformed directive, or when no output is enabled.
    /// * [`LoggerError::Io`] if the log directory cannot be created.
    /// * [`LoggerError::Appender`] if the rolling file appender fails to start.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { name: WithName(name), settings } = self;
        validate(&name, &settings)?;

        let filter = env_filter(&settings.directive)?;
        let mut layers = Vec::new();

        if settings.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &settings.directory {
            Some(directory) => {
                fs::create_dir_all(directory)
                    .context(format!("Failed to create {}", directory.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(settings.rotation.clone())
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(settings.max_files)
                    .build(directory)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file = layer().with_writer(writer).with_ansi(false);
                layers.push(if settings.json { file.json().boxed() } else { file.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No output enabled; turn on the console or set a directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background file worker guard. Drop it only when the application
/// is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { name: NoName, settings: Settings::default() }
    }

    /// Returns the file worker guard, present only when file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(name: &str, settings: &Settings) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }
    if settings.directory.is_some() && settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn env_filter(directive: &str) -> Result<EnvFilter, LoggerError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).parse(directive).map_err(
        |e| LoggerError::InvalidConfiguration {
            message: format!("Invalid filter directive '{directive}': {e}").into(),
            context: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("test-app");
        assert!(builder.settings.console);
        assert!(!builder.settings.json);
        assert_eq!(builder.settings.directive, "info");
        assert!(builder.settings.directory.is_none());
    }

    #[test]
    fn builder_configuration() {
        let builder = Logger::builder()
            .name("test-app")
            .directive("paywall=debug")
            .directory(Some("/tmp/logs"))
            .json(true)
            .max_files(5);

        assert_eq!(builder.settings.directive, "paywall=debug");
        assert_eq!(builder.settings.directory, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(builder.settings.max_files, 5);
        assert!(builder.settings.json);

        let builder = builder.level(LevelFilter::WARN);
        assert_eq!(builder.settings.directive, "warn");
    }

    #[test]
    #[serial]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("   ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn no_output_is_rejected() {
        let err = Logger::builder().name("silent").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn zero_max_files_with_directory_is_rejected() {
        let settings = Settings { directory: Some("/tmp".into()), max_files: 0, ..Settings::default() };
        assert!(validate("app", &settings).is_err());
    }
}
