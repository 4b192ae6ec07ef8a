//! Logging setup for the topology simulator
//!
//! Every crate in the workspace logs through `tracing` with structured
//! fields (`node`, `from`, `to`, `hop`, `topology`). This crate only wires
//! up the subscriber: console output in one of three formats, optional JSON
//! lines to a file, and an `EnvFilter` that honours `RUST_LOG`.
//!
//! # Quick Start
//!
//! ```ignore
//! use topo_logging::{LogConfig, SubscriberBuilder};
//!
//! // Compact console output at info
//! let _guard = SubscriberBuilder::new().init()?;
//!
//! // Development mode with pretty human-readable output
//! let _guard = SubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```
//!
//! The returned guard flushes the file writer when dropped; keep it alive
//! for the duration of the program.

pub mod config;

pub use config::{ConsoleConfig, ConsoleFormat, FileConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LogError {
    /// The configured level is not a valid filter directive
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    /// The log file or its directory could not be created
    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber was already installed
    #[error("Subscriber already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Builder for configuring and initializing the logging subscriber
#[derive(Debug, Clone, Default)]
pub struct SubscriberBuilder {
    config: LogConfig,
}

impl SubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Set the console line format
    pub fn with_format(mut self, format: ConsoleFormat) -> Self {
        self.config.console.format = format;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// The configuration this builder will install
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Build the filter: `RUST_LOG` if set, otherwise the configured level
    pub fn filter(&self) -> Result<EnvFilter, LogError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.config.default_level)
                .map_err(|_| LogError::InvalidFilter(self.config.default_level.clone())),
        }
    }

    /// Install the subscriber globally
    ///
    /// Returns the file writer's guard when file output is enabled.
    pub fn init(self) -> Result<Option<WorkerGuard>, LogError> {
        let filter = self.filter()?;
        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            layers.push(console_layer(&self.config.console));
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            layers.push(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(writer)
                    .boxed(),
            );
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()?;

        Ok(guard)
    }
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    match config.format {
        ConsoleFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(config.ansi)
            .with_target(true)
            .boxed(),
        ConsoleFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(config.ansi)
            .with_target(false)
            .boxed(),
        ConsoleFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .flatten_event(true)
            .boxed(),
    }
}

/// Create the non-blocking file writer; truncates for `Never`, appends otherwise
fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LogError> {
    fs::create_dir_all(&config.directory)?;
    let writer = match config.rotation {
        RotationStrategy::Never => {
            let path = config.directory.join(format!("{}.log", config.prefix));
            tracing_appender::non_blocking(File::create(path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &config.directory,
            &config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &config.directory,
            &config.prefix,
        )),
    };
    Ok(writer)
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() -> Result<Option<WorkerGuard>, LogError> {
    SubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
}

/// Initialize logging for testing; a no-op if a subscriber is already set
pub fn init_testing() {
    let _ = SubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}
