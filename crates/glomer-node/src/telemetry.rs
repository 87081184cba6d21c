//! Structured diagnostics for the node.
//!
//! Protocol lines own stdout, so every diagnostic goes to stderr. The
//! subscriber is assembled by [`build_dispatch`] around any writer, which
//! keeps the formatting testable; [`initialise`] points it at stderr and
//! installs it for the whole process.
//!
//! Events carry their target (`glomer-node::dispatch`,
//! `glomer-node::session`) and, for session events, an `event` field naming
//! what happened, so `--log-filter` directives and log queries can select
//! either layer.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::Dispatch;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::fmt::{self, MakeWriter};

use crate::config::{Config, LogFormat};

static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Describes the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Returns the format the installed subscriber writes.
    ///
    /// Later calls to [`initialise`] report the first installation's format.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        /// The rejected directive.
        filter: String,
        /// Parser error from `tracing-subscriber`.
        #[source]
        source: ParseError,
    },
    /// A global subscriber was installed by someone else first.
    #[error("failed to install telemetry subscriber: {source}")]
    Install {
        /// Error reported by `tracing`.
        #[source]
        source: SetGlobalDefaultError,
    },
}

/// Builds the node's subscriber, writing formatted events to `writer`.
///
/// `ansi` enables terminal colour codes.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] if the configured filter does not
/// parse.
///
/// # Examples
///
/// ```rust
/// use glomer_node::{Config, telemetry};
///
/// let dispatch = telemetry::build_dispatch(&Config::default(), std::io::sink, false)
///     .expect("default filter parses");
/// tracing::dispatcher::with_default(&dispatch, || {
///     tracing::info!("written to the sink");
/// });
/// ```
pub fn build_dispatch<W>(
    config: &Config,
    writer: W,
    ansi: bool,
) -> Result<Dispatch, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(config.log_filter()).map_err(|source| {
        TelemetryError::Filter {
            filter: config.log_filter().to_owned(),
            source,
        }
    })?;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Dispatch::new(
            builder
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish(),
        ),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
    })
}

/// Installs the stderr subscriber for the process on first use.
///
/// Repeated calls return the handle of the first installation.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] if the configured filter does not
/// parse, or [`TelemetryError::Install`] if another global subscriber was
/// installed outside this function.
///
/// # Examples
///
/// ```rust
/// use glomer_node::{Config, LogFormat, telemetry};
///
/// # fn main() -> Result<(), glomer_node::TelemetryError> {
/// let handle = telemetry::initialise(&Config::default())?;
/// assert_eq!(handle.format(), LogFormat::Json);
/// assert_eq!(telemetry::initialise(&Config::default())?, handle);
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED_FORMAT
        .get_or_try_init(|| install_stderr(config))
        .map(|format| TelemetryHandle { format: *format })
}

fn install_stderr(config: &Config) -> Result<LogFormat, TelemetryError> {
    let dispatch = build_dispatch(config, io::stderr, io::stderr().is_terminal())?;
    tracing::dispatcher::set_global_default(dispatch)
        .map_err(|source| TelemetryError::Install { source })?;
    Ok(config.log_format())
}
