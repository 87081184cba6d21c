//! Runtime configuration for the node binary.
//!
//! None of these settings change the protocol contract; they govern stderr
//! diagnostics and what the session does with lines it cannot decode.
//! Every option can be given as a flag or through a `GLOMER_*` environment
//! variable, with the flag taking precedence.

use std::ffi::OsString;

use clap::Parser;
use strum::{Display, EnumString};

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// What the session does with a line that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DecodeErrorPolicy {
    /// Stop the session and exit with a failure status.
    #[default]
    Abort,
    /// Answer with an `error` message when the sender can be identified and
    /// carry on with the next line.
    Reply,
}

/// Resolved node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "glomer-node",
    version,
    about = "Line-delimited JSON node for cluster test harnesses"
)]
pub struct Config {
    /// Tracing filter directive for stderr diagnostics.
    #[arg(long, env = "GLOMER_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
    /// Format of stderr diagnostics (`json` or `compact`).
    #[arg(long, env = "GLOMER_LOG_FORMAT", default_value_t = LogFormat::default())]
    pub log_format: LogFormat,
    /// Handling of undecodable input lines (`abort` or `reply`).
    #[arg(
        long,
        env = "GLOMER_ON_DECODE_ERROR",
        default_value_t = DecodeErrorPolicy::default()
    )]
    pub on_decode_error: DecodeErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            on_decode_error: DecodeErrorPolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns a `clap` error for unknown flags or invalid values, and for
    /// `--help`/`--version`, which the caller is expected to `exit()` on.
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is the program name, as with [`std::env::args_os`].
    ///
    /// # Errors
    ///
    /// Returns a `clap` error for unknown flags or invalid values.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Returns the tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the stderr log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the undecodable-line policy.
    #[must_use]
    pub const fn decode_error_policy(&self) -> DecodeErrorPolicy {
        self.on_decode_error
    }
}
