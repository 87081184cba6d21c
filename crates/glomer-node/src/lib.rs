//! Cluster test-harness node speaking line-delimited JSON over stdio.
//!
//! The node reads one message per line, answers `init`, `echo` and
//! `generate` requests, and writes exactly one reply line for every line it
//! processes. Replies to `generate` carry identifiers of the form
//! `<node-id>.<counter>`, which stay unique across the cluster because node
//! identities are distinct.
//!
//! The binary wires [`Config`], [`telemetry::initialise`] and [`run`] to the
//! process's standard streams; the same pieces can be driven in-process with
//! any [`BufRead`] and [`Write`] pair:
//!
//! ```
//! use std::io::Cursor;
//!
//! use glomer_node::{Config, run};
//!
//! let input = concat!(
//!     r#"{"src":"c0","dest":"n1","body":{"type":"init","msg_id":1,"node_id":"n1","node_ids":["n1"]}}"#,
//!     "\n",
//!     r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"echo":"hello"}}"#,
//!     "\n",
//! );
//! let mut output = Vec::new();
//! let summary = run(&Config::default(), &mut Cursor::new(input), &mut output)
//!     .expect("session succeeds");
//!
//! assert_eq!(summary.responses_written, 2);
//! let text = String::from_utf8(output).expect("utf8 output");
//! assert!(text.ends_with(
//!     "{\"src\":\"n1\",\"dest\":\"c1\",\"body\":{\"type\":\"echo_ok\",\"msg_id\":1,\"in_reply_to\":1,\"echo\":\"hello\"}}\n"
//! ));
//! ```

pub mod config;
mod dispatch;
mod session;
mod state;
pub mod telemetry;

#[cfg(test)]
mod tests;

use std::io::{BufRead, Write};

pub use self::config::{Config, DEFAULT_LOG_FILTER, DecodeErrorPolicy, LogFormat};
pub use self::dispatch::{reject, respond};
pub use self::session::{
    SessionError, SessionReporter, SessionSummary, StructuredSessionReporter, run_session,
};
pub use self::state::{IdentityAssignment, NodeState};
pub use self::telemetry::{TelemetryError, TelemetryHandle};

/// Runs a fresh node over `input` and `output` using the structured reporter.
///
/// # Errors
///
/// Returns a [`SessionError`] when the session ends early; see
/// [`run_session`].
pub fn run<R, W>(
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> Result<SessionSummary, SessionError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut state = NodeState::new();
    run_session(
        input,
        output,
        &mut state,
        config.decode_error_policy(),
        &StructuredSessionReporter::new(),
    )
}
