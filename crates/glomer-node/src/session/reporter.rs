//! Structured reporting for session events.

use glomer_protocol::DecodeError;

use super::SessionSummary;

/// Tracing target for session events.
pub(crate) const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

/// Observer notified as the session moves through its input.
///
/// Line numbers are 1-based and count blank lines.
pub trait SessionReporter {
    /// Invoked for every non-blank input line before it is decoded.
    fn line_received(&self, line: usize, text: &str);

    /// Invoked for a line holding only whitespace.
    fn blank_line_skipped(&self, line: usize);

    /// Invoked after a reply line has been written and flushed.
    fn response_written(&self, line: usize, text: &str);

    /// Invoked when a line fails to decode and its sender is known.
    fn decode_rejected(&self, line: usize, error: &DecodeError);

    /// Invoked when a line fails to decode and no reply can be addressed.
    fn decode_unaddressable(&self, line: usize, error: &DecodeError);

    /// Invoked once input is exhausted.
    fn session_finished(&self, summary: &SessionSummary);
}

/// Default reporter that records session events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredSessionReporter;

impl StructuredSessionReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SessionReporter for StructuredSessionReporter {
    fn line_received(&self, line: usize, text: &str) {
        tracing::debug!(
            target: SESSION_TARGET,
            event = "line_received",
            line,
            text,
            "received line"
        );
    }

    fn blank_line_skipped(&self, line: usize) {
        tracing::debug!(
            target: SESSION_TARGET,
            event = "blank_line_skipped",
            line,
            "skipped blank line"
        );
    }

    fn response_written(&self, line: usize, text: &str) {
        tracing::debug!(
            target: SESSION_TARGET,
            event = "response_written",
            line,
            text,
            "wrote reply"
        );
    }

    fn decode_rejected(&self, line: usize, error: &DecodeError) {
        tracing::warn!(
            target: SESSION_TARGET,
            event = "decode_rejected",
            line,
            %error,
            "failed to decode line"
        );
    }

    fn decode_unaddressable(&self, line: usize, error: &DecodeError) {
        tracing::warn!(
            target: SESSION_TARGET,
            event = "decode_unaddressable",
            line,
            %error,
            "failed to decode line and cannot address a reply"
        );
    }

    fn session_finished(&self, summary: &SessionSummary) {
        tracing::info!(
            target: SESSION_TARGET,
            event = "session_finished",
            lines_read = summary.lines_read,
            responses_written = summary.responses_written,
            rejected = summary.rejected,
            skipped = summary.skipped,
            "input exhausted"
        );
    }
}
