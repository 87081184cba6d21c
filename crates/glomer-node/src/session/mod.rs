//! Line-in/line-out session loop.
//!
//! The session reads one line at a time, decodes it, lets the dispatcher
//! build the reply, and writes that reply as a single flushed line. A line is
//! fully handled before the next one is read. Blank lines are skipped; lines
//! that fail to decode are handled according to [`DecodeErrorPolicy`].

mod reporter;

use std::io::{self, BufRead, Write};

use glomer_protocol::{DecodeError, EncodeError, Message, decode, encode, salvage_envelope};
use thiserror::Error;

use crate::config::DecodeErrorPolicy;
use crate::dispatch;
use crate::state::NodeState;

pub use self::reporter::{SessionReporter, StructuredSessionReporter};

/// Counters describing a completed session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Lines read from the input, blank lines included.
    pub lines_read: usize,
    /// Reply lines written to the output.
    pub responses_written: usize,
    /// Lines that failed to decode and were answered or passed over.
    pub rejected: usize,
    /// Blank lines passed over.
    pub skipped: usize,
}

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading the next input line failed.
    #[error("failed to read input line {line}: {source}")]
    Read {
        /// Number of the line being read.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line failed to decode under [`DecodeErrorPolicy::Abort`].
    #[error("failed to decode input line {line}: {source}")]
    Decode {
        /// Number of the offending line.
        line: usize,
        /// Underlying decode error.
        #[source]
        source: DecodeError,
    },
    /// A reply could not be encoded.
    #[error("failed to encode reply to line {line}: {source}")]
    Encode {
        /// Number of the line being answered.
        line: usize,
        /// Underlying encode error.
        #[source]
        source: EncodeError,
    },
    /// Writing or flushing a reply failed.
    #[error("failed to write reply to line {line}: {source}")]
    Write {
        /// Number of the line being answered.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Runs the session until `input` is exhausted.
///
/// # Errors
///
/// Returns [`SessionError::Decode`] for an undecodable line when `policy` is
/// [`DecodeErrorPolicy::Abort`], and the other [`SessionError`] variants
/// when reading, encoding or writing fails. Replies written before the error
/// stay written.
pub fn run_session<R, W>(
    input: &mut R,
    output: &mut W,
    state: &mut NodeState,
    policy: DecodeErrorPolicy,
    reporter: &dyn SessionReporter,
) -> Result<SessionSummary, SessionError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut summary = SessionSummary::default();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let line = summary.lines_read + 1;
        let bytes_read = input
            .read_line(&mut buffer)
            .map_err(|source| SessionError::Read { line, source })?;
        if bytes_read == 0 {
            break;
        }
        summary.lines_read = line;

        let text = buffer.trim();
        if text.is_empty() {
            summary.skipped += 1;
            reporter.blank_line_skipped(line);
            continue;
        }

        reporter.line_received(line, text);
        let reply = match handle_line(state, policy, reporter, line, text)? {
            LineOutcome::Reply(reply) => reply,
            LineOutcome::Rejected(reply) => {
                summary.rejected += 1;
                reply
            }
            LineOutcome::Unaddressable => {
                summary.rejected += 1;
                continue;
            }
        };

        let encoded = write_reply(output, line, &reply)?;
        summary.responses_written += 1;
        reporter.response_written(line, &encoded);
    }

    reporter.session_finished(&summary);
    Ok(summary)
}

enum LineOutcome {
    Reply(Message),
    Rejected(Message),
    Unaddressable,
}

fn handle_line(
    state: &mut NodeState,
    policy: DecodeErrorPolicy,
    reporter: &dyn SessionReporter,
    line: usize,
    text: &str,
) -> Result<LineOutcome, SessionError> {
    let error = match decode(text) {
        Ok(request) => return Ok(LineOutcome::Reply(dispatch::respond(state, &request))),
        Err(error) => error,
    };

    match policy {
        DecodeErrorPolicy::Abort => {
            reporter.decode_rejected(line, &error);
            Err(SessionError::Decode {
                line,
                source: error,
            })
        }
        DecodeErrorPolicy::Reply => match salvage_envelope(text) {
            Some(target) => {
                reporter.decode_rejected(line, &error);
                Ok(LineOutcome::Rejected(dispatch::reject(state, &target, &error)))
            }
            None => {
                reporter.decode_unaddressable(line, &error);
                Ok(LineOutcome::Unaddressable)
            }
        },
    }
}

fn write_reply<W>(output: &mut W, line: usize, reply: &Message) -> Result<String, SessionError>
where
    W: Write + ?Sized,
{
    let encoded = encode(reply).map_err(|source| SessionError::Encode { line, source })?;
    output
        .write_all(encoded.as_bytes())
        .map_err(|source| SessionError::Write { line, source })?;
    output
        .write_all(b"\n")
        .map_err(|source| SessionError::Write { line, source })?;
    output
        .flush()
        .map_err(|source| SessionError::Write { line, source })?;
    Ok(encoded)
}
