//! Numeric error codes carried by `error` messages.

use std::fmt;

/// Error kind carried in the `code` field of an `error` body.
///
/// Codes below 1000 are reserved by the harness; anything the node does not
/// recognise round-trips through [`ErrorCode::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The requested operation did not complete in time.
    Timeout,
    /// The destination node does not exist.
    NodeNotFound,
    /// The request type is not supported by the receiving node.
    NotSupported,
    /// The operation cannot be served right now; retrying may succeed.
    TemporarilyUnavailable,
    /// The request was malformed.
    MalformedRequest,
    /// The node crashed while handling the request.
    Crash,
    /// The operation was aborted.
    Abort,
    /// The requested key does not exist.
    KeyDoesNotExist,
    /// The key being created already exists.
    KeyAlreadyExists,
    /// A precondition of the operation did not hold.
    PreconditionFailed,
    /// A transaction conflicted with another.
    TxnConflict,
    /// Any code outside the table above.
    Custom(i64),
}

impl ErrorCode {
    /// Returns the integer written to the wire.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Timeout => 0,
            Self::NodeNotFound => 1,
            Self::NotSupported => 10,
            Self::TemporarilyUnavailable => 11,
            Self::MalformedRequest => 12,
            Self::Crash => 13,
            Self::Abort => 14,
            Self::KeyDoesNotExist => 20,
            Self::KeyAlreadyExists => 21,
            Self::PreconditionFailed => 22,
            Self::TxnConflict => 30,
            Self::Custom(code) => code,
        }
    }

    /// Returns `true` when the failed operation is known not to have taken
    /// effect.
    ///
    /// Timeouts and crashes are indefinite. Custom codes are treated as
    /// indefinite because nothing is known about them.
    #[must_use]
    pub const fn is_definite(self) -> bool {
        !matches!(self, Self::Timeout | Self::Crash | Self::Custom(_))
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Timeout,
            1 => Self::NodeNotFound,
            10 => Self::NotSupported,
            11 => Self::TemporarilyUnavailable,
            12 => Self::MalformedRequest,
            13 => Self::Crash,
            14 => Self::Abort,
            20 => Self::KeyDoesNotExist,
            21 => Self::KeyAlreadyExists,
            22 => Self::PreconditionFailed,
            30 => Self::TxnConflict,
            other => Self::Custom(other),
        }
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::NodeNotFound => "node-not-found",
            Self::NotSupported => "not-supported",
            Self::TemporarilyUnavailable => "temporarily-unavailable",
            Self::MalformedRequest => "malformed-request",
            Self::Crash => "crash",
            Self::Abort => "abort",
            Self::KeyDoesNotExist => "key-does-not-exist",
            Self::KeyAlreadyExists => "key-already-exists",
            Self::PreconditionFailed => "precondition-failed",
            Self::TxnConflict => "txn-conflict",
            Self::Custom(_) => "custom",
        };
        write!(f, "{name} ({})", self.code())
    }
}
