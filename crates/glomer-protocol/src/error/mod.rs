//! Errors raised while moving messages between text and memory.

use thiserror::Error;

use crate::ErrorCode;

/// Errors raised when a line cannot be decoded into a [`Message`](crate::Message).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The line is not syntactically valid JSON.
    #[error("malformed JSON: {message}")]
    Syntax {
        /// Description of the syntax problem.
        message: String,
        /// Underlying parser error, when the parser produced one.
        #[source]
        source: Option<serde_json::Error>,
    },
    /// The JSON is well formed but does not have the shape of a message.
    #[error("invalid message structure: {message}")]
    InvalidStructure {
        /// Description of the missing or mistyped field.
        message: String,
        /// Underlying deserializer error, when one was produced.
        #[source]
        source: Option<serde_json::Error>,
    },
    /// `body.type` names a message type outside the closed tag set.
    #[error("unknown message type '{tag}'")]
    UnknownType {
        /// The tag found on the wire.
        tag: String,
    },
}

impl DecodeError {
    /// Classifies a `serde_json` error as a syntax or structure failure.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        let message = source.to_string();
        if source.is_data() {
            Self::InvalidStructure {
                message,
                source: Some(source),
            }
        } else {
            Self::Syntax {
                message,
                source: Some(source),
            }
        }
    }

    /// Creates a syntax error with a custom message.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a structure error with a custom message.
    #[must_use]
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(tag: impl Into<String>) -> Self {
        Self::UnknownType { tag: tag.into() }
    }

    /// Returns the code an `error` reply to the offending line should carry.
    #[must_use]
    pub const fn reply_code(&self) -> ErrorCode {
        match self {
            Self::Syntax { .. } | Self::InvalidStructure { .. } => ErrorCode::MalformedRequest,
            Self::UnknownType { .. } => ErrorCode::NotSupported,
        }
    }
}

/// Errors raised when a [`Message`](crate::Message) cannot be encoded.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The serializer rejected the message.
    #[error("failed to serialize message: {source}")]
    Serialize {
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}
