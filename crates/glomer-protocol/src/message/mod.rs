//! In-memory message model.
//!
//! A [`Message`] pairs an [`Envelope`] (addressing and correlation fields
//! shared by every message) with a [`Payload`] (the variant-specific body).
//! Messages are built once, either by [`decode`](crate::decode) or by the
//! node's dispatcher, and never mutated afterwards.

use crate::{ErrorCode, MessageKind};

/// Addressing and correlation fields common to every message.
///
/// # Example
///
/// ```
/// use glomer_protocol::Envelope;
///
/// let envelope = Envelope::new("n1", "c1").with_msg_id(3).with_in_reply_to(7);
/// assert_eq!(envelope.src(), "n1");
/// assert_eq!(envelope.dest(), "c1");
/// assert_eq!(envelope.msg_id(), Some(3));
/// assert_eq!(envelope.in_reply_to(), Some(7));
/// assert_eq!(envelope.id(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    src: String,
    dest: String,
    id: Option<u64>,
    msg_id: Option<u64>,
    in_reply_to: Option<u64>,
}

impl Envelope {
    /// Creates an envelope addressed from `src` to `dest` with no ids set.
    #[must_use]
    pub fn new(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            id: None,
            msg_id: None,
            in_reply_to: None,
        }
    }

    /// Attaches the numeric correlation id.
    #[must_use]
    pub const fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Attaches the sender-assigned message id.
    #[must_use]
    pub const fn with_msg_id(mut self, msg_id: u64) -> Self {
        self.msg_id = Some(msg_id);
        self
    }

    /// Links the message to the `msg_id` it answers.
    #[must_use]
    pub const fn with_in_reply_to(mut self, in_reply_to: u64) -> Self {
        self.in_reply_to = Some(in_reply_to);
        self
    }

    /// Replaces the correlation id, clearing it when `None`.
    #[must_use]
    pub const fn with_optional_id(mut self, id: Option<u64>) -> Self {
        self.id = id;
        self
    }

    /// Replaces the sender-assigned message id, clearing it when `None`.
    #[must_use]
    pub const fn with_optional_msg_id(mut self, msg_id: Option<u64>) -> Self {
        self.msg_id = msg_id;
        self
    }

    /// Returns the sending node.
    #[must_use]
    pub const fn src(&self) -> &str {
        self.src.as_str()
    }

    /// Returns the receiving node.
    #[must_use]
    pub const fn dest(&self) -> &str {
        self.dest.as_str()
    }

    /// Returns the correlation id, if any.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        self.id
    }

    /// Returns the sender-assigned message id, if any.
    #[must_use]
    pub const fn msg_id(&self) -> Option<u64> {
        self.msg_id
    }

    /// Returns the id of the message this one answers, if any.
    #[must_use]
    pub const fn in_reply_to(&self) -> Option<u64> {
        self.in_reply_to
    }
}

/// Variant-specific message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Handshake naming this node and the rest of the cluster.
    Init {
        /// Identity assigned to the receiving node.
        node_id: String,
        /// Every node in the cluster, in harness order.
        node_ids: Vec<String>,
    },
    /// Handshake acknowledgement.
    InitOk,
    /// Echo request.
    Echo {
        /// Text to send back.
        echo: String,
    },
    /// Echo reply.
    EchoOk {
        /// Text copied from the request.
        echo: String,
    },
    /// Unique-id request.
    Generate,
    /// Unique-id reply.
    GenerateOk {
        /// The generated identifier.
        id: String,
    },
    /// Failure reply.
    Error {
        /// Error kind.
        code: ErrorCode,
        /// Optional human-readable explanation.
        text: Option<String>,
    },
}

impl Payload {
    /// Returns the wire discriminator for this payload.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Init { .. } => MessageKind::Init,
            Self::InitOk => MessageKind::InitOk,
            Self::Echo { .. } => MessageKind::Echo,
            Self::EchoOk { .. } => MessageKind::EchoOk,
            Self::Generate => MessageKind::Generate,
            Self::GenerateOk { .. } => MessageKind::GenerateOk,
            Self::Error { .. } => MessageKind::Error,
        }
    }
}

/// A complete protocol message.
///
/// # Example
///
/// ```
/// use glomer_protocol::{Envelope, Message, MessageKind, Payload};
///
/// let message = Message::new(
///     Envelope::new("c1", "n1").with_msg_id(1),
///     Payload::Echo { echo: String::from("hello") },
/// );
/// assert_eq!(message.kind(), MessageKind::Echo);
/// assert_eq!(message.src(), "c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    envelope: Envelope,
    payload: Payload,
}

impl Message {
    /// Assembles a message from its envelope and payload.
    #[must_use]
    pub const fn new(envelope: Envelope, payload: Payload) -> Self {
        Self { envelope, payload }
    }

    /// Returns the envelope.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the wire discriminator.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// Returns the sending node.
    #[must_use]
    pub const fn src(&self) -> &str {
        self.envelope.src()
    }

    /// Returns the receiving node.
    #[must_use]
    pub const fn dest(&self) -> &str {
        self.envelope.dest()
    }

    /// Returns the correlation id, if any.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        self.envelope.id()
    }

    /// Returns the sender-assigned message id, if any.
    #[must_use]
    pub const fn msg_id(&self) -> Option<u64> {
        self.envelope.msg_id()
    }

    /// Returns the id of the message this one answers, if any.
    #[must_use]
    pub const fn in_reply_to(&self) -> Option<u64> {
        self.envelope.in_reply_to()
    }

    /// Splits the message into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Envelope, Payload) {
        (self.envelope, self.payload)
    }
}
