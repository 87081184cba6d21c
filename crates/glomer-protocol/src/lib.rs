//! Message model and wire codec for the glomer cluster-harness node.
//!
//! The harness speaks a line-delimited JSON protocol: every message is one
//! compact JSON object carrying `src`, `dest` and a `body` whose `type` field
//! selects the message variant. This crate owns the typed representation of
//! those messages and the conversion between it and text.
//!
//! - [`Message`] pairs an [`Envelope`] with a [`Payload`]. The payload is a
//!   closed union over [`MessageKind`]; there is no catch-all variant, so an
//!   unhandled message type is a compile error in every consumer.
//! - [`decode`] turns one input line into a [`Message`] or a [`DecodeError`].
//! - [`encode`] turns a [`Message`] into one compact output line.
//! - [`salvage_envelope`] recovers enough addressing from an undecodable
//!   line to send an `error` reply.
//!
//! # Example
//!
//! ```rust
//! use glomer_protocol::{Envelope, Message, Payload, decode, encode};
//!
//! let request = decode(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"echo":"hello"}}"#)
//!     .expect("valid request");
//! let Payload::Echo { echo } = request.payload() else {
//!     panic!("expected an echo request");
//! };
//!
//! let reply = Message::new(
//!     Envelope::new(request.dest(), request.src())
//!         .with_msg_id(1)
//!         .with_in_reply_to(request.msg_id().unwrap_or_default()),
//!     Payload::EchoOk { echo: echo.clone() },
//! );
//! assert_eq!(
//!     encode(&reply).expect("encodes"),
//!     r#"{"src":"n1","dest":"c1","body":{"type":"echo_ok","msg_id":1,"in_reply_to":1,"echo":"hello"}}"#,
//! );
//! ```

pub mod codec;
pub mod error;
pub mod error_code;
pub mod kind;
pub mod message;

pub use self::codec::{decode, encode, salvage_envelope};
pub use self::error::{DecodeError, EncodeError};
pub use self::error_code::ErrorCode;
pub use self::kind::MessageKind;
pub use self::message::{Envelope, Message, Payload};
