//! Text encoding and decoding of protocol messages.
//!
//! Each message travels as a single compact JSON line:
//!
//! ```json
//! {"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"echo":"hello"}}
//! ```
//!
//! Decoding goes through a private serde shape of the wire format and is then
//! narrowed onto the closed [`Payload`] union. Encoding writes keys in a fixed
//! order (`src`, `dest`, `body`; inside the body `type`, `msg_id`,
//! `in_reply_to`, `id`, then payload fields) so output lines are stable.

use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{DecodeError, EncodeError, Envelope, ErrorCode, Message, MessageKind, Payload};

/// Decodes one input line into a [`Message`].
///
/// Leading and trailing whitespace is ignored. Absent payload strings decode
/// as empty strings and an absent `node_ids` as an empty list; absent numeric
/// envelope fields stay unset. Numeric ids may be written as integral floats
/// (`1.0`), which decode to the same integer.
///
/// # Errors
///
/// Returns [`DecodeError::Syntax`] if the line is empty or not valid JSON,
/// [`DecodeError::InvalidStructure`] if `src`, `dest` or `body.type` is
/// missing or any known field has the wrong JSON type, and
/// [`DecodeError::UnknownType`] if `body.type` is outside the tag set.
///
/// # Example
///
/// ```
/// use glomer_protocol::{Payload, decode};
///
/// let message = decode(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"echo":"hi"}}"#)
///     .expect("valid echo");
/// assert_eq!(message.msg_id(), Some(1));
/// assert_eq!(message.payload(), &Payload::Echo { echo: String::from("hi") });
/// ```
pub fn decode(line: &str) -> Result<Message, DecodeError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::syntax("empty message line"));
    }

    let wire: WireMessage =
        serde_json::from_str(trimmed).map_err(DecodeError::from_json_error)?;
    Message::try_from(wire)
}

/// Encodes a [`Message`] as one compact JSON line without a trailing newline.
///
/// # Errors
///
/// Returns [`EncodeError::Serialize`] if the serializer fails. This does not
/// happen for messages built in memory, but the error is propagated rather
/// than hidden.
///
/// # Example
///
/// ```
/// use glomer_protocol::{Envelope, Message, Payload, encode};
///
/// let message = Message::new(
///     Envelope::new("n1", "c1").with_msg_id(1).with_in_reply_to(1),
///     Payload::EchoOk { echo: String::from("hello") },
/// );
/// assert_eq!(
///     encode(&message).expect("encodes"),
///     r#"{"src":"n1","dest":"c1","body":{"type":"echo_ok","msg_id":1,"in_reply_to":1,"echo":"hello"}}"#,
/// );
/// ```
pub fn encode(message: &Message) -> Result<String, EncodeError> {
    serde_json::to_string(message).map_err(|source| EncodeError::Serialize { source })
}

/// Recovers the addressing fields of a line that failed to decode.
///
/// Returns `None` unless the line is a JSON object with a string `src`. A
/// missing `dest` reads as an empty string and a missing or non-integral
/// `body.msg_id` as unset.
#[must_use]
pub fn salvage_envelope(line: &str) -> Option<Envelope> {
    let value: serde_json::Value = serde_json::from_str(line.trim()).ok()?;
    let src = value.get("src")?.as_str()?;
    let dest = value
        .get("dest")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    let msg_id = value
        .get("body")
        .and_then(|body| body.get("msg_id"))
        .and_then(integral_u64);

    Some(Envelope::new(src, dest).with_optional_msg_id(msg_id))
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    src: String,
    dest: String,
    body: WireBody,
}

#[derive(Debug, Deserialize)]
struct WireBody {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    msg_id: Option<serde_json::Value>,
    #[serde(default)]
    in_reply_to: Option<serde_json::Value>,
    // Numeric correlation id everywhere except `generate_ok`, where the key
    // carries the generated identifier.
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    node_id: Option<String>,
    #[serde(default)]
    node_ids: Option<Vec<String>>,
    #[serde(default)]
    echo: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    text: Option<String>,
}

impl TryFrom<WireMessage> for Message {
    type Error = DecodeError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let WireMessage { src, dest, body } = wire;
        let kind = MessageKind::from_str(&body.kind)
            .map_err(|_| DecodeError::unknown_type(body.kind.as_str()))?;

        let (correlation, generated) = split_id(kind, body.id)?;

        let payload = match kind {
            MessageKind::Init => Payload::Init {
                node_id: body.node_id.unwrap_or_default(),
                node_ids: body.node_ids.unwrap_or_default(),
            },
            MessageKind::InitOk => Payload::InitOk,
            MessageKind::Echo => Payload::Echo {
                echo: body.echo.unwrap_or_default(),
            },
            MessageKind::EchoOk => Payload::EchoOk {
                echo: body.echo.unwrap_or_default(),
            },
            MessageKind::Generate => Payload::Generate,
            MessageKind::GenerateOk => Payload::GenerateOk {
                id: generated.unwrap_or_default(),
            },
            MessageKind::Error => Payload::Error {
                code: ErrorCode::from(body.code.unwrap_or_default()),
                text: body.text,
            },
        };

        let msg_id = wire_id("body.msg_id", body.msg_id.as_ref())?;
        let mut envelope = Envelope::new(src, dest)
            .with_optional_id(correlation)
            .with_optional_msg_id(msg_id);
        if let Some(in_reply_to) = wire_id("body.in_reply_to", body.in_reply_to.as_ref())? {
            envelope = envelope.with_in_reply_to(in_reply_to);
        }

        Ok(Self::new(envelope, payload))
    }
}

/// Splits the overloaded `body.id` key into a correlation id or a generated
/// identifier depending on the message kind.
fn split_id(
    kind: MessageKind,
    id: Option<serde_json::Value>,
) -> Result<(Option<u64>, Option<String>), DecodeError> {
    let Some(value) = id.filter(|value| !value.is_null()) else {
        return Ok((None, None));
    };

    match kind {
        MessageKind::GenerateOk => match value {
            serde_json::Value::String(text) => Ok((None, Some(text))),
            _ => Err(DecodeError::invalid_structure(
                "body.id of generate_ok must be a string",
            )),
        },
        MessageKind::Init
        | MessageKind::InitOk
        | MessageKind::Echo
        | MessageKind::EchoOk
        | MessageKind::Generate
        | MessageKind::Error => integral_u64(&value).map_or_else(
            || {
                Err(DecodeError::invalid_structure(
                    "body.id must be a non-negative integer",
                ))
            },
            |number| Ok((Some(number), None)),
        ),
    }
}

/// Reads an optional numeric envelope field.
fn wire_id(field: &str, value: Option<&serde_json::Value>) -> Result<Option<u64>, DecodeError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(number) => integral_u64(number).map(Some).ok_or_else(|| {
            DecodeError::invalid_structure(format!("{field} must be a non-negative integer"))
        }),
    }
}

/// 2^64, the first integral `f64` that no longer fits in a `u64`.
const U64_CEILING: f64 = 18_446_744_073_709_551_616.0;

/// Reads a non-negative integral JSON number. Integral floats such as `3.0`
/// are accepted alongside `3`.
fn integral_u64(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0 && (0.0..U64_CEILING).contains(number))
            .map(float_to_u64)
    })
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "callers check the value is integral and inside the u64 range"
)]
const fn float_to_u64(number: f64) -> u64 {
    number as u64
}

impl Serialize for Message {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("src", self.src())?;
        map.serialize_entry("dest", self.dest())?;
        map.serialize_entry("body", &WireBodyRef(self))?;
        map.end()
    }
}

struct WireBodyRef<'a>(&'a Message);

impl Serialize for WireBodyRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let message = self.0;
        let kind = message.kind();
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("type", kind.as_str())?;
        if kind.carries_msg_id()
            && let Some(msg_id) = message.msg_id()
        {
            map.serialize_entry("msg_id", &msg_id)?;
        }
        if let Some(in_reply_to) = message.in_reply_to() {
            map.serialize_entry("in_reply_to", &in_reply_to)?;
        }
        if kind != MessageKind::GenerateOk
            && let Some(id) = message.id()
        {
            map.serialize_entry("id", &id)?;
        }

        match message.payload() {
            Payload::Init { node_id, node_ids } => {
                map.serialize_entry("node_id", node_id)?;
                map.serialize_entry("node_ids", node_ids)?;
            }
            Payload::InitOk | Payload::Generate => {}
            Payload::Echo { echo } | Payload::EchoOk { echo } => {
                map.serialize_entry("echo", echo)?;
            }
            Payload::GenerateOk { id } => {
                map.serialize_entry("id", id)?;
            }
            Payload::Error { code, text } => {
                map.serialize_entry("code", &code.code())?;
                if let Some(explanation) = text {
                    map.serialize_entry("text", explanation)?;
                }
            }
        }

        map.end()
    }
}

#[cfg(test)]
mod tests;
