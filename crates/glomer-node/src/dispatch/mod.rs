//! Response construction for decoded requests.
//!
//! The dispatcher has no state of its own. Each call computes the reply
//! payload for the request's variant, then addresses the reply from the
//! node's identity back to the request's sender:
//!
//! | Request | Effect on [`NodeState`] | Reply |
//! |---|---|---|
//! | `init` | identity assigned (first time only) | `init_ok` |
//! | `echo` | none | `echo_ok` with the same text |
//! | `generate` | unique-id counter advanced | `generate_ok` with the new id |
//! | any reply kind | none | the same kind, payload copied |
//!
//! The reply kind always equals [`MessageKind::reply_kind`] of the request.
//! Every reply except `init_ok` takes the next message id, and it is taken
//! last, once the payload is final.

use glomer_protocol::{DecodeError, Envelope, Message, MessageKind, Payload};
use tracing::{debug, warn};

use crate::state::{IdentityAssignment, NodeState};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Builds the reply to `request`, updating `state` as the request requires.
///
/// # Example
///
/// ```
/// use glomer_node::{NodeState, respond};
/// use glomer_protocol::{MessageKind, decode};
///
/// let mut state = NodeState::new();
/// let init = decode(r#"{"src":"c0","dest":"n1","body":{"type":"init","msg_id":1,"node_id":"n1","node_ids":["n1"]}}"#)
///     .expect("valid init");
/// let reply = respond(&mut state, &init);
///
/// assert_eq!(reply.kind(), MessageKind::InitOk);
/// assert_eq!(reply.src(), "n1");
/// assert_eq!(reply.dest(), "c0");
/// assert_eq!(reply.in_reply_to(), Some(1));
/// assert_eq!(reply.msg_id(), None);
/// ```
pub fn respond(state: &mut NodeState, request: &Message) -> Message {
    let payload = match request.payload() {
        Payload::Init { node_id, node_ids } => {
            acknowledge_init(state, node_id, node_ids);
            Payload::InitOk
        }
        Payload::Echo { echo } | Payload::EchoOk { echo } => Payload::EchoOk { echo: echo.clone() },
        Payload::Generate => Payload::GenerateOk {
            id: state.next_unique_id(),
        },
        Payload::InitOk => Payload::InitOk,
        Payload::GenerateOk { id } => Payload::GenerateOk { id: id.clone() },
        Payload::Error { code, text } => {
            debug!(
                target: DISPATCH_TARGET,
                code = code.code(),
                definite = code.is_definite(),
                src = request.src(),
                "received an error reply"
            );
            Payload::Error {
                code: *code,
                text: text.clone(),
            }
        }
    };

    debug_assert_eq!(
        payload.kind(),
        request.kind().reply_kind(),
        "reply kind must follow the kind table"
    );
    debug!(
        target: DISPATCH_TARGET,
        request = %request.kind(),
        reply = %payload.kind(),
        echoed_back = request.kind().is_reply(),
        src = request.src(),
        "built reply"
    );

    address_reply(state, request.envelope(), payload)
}

/// Builds an `error` reply to a line that failed to decode.
///
/// `target` holds whatever addressing could be recovered from the line; the
/// reply goes to its `src` and answers its `msg_id`.
pub fn reject(state: &mut NodeState, target: &Envelope, error: &DecodeError) -> Message {
    let code = error.reply_code();
    debug!(
        target: DISPATCH_TARGET,
        code = code.code(),
        definite = code.is_definite(),
        src = target.src(),
        %error,
        "rejecting request"
    );

    let payload = Payload::Error {
        code,
        text: Some(error.to_string()),
    };
    address_reply(state, target, payload)
}

fn acknowledge_init(state: &mut NodeState, node_id: &str, node_ids: &[String]) {
    match state.assign_identity(node_id) {
        IdentityAssignment::Assigned => debug!(
            target: DISPATCH_TARGET,
            node_id,
            cluster_size = node_ids.len(),
            "node identity assigned"
        ),
        IdentityAssignment::AlreadyAssigned { current } => warn!(
            target: DISPATCH_TARGET,
            current = %current,
            requested = node_id,
            "ignoring repeated init; identity is already assigned"
        ),
    }
}

fn address_reply(state: &mut NodeState, request: &Envelope, payload: Payload) -> Message {
    if !state.is_initialised() {
        warn!(
            target: DISPATCH_TARGET,
            reply = %payload.kind(),
            "replying before init; source will be empty"
        );
    }

    let mut envelope = Envelope::new(state.identity(), request.src())
        .with_optional_id(correlation_id(request, payload.kind()))
        .with_in_reply_to(request.msg_id().unwrap_or_default());
    if payload.kind().carries_msg_id() {
        envelope = envelope.with_msg_id(state.next_message_id());
    }

    Message::new(envelope, payload)
}

/// `generate_ok` uses the `id` key for the generated identifier, so a
/// correlation id on the request cannot be carried by the reply.
fn correlation_id(request: &Envelope, reply: MessageKind) -> Option<u64> {
    let id = request.id()?;
    if reply == MessageKind::GenerateOk {
        debug!(
            target: DISPATCH_TARGET,
            dropped_id = id,
            src = request.src(),
            "dropping correlation id; generate_ok uses the id key"
        );
        return None;
    }
    Some(id)
}
