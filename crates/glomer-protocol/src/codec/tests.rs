//! Unit tests for the JSON line codec.

use rstest::rstest;

use crate::{DecodeError, Envelope, ErrorCode, Message, MessageKind, Payload, decode, encode};

use super::salvage_envelope;

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

#[test]
fn decodes_echo_request() {
    let message =
        decode(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"echo":"hello"}}"#)
            .expect("echo should decode");

    assert_eq!(message.src(), "c1");
    assert_eq!(message.dest(), "n1");
    assert_eq!(message.msg_id(), Some(1));
    assert_eq!(message.id(), None);
    assert_eq!(message.in_reply_to(), None);
    assert_eq!(
        message.payload(),
        &Payload::Echo {
            echo: String::from("hello")
        }
    );
}

#[test]
fn decodes_init_preserving_node_order() {
    let message = decode(
        r#"{"src":"c0","dest":"n3","body":{"type":"init","msg_id":1,"node_id":"n3","node_ids":["n3","n1","n2"]}}"#,
    )
    .expect("init should decode");

    assert_eq!(
        message.payload(),
        &Payload::Init {
            node_id: String::from("n3"),
            node_ids: vec![
                String::from("n3"),
                String::from("n1"),
                String::from("n2"),
            ],
        }
    );
}

#[test]
fn trims_surrounding_whitespace() {
    let message = decode("  \t{\"src\":\"c1\",\"dest\":\"n1\",\"body\":{\"type\":\"generate\"}}\r\n")
        .expect("padded line should decode");
    assert_eq!(message.kind(), MessageKind::Generate);
}

#[test]
fn absent_fields_take_defaults() {
    let message = decode(r#"{"src":"c1","dest":"n1","body":{"type":"echo"}}"#)
        .expect("bare echo should decode");

    assert_eq!(message.msg_id(), None);
    assert_eq!(
        message.payload(),
        &Payload::Echo {
            echo: String::new()
        }
    );

    let init = decode(r#"{"src":"c1","dest":"n1","body":{"type":"init"}}"#)
        .expect("bare init should decode");
    assert_eq!(
        init.payload(),
        &Payload::Init {
            node_id: String::new(),
            node_ids: Vec::new(),
        }
    );
}

#[test]
fn numeric_id_is_a_correlation_id() {
    let message = decode(r#"{"src":"c1","dest":"n1","body":{"type":"generate","msg_id":4,"id":77}}"#)
        .expect("generate with id should decode");
    assert_eq!(message.id(), Some(77));
}

#[test]
fn integral_float_ids_decode_as_integers() {
    let message = decode(
        r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1.0,"in_reply_to":2.0,"id":7.0,"echo":"x"}}"#,
    )
    .expect("integral floats should decode");

    assert_eq!(message.msg_id(), Some(1));
    assert_eq!(message.in_reply_to(), Some(2));
    assert_eq!(message.id(), Some(7));
    assert_eq!(
        encode(&message).expect("message should encode"),
        r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"in_reply_to":2,"id":7,"echo":"x"}}"#
    );
}

#[rstest]
#[case::fractional_msg_id(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1.5}}"#, "body.msg_id")]
#[case::negative_float(r#"{"src":"c1","dest":"n1","body":{"type":"echo","in_reply_to":-2.0}}"#, "body.in_reply_to")]
#[case::beyond_u64(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1e20}}"#, "body.msg_id")]
#[case::string_msg_id(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":"1"}}"#, "body.msg_id")]
#[case::fractional_correlation_id(r#"{"src":"c1","dest":"n1","body":{"type":"echo","id":0.5}}"#, "body.id")]
fn non_integral_ids_are_rejected(#[case] line: &str, #[case] field: &str) {
    let error = decode(line).expect_err("id should be rejected");
    assert!(
        matches!(error, DecodeError::InvalidStructure { .. }),
        "expected structure error, got: {error:?}"
    );
    assert!(
        error.to_string().contains(field),
        "expected error naming '{field}', got: {error}"
    );
}

#[test]
fn generate_ok_id_is_the_generated_identifier() {
    let message = decode(
        r#"{"src":"n1","dest":"c1","body":{"type":"generate_ok","msg_id":2,"in_reply_to":2,"id":"n1.1"}}"#,
    )
    .expect("generate_ok should decode");

    assert_eq!(message.id(), None);
    assert_eq!(message.in_reply_to(), Some(2));
    assert_eq!(
        message.payload(),
        &Payload::GenerateOk {
            id: String::from("n1.1")
        }
    );
}

#[test]
fn decodes_error_reply() {
    let message = decode(
        r#"{"src":"n2","dest":"n1","body":{"type":"error","in_reply_to":5,"code":11,"text":"busy"}}"#,
    )
    .expect("error should decode");

    assert_eq!(
        message.payload(),
        &Payload::Error {
            code: ErrorCode::TemporarilyUnavailable,
            text: Some(String::from("busy")),
        }
    );
}

#[test]
fn unknown_fields_are_ignored() {
    let message = decode(
        r#"{"id":3,"src":"c1","dest":"n1","body":{"type":"echo","echo":"x","extra":[1,2]}}"#,
    )
    .expect("extra fields should be ignored");
    assert_eq!(message.kind(), MessageKind::Echo);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::not_json("hello")]
#[case::truncated(r#"{"src":"c1","dest":"#)]
fn syntax_failures(#[case] line: &str) {
    let error = decode(line).expect_err("line should fail to decode");
    assert!(
        matches!(error, DecodeError::Syntax { .. }),
        "expected syntax error, got: {error:?}"
    );
}

#[rstest]
#[case::missing_type(r#"{"src":"c1","dest":"n1","body":{"msg_id":1}}"#, "type")]
#[case::missing_src(r#"{"dest":"n1","body":{"type":"echo"}}"#, "src")]
#[case::missing_dest(r#"{"src":"c1","body":{"type":"echo"}}"#, "dest")]
#[case::missing_body(r#"{"src":"c1","dest":"n1"}"#, "body")]
#[case::numeric_src(r#"{"src":1,"dest":"n1","body":{"type":"echo"}}"#, "")]
#[case::numeric_type(r#"{"src":"c1","dest":"n1","body":{"type":7}}"#, "")]
#[case::negative_msg_id(r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":-1}}"#, "")]
#[case::echo_not_string(r#"{"src":"c1","dest":"n1","body":{"type":"echo","echo":5}}"#, "")]
#[case::node_ids_not_list(
    r#"{"src":"c1","dest":"n1","body":{"type":"init","node_id":"n1","node_ids":"n1"}}"#,
    ""
)]
#[case::string_correlation_id(r#"{"src":"c1","dest":"n1","body":{"type":"echo","id":"x"}}"#, "id")]
#[case::numeric_generated_id(
    r#"{"src":"n1","dest":"c1","body":{"type":"generate_ok","id":5}}"#,
    "id"
)]
#[case::top_level_array("[1,2,3]", "")]
fn structure_failures(#[case] line: &str, #[case] mention: &str) {
    let error = decode(line).expect_err("line should fail to decode");
    assert!(
        matches!(error, DecodeError::InvalidStructure { .. }),
        "expected structure error, got: {error:?}"
    );
    assert!(
        error.to_string().contains(mention),
        "expected error mentioning '{mention}', got: {error}"
    );
}

#[rstest]
#[case::other_workload("broadcast")]
#[case::capitalised("Echo")]
#[case::empty("")]
fn unknown_types_fail(#[case] tag: &str) {
    let line = format!(r#"{{"src":"c1","dest":"n1","body":{{"type":"{tag}"}}}}"#);
    let error = decode(&line).expect_err("unknown tag should fail");
    assert!(
        matches!(&error, DecodeError::UnknownType { tag: found } if found == tag),
        "expected unknown type error, got: {error:?}"
    );
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

fn reply_envelope() -> Envelope {
    Envelope::new("n1", "c1").with_msg_id(1).with_in_reply_to(1)
}

#[rstest]
#[case::echo_ok(
    Message::new(reply_envelope(), Payload::EchoOk { echo: String::from("hello") }),
    r#"{"src":"n1","dest":"c1","body":{"type":"echo_ok","msg_id":1,"in_reply_to":1,"echo":"hello"}}"#
)]
#[case::init_ok_omits_msg_id(
    Message::new(reply_envelope(), Payload::InitOk),
    r#"{"src":"n1","dest":"c1","body":{"type":"init_ok","in_reply_to":1}}"#
)]
#[case::generate_ok(
    Message::new(
        Envelope::new("n1", "c1").with_msg_id(2).with_in_reply_to(2),
        Payload::GenerateOk { id: String::from("n1.1") },
    ),
    r#"{"src":"n1","dest":"c1","body":{"type":"generate_ok","msg_id":2,"in_reply_to":2,"id":"n1.1"}}"#
)]
#[case::generate_ok_drops_correlation_id(
    Message::new(
        Envelope::new("n1", "c1").with_id(9).with_msg_id(2),
        Payload::GenerateOk { id: String::from("n1.1") },
    ),
    r#"{"src":"n1","dest":"c1","body":{"type":"generate_ok","msg_id":2,"id":"n1.1"}}"#
)]
#[case::correlation_id_echoed(
    Message::new(
        Envelope::new("n1", "c1").with_id(9).with_msg_id(3).with_in_reply_to(4),
        Payload::EchoOk { echo: String::from("x") },
    ),
    r#"{"src":"n1","dest":"c1","body":{"type":"echo_ok","msg_id":3,"in_reply_to":4,"id":9,"echo":"x"}}"#
)]
#[case::error_with_text(
    Message::new(
        reply_envelope(),
        Payload::Error { code: ErrorCode::MalformedRequest, text: Some(String::from("bad")) },
    ),
    r#"{"src":"n1","dest":"c1","body":{"type":"error","msg_id":1,"in_reply_to":1,"code":12,"text":"bad"}}"#
)]
#[case::error_custom_code(
    Message::new(Envelope::new("n1", "c1"), Payload::Error { code: ErrorCode::Custom(1001), text: None }),
    r#"{"src":"n1","dest":"c1","body":{"type":"error","code":1001}}"#
)]
#[case::init_request(
    Message::new(
        Envelope::new("c0", "n1").with_msg_id(1),
        Payload::Init { node_id: String::from("n1"), node_ids: vec![String::from("n1"), String::from("n2")] },
    ),
    r#"{"src":"c0","dest":"n1","body":{"type":"init","msg_id":1,"node_id":"n1","node_ids":["n1","n2"]}}"#
)]
fn encodes_compact_lines(#[case] message: Message, #[case] expected: &str) {
    assert_eq!(encode(&message).expect("message should encode"), expected);
}

#[rstest]
#[case::plain("hello")]
#[case::empty("")]
#[case::quotes_and_escapes("say \"hi\"\\n\t")]
#[case::newline("line one\nline two")]
#[case::unicode("héllo wörld ✓ 🦀")]
fn echo_text_survives_the_wire(#[case] text: &str) {
    let request = Message::new(
        Envelope::new("c1", "n1").with_msg_id(1),
        Payload::Echo {
            echo: text.to_owned(),
        },
    );

    let line = encode(&request).expect("request should encode");
    assert!(!line.contains('\n'), "encoded line must be single-line");
    let decoded = decode(&line).expect("encoded line should decode");
    assert_eq!(decoded.payload(), request.payload());
}

// ---------------------------------------------------------------------------
// salvage_envelope
// ---------------------------------------------------------------------------

#[test]
fn salvages_address_from_unknown_type() {
    let envelope = salvage_envelope(r#"{"src":"c1","dest":"n1","body":{"type":"cas","msg_id":8}}"#)
        .expect("address should be recovered");
    assert_eq!(envelope.src(), "c1");
    assert_eq!(envelope.dest(), "n1");
    assert_eq!(envelope.msg_id(), Some(8));
}

#[test]
fn salvages_address_without_body() {
    let envelope =
        salvage_envelope(r#"{"src":"c1"}"#).expect("src alone is enough to address a reply");
    assert_eq!(envelope.dest(), "");
    assert_eq!(envelope.msg_id(), None);
}

#[test]
fn salvages_integral_float_msg_id() {
    let envelope = salvage_envelope(r#"{"src":"c7","dest":"n1","body":{"type":"cas","msg_id":4.0}}"#)
        .expect("address should be recovered");
    assert_eq!(envelope.msg_id(), Some(4));
}

#[rstest]
#[case::not_json("garbage")]
#[case::no_src(r#"{"dest":"n1","body":{"type":"echo"}}"#)]
#[case::numeric_src(r#"{"src":3,"dest":"n1"}"#)]
#[case::array("[]")]
fn cannot_salvage_unaddressable_lines(#[case] line: &str) {
    assert!(salvage_envelope(line).is_none());
}
