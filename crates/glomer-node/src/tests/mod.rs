//! Crate-level and behavioural tests for the node.

pub(crate) mod support;

use std::io::Cursor;

use rstest::rstest;

use crate::{Config, DecodeErrorPolicy, SessionError, run};

fn run_with(policy: DecodeErrorPolicy, input: &str) -> (Result<usize, SessionError>, String) {
    let config = Config {
        on_decode_error: policy,
        ..Config::default()
    };
    let mut output = Vec::new();
    let result = run(&config, &mut Cursor::new(input), &mut output)
        .map(|summary| summary.responses_written);
    (result, String::from_utf8(output).expect("utf8 output"))
}

#[test]
fn each_run_starts_from_a_fresh_node() {
    let input = concat!(
        r#"{"src":"c0","dest":"n3","body":{"type":"init","msg_id":1,"node_id":"n3","node_ids":["n3"]}}"#,
        "\n",
        r#"{"src":"c1","dest":"n3","body":{"type":"generate","msg_id":1}}"#,
        "\n",
    );

    let (_, first) = run_with(DecodeErrorPolicy::Abort, input);
    let (_, second) = run_with(DecodeErrorPolicy::Abort, input);

    assert!(first.contains(r#""id":"n3.1""#));
    assert_eq!(first, second);
}

#[rstest]
#[case::abort(DecodeErrorPolicy::Abort, false)]
#[case::reply(DecodeErrorPolicy::Reply, true)]
fn configured_policy_reaches_the_session(
    #[case] policy: DecodeErrorPolicy,
    #[case] should_continue: bool,
) {
    let input = "{\"src\":\"c1\",\"dest\":\"n1\",\"body\":{\"type\":\"bogus\",\"msg_id\":1}}\n";
    let (result, output) = run_with(policy, input);

    assert_eq!(result.is_ok(), should_continue);
    assert_eq!(output.contains(r#""code":10"#), should_continue);
}
