// SPDX-License-Identifier: MIT OR Apache-2.0
use tintlog::{Chunk, Defaults, Logger, LoggerOptions, Value, template};

fn compile(message: &tintlog::Message) -> Vec<Chunk> {
    Logger::new(LoggerOptions::default().terminal(false))
        .unwrap()
        .compile(message)
}

fn contents(chunks: &[Chunk]) -> Vec<&str> {
    chunks.iter().map(|c| c.content.as_str()).collect()
}

#[test]
fn explicit_values() {
    let message = template!("a {x} b", x = 1);
    assert_eq!(message.input(), &Value::List(vec!["a ".into(), " b".into()]));
    assert_eq!(message.args(), &[Value::Int(1)]);

    let chunks = compile(&message);
    assert_eq!(contents(&chunks), ["a ", "1", " b"]);
    let variable = Defaults::default().variable_styling;
    assert!(chunks[1].styling.ends_with(&variable));
    assert!(chunks.iter().all(|c| !c.sub_line));
}

#[test]
fn implicit_capture() {
    let host = "db-1";
    let port = 5432;
    let message = template!("connecting to {host}:{port}");
    assert_eq!(message.args().len(), 2);
    let text: String = compile(&message).iter().map(|c| c.content.as_str()).collect();
    assert_eq!(text, "connecting to db-1:5432");
}

#[test]
fn literal_braces_without_values_are_a_plain_string() {
    let message = template!("{{not a placeholder}}");
    assert_eq!(message.input(), &Value::from("{not a placeholder}"));
    assert!(message.args().is_empty());
}

#[test]
fn expressions_with_commas() {
    let message = template!("sum {total}", total = [1, 2, 3].iter().sum::<i32>());
    assert_eq!(message.args(), &[Value::Int(6)]);
}

#[test]
fn multi_line_argument_moves_the_rest_to_sublines() {
    let chunks = compile(&template!("result: {v} done", v = "x\ny"));
    assert_eq!(contents(&chunks), ["result: ", "x", "y", " done"]);
    let sub: Vec<bool> = chunks.iter().map(|c| c.sub_line).collect();
    assert_eq!(sub, [false, false, true, true]);
    assert!(chunks[2].breaks_line);
    assert!(!chunks[3].breaks_line);
}

#[test]
fn newline_in_a_segment_switches_to_sublines() {
    let chunks = compile(&template!("head\ntail {v}", v = 7));
    assert_eq!(contents(&chunks), ["head", "tail ", "7"]);
    assert!(!chunks[0].sub_line);
    assert!(chunks[1].sub_line && chunks[1].breaks_line);
    assert!(chunks[2].sub_line && !chunks[2].breaks_line);
}

#[test]
fn zero_and_false_are_shown() {
    let count = 0;
    let ready = false;
    let chunks = compile(&template!("count {count} ready {ready}"));
    assert_eq!(contents(&chunks), ["count ", "0", " ready ", "false"]);
    assert!(!chunks.iter().any(|c| c.content == "undefined"));
}
