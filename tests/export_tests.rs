// CSV export contract tests (lossy JSON-stringified format, byte-exact)

use lifihub::export::to_csv;
use lifihub::models::{Direction, Message, MessageStatus};
use serde::Serialize;

#[derive(Serialize)]
struct Row {
    a: i64,
    b: String,
}

#[test]
fn test_simple_rows_byte_exact() {
    let rows = vec![
        Row { a: 1, b: "x".into() },
        Row { a: 2, b: "y".into() },
    ];
    let csv = to_csv(&rows).unwrap();
    assert_eq!(csv, "a,b\n1,\"x\"\n2,\"y\"");
}

#[test]
fn test_empty_input_yields_empty_string() {
    let rows: Vec<Row> = vec![];
    assert_eq!(to_csv(&rows).unwrap(), "");
}

#[test]
fn test_header_follows_first_record_key_order() {
    let rows = vec![serde_json::json!({"z": 1, "a": 2, "m": 3})];
    let csv = to_csv(&rows).unwrap();
    assert_eq!(csv.lines().next(), Some("z,a,m"));
}

#[test]
fn test_missing_field_renders_as_quoted_empty() {
    let rows = vec![
        serde_json::json!({"a": 1, "b": "x"}),
        serde_json::json!({"a": 2}),
    ];
    let csv = to_csv(&rows).unwrap();
    assert_eq!(csv, "a,b\n1,\"x\"\n2,\"\"");
}

#[test]
fn test_string_cells_keep_json_quoting_without_further_escaping() {
    // Commas inside cells are not escaped beyond the JSON quotes; the format
    // is deliberately not RFC 4180.
    let rows = vec![serde_json::json!({"a": "x,y"})];
    let csv = to_csv(&rows).unwrap();
    assert_eq!(csv, "a\n\"x,y\"");
}

#[test]
fn test_non_record_rows_rejected() {
    let rows = vec![serde_json::json!(42)];
    assert!(to_csv(&rows).is_err());
}

#[test]
fn test_message_export_shape() {
    let messages = vec![Message {
        id: "abc".into(),
        content: "Hello".into(),
        timestamp: 1000,
        direction: Direction::Sent,
        status: MessageStatus::Success,
    }];
    let csv = to_csv(&messages).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("id,content,timestamp,direction,status"));
    assert_eq!(lines.next(), Some("\"abc\",\"Hello\",1000,\"sent\",\"success\""));
    assert_eq!(lines.next(), None);
}
