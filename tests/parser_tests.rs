use latency_profile::parser::{decode_record, parse_trace_file, CallId, EventKind};
use latency_profile::utils::error::ParseError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_decode_word_kinds() {
    let event = decode_record(
        r#"{"tag":"x","kind":"close","t":2,"imp":false,"file":"f","line":3,"callPtr":1}"#,
        1,
    )
    .unwrap();
    assert_eq!(event.kind, EventKind::Close);
}

#[test]
fn test_decode_string_call_pointer() {
    let event = decode_record(
        r#"{"tag":"x","type":"{","t":2,"imp":false,"file":"f","line":3,"callPtr":"0x7f3a","cqTagPtr":"0x10"}"#,
        1,
    )
    .unwrap();
    assert_eq!(event.call_id, CallId::Text("0x7f3a".to_string()));
    assert_eq!(event.cq_tag, Some(CallId::Text("0x10".to_string())));
}

#[test]
fn test_decode_wrong_type_for_imp() {
    let result = decode_record(
        r#"{"tag":"x","type":"{","t":2,"imp":"yes","file":"f","line":3,"callPtr":1}"#,
        4,
    );
    assert!(matches!(
        result,
        Err(ParseError::MalformedRecord { line: 4, .. })
    ));
}

#[test]
fn test_parse_trace_file_in_order() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"tag":"b","type":"{{","t":5,"imp":false,"file":"f","line":1,"callPtr":2}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"tag":"a","type":"!","t":1,"imp":true,"file":"f","line":2,"callPtr":1}}"#
    )
    .unwrap();

    let events = parse_trace_file(file.path()).unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].tag, "b");
    assert_eq!(events[1].tag, "a");
    assert_eq!(events[1].record_line, 2);
}

#[test]
fn test_parse_trace_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_trace_file(dir.path().join("absent.txt"));
    assert!(matches!(result, Err(ParseError::Io(_))));
}
