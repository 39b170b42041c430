use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TRACE: &str = r#"{"tag":"server_request_call","type":"{","t":0,"imp":true,"file":"a","line":1,"callPtr":5}
{"tag":"read","type":"{","t":1,"imp":false,"file":"a","line":2,"callPtr":5}
{"tag":"read","type":"}","t":3,"imp":false,"file":"a","line":2,"callPtr":5}
{"tag":"server_request_call","type":"}","t":4,"imp":true,"file":"a","line":1,"callPtr":5}
"#;

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn analyzer() -> Command {
    Command::cargo_bin("call-analyzer").unwrap()
}

#[test]
fn test_prints_report() {
    let file = trace_file(TRACE);

    analyzer()
        .arg("--source")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Call 5: 4 events"))
        .stdout(predicate::str::contains("  read"));
}

#[test]
fn test_grid_format() {
    let file = trace_file(TRACE);

    analyzer()
        .args(["--fmt", "grid", "--source"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("+===="));
}

#[test]
fn test_malformed_line_fails_with_line_number() {
    let file = trace_file(&format!("{}{{\"tag\":\"x\"}}\n", TRACE));

    analyzer()
        .arg("--source")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 5"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    analyzer()
        .arg("--source")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode trace"));
}

#[test]
fn test_unknown_format_rejected() {
    analyzer().args(["--fmt", "fancy"]).assert().failure();
}

#[test]
fn test_custom_call_tag_from_env() {
    let trace = TRACE.replace("server_request_call", "client_call");
    let file = trace_file(&trace);

    analyzer()
        .env("CALL_ANALYZER_CALL_TAG", "client_call")
        .arg("--source")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("client_call"));
}
