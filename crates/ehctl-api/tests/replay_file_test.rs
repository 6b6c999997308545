#![allow(clippy::unwrap_used)]
// Replay files on disk, as used by `ehctl --replay`.

use std::io::Write;

use ehctl_api::{Error, ScriptedTransport, Transport};

fn write_replay(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_replay_file_round_trips_block_scalars() {
    let file = write_replay(
        r#"
"show system": |
  system description               : EH-8010FX
  system temperature               : 57
"clear rollback": "rollback cleared"
"#,
    );

    let mut transport = ScriptedTransport::from_file(file.path()).unwrap();
    let out = transport.send("show system").unwrap();
    assert!(out.contains("system temperature               : 57"));
    assert_eq!(transport.send("clear rollback").unwrap(), "rollback cleared");
    assert_eq!(transport.sent().len(), 2);
}

#[test]
fn test_missing_replay_file_reports_path() {
    let err = ScriptedTransport::from_file(std::path::Path::new("/nonexistent/replay.yaml"))
        .unwrap_err();
    match err {
        Error::Replay { path, .. } => assert_eq!(path, "/nonexistent/replay.yaml"),
        other => panic!("expected Replay error, got {other:?}"),
    }
}

#[test]
fn test_boxed_transport_dispatches() {
    let mut boxed: Box<dyn Transport> =
        Box::new(ScriptedTransport::new().respond("show rf", "rf operational : up"));
    assert_eq!(boxed.send("show rf").unwrap(), "rf operational : up");
}
