//! Tests for the CLI runtime.

#![expect(clippy::expect_used, reason = "tests require contextual panics")]

use std::ffi::OsString;
use std::process::ExitCode;
use std::str::FromStr;

use camino::Utf8PathBuf;
use insta::assert_snapshot;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use tracing::Level;

use crate::telemetry::{TelemetryError, build_subscriber};
use crate::{LogFormat, LogSettings, OutputFormat, ResolvedOutputFormat, run};

const FIXTURE: &str = r#"{
  "items": {
    "main": {
      "name": "main", "kind": 12, "uri": "file:///src/main.rs",
      "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 4, "character": 1 } },
      "selectionRange": { "start": { "line": 0, "character": 3 }, "end": { "line": 0, "character": 7 } }
    },
    "load": {
      "name": "load", "kind": 12, "uri": "file:///src/config.rs", "detail": "config",
      "range": { "start": { "line": 5, "character": 0 }, "end": { "line": 9, "character": 1 } },
      "selectionRange": { "start": { "line": 5, "character": 7 }, "end": { "line": 5, "character": 11 } }
    },
    "read": {
      "name": "read", "kind": 6, "uri": "file:///src/io.rs", "tags": [1],
      "range": { "start": { "line": 1, "character": 0 }, "end": { "line": 3, "character": 1 } },
      "selectionRange": { "start": { "line": 1, "character": 7 }, "end": { "line": 1, "character": 11 } }
    }
  },
  "roots": ["main"],
  "calls": [
    { "caller": "main", "callee": "load",
      "fromRanges": [{ "start": { "line": 1, "character": 4 }, "end": { "line": 1, "character": 8 } }] },
    { "caller": "load", "callee": "read",
      "fromRanges": [{ "start": { "line": 6, "character": 4 }, "end": { "line": 6, "character": 8 } }] }
  ]
}"#;

struct Workspace {
    _dir: TempDir,
    fixture: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = Utf8PathBuf::try_from(dir.path().join("graph.json")).expect("utf-8 path");
    std::fs::write(&fixture, FIXTURE).expect("write fixture");
    Workspace { _dir: dir, fixture }
}

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn invoke(args: &[&str], stdout_is_terminal: bool) -> Outcome {
    let argv = std::iter::once("callscope")
        .chain(args.iter().copied())
        .map(OsString::from);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run(argv, &mut stdout, &mut stderr, stdout_is_terminal);
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("utf-8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf-8 stderr"),
    }
}

#[rstest]
fn human_output_renders_the_outgoing_tree(workspace: Workspace) {
    let outcome = invoke(
        &[
            "--direction",
            "outgoing",
            "--depth",
            "2",
            "--output",
            "human",
            "fixture",
            workspace.fixture.as_str(),
        ],
        false,
    );

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_snapshot!(outcome.stdout, @r"
    main
      load (config) @ /src/main.rs:2:5
        read [deprecated] @ /src/config.rs:7:5
    ");
}

#[rstest]
fn incoming_is_the_default_direction(workspace: Workspace) {
    let outcome = invoke(&["--output", "human", "fixture", workspace.fixture.as_str()], false);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(outcome.stdout, "main\n");
}

#[rstest]
fn auto_output_emits_json_when_redirected(workspace: Workspace) {
    let outcome = invoke(
        &["--direction", "outgoing", "fixture", workspace.fixture.as_str()],
        false,
    );

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    let parsed: serde_json::Value = serde_json::from_str(&outcome.stdout).expect("json rows");
    let rows = parsed.as_array().expect("array of rows");
    assert_eq!(rows.len(), 2);
    let root = rows.first().expect("root row");
    assert!(root["locations"].is_null(), "root row: {root}");
    let child = rows.get(1).expect("child row");
    assert_eq!(child["depth"], 1);
    assert_eq!(child["label"]["name"], "load");
    assert_eq!(child["aria_label"], "calls from load");
    assert_eq!(child["locations"].as_array().map(Vec::len), Some(1));
}

#[rstest]
fn missing_fixture_fails_with_message() {
    let outcome = invoke(&["fixture", "/nonexistent/graph.json"], false);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(
        outcome.stderr.contains("/nonexistent/graph.json"),
        "stderr: {}",
        outcome.stderr
    );
}

#[rstest]
fn invalid_log_filter_is_reported(workspace: Workspace) {
    let outcome = invoke(
        &["--log-filter", "callscope=loud", "fixture", workspace.fixture.as_str()],
        false,
    );

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("invalid log filter"), "stderr: {}", outcome.stderr);
}

#[rstest]
fn unreadable_source_file_stops_before_spawning() {
    let outcome = invoke(
        &[
            "lsp",
            "--file",
            "/nonexistent/main.rs",
            "--line",
            "0",
            "--column",
            "3",
            "--",
            "definitely-not-a-language-server",
        ],
        false,
    );

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("failed to read"), "stderr: {}", outcome.stderr);
}

#[rstest]
fn lsp_requires_a_server_command() {
    let outcome = invoke(
        &["lsp", "--file", "main.rs", "--line", "0", "--column", "0"],
        false,
    );

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(!outcome.stderr.is_empty());
}

#[rstest]
fn help_goes_to_stdout() {
    let outcome = invoke(&["--help"], true);

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("callscope"));
    assert!(outcome.stderr.is_empty());
}

#[rstest]
#[case(OutputFormat::Auto, true, ResolvedOutputFormat::Human)]
#[case(OutputFormat::Auto, false, ResolvedOutputFormat::Json)]
#[case(OutputFormat::Human, false, ResolvedOutputFormat::Human)]
#[case(OutputFormat::Json, true, ResolvedOutputFormat::Json)]
fn output_format_resolution(
    #[case] format: OutputFormat,
    #[case] terminal: bool,
    #[case] expected: ResolvedOutputFormat,
) {
    assert_eq!(format.resolve(terminal), expected);
}

#[rstest]
#[case("json", LogFormat::Json)]
#[case("COMPACT", LogFormat::Compact)]
fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(LogFormat::from_str(text).expect("log format"), expected);
}

#[rstest]
#[case::json(LogFormat::Json, false)]
#[case::compact(LogFormat::Compact, true)]
fn subscriber_honours_the_filter(#[case] format: LogFormat, #[case] ansi: bool) {
    let settings = LogSettings {
        filter: String::from("callscope::lsp=debug,warn"),
        format,
    };
    let subscriber = build_subscriber(&settings, ansi).expect("subscriber");

    let (lsp_debug, model_debug) = tracing::subscriber::with_default(subscriber, || {
        (
            tracing::enabled!(target: "callscope::lsp", Level::DEBUG),
            tracing::enabled!(target: "callscope::model", Level::DEBUG),
        )
    });

    assert!(lsp_debug);
    assert!(!model_debug);
}

#[test]
fn subscriber_rejects_a_bad_filter() {
    let settings = LogSettings {
        filter: String::from("callscope=loud"),
        format: LogFormat::Compact,
    };

    let Err(err) = build_subscriber(&settings, false) else {
        panic!("expected failure");
    };

    assert!(matches!(err, TelemetryError::Filter(_)), "unexpected error: {err:?}");
}
