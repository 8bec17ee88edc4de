//! # UI Tests for Running Pipelines
#![cfg(not(miri))]

use assert_cmd::Command;
use indoc::indoc;

fn run(source: &str, args: &[&str]) -> std::process::Output {
  Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["run", "-"])
    .args(args)
    .env_remove("MONANAS_LOG")
    .write_stdin(source)
    .output()
    .unwrap()
}

const MINIMAL: &str = indoc! {"
  a = CloudMarkovChainSource()
  b = StdoutSink()
  c = CloudIngestor()
  d = LiNGAM()
  a -> c -> d -> b
"};

const DEAD_BRANCH: &str = indoc! {"
  a = CloudMarkovChainSource()
  b = StdoutSink()
  c = CloudIngestor()
  d = LiNGAM()
  a -> c -> [d, b]
"};

#[test]
fn minimal_pipeline() {
  let output = run(MINIMAL, &[]);

  assert!(output.status.success());
  assert!(output.stderr.is_empty());
  assert_eq!(String::from_utf8(output.stdout).unwrap(), indoc! {"
    Pipeline started
      a: CloudMarkovChainSource (Source)
      b: StdoutSink (Sink)
      c: CloudIngestor (Ingestor)
      d: LiNGAM (Sml)
      a -> c
      c -> d
      d -> b
  "});
}

#[test]
fn dead_component_warning() {
  let output = run(DEAD_BRANCH, &[]);

  assert!(output.status.success());
  assert_eq!(String::from_utf8(output.stderr).unwrap(), indoc! {"
    ⚠ Warning: Dead Component
    `d` is not on a path from Source to Sink
    hint: the component is removed, connect it between a Source and a Sink to use it

        ╭─[STDIN:4]
      4 │ d = LiNGAM()
    ────╯
  "});
  assert_eq!(String::from_utf8(output.stdout).unwrap(), indoc! {"
    Pipeline started
      a: CloudMarkovChainSource (Source)
      b: StdoutSink (Sink)
      c: CloudIngestor (Ingestor)
      a -> c
      c -> b
  "});
}

#[test]
fn strict_connection_rules() {
  let output = run(DEAD_BRANCH, &["--rules", "strict"]);

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());

  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.starts_with("✕ Error: Illegal Connection"));
}

#[test]
fn denied_warnings() {
  let output = run(DEAD_BRANCH, &["--deny-warnings"]);

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());

  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.starts_with("⚠ Warning: Dead Component"));
  assert!(stderr.contains("✕ Error: Warnings Denied"));
}

#[test]
fn no_source() {
  let source = indoc! {"
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    c -> d -> b
  "};
  let output = run(source, &[]);

  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8(output.stderr).unwrap();
  assert_eq!(stderr.matches("⚠ Warning: Dead Component").count(), 3);
  assert!(stderr.contains(indoc! {"
    ✕ Error: No Full Path
    there is no path from a Source to a Sink, as there is no Source
    hint: connect a Source so data can flow from a Source to a Sink
  "}));
}

#[test]
fn json_report() {
  let output = run(DEAD_BRANCH, &["--format", "json"]);

  assert!(output.status.success());
  assert!(output.stderr.is_empty());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["errors"], serde_json::json!([]));
  assert_eq!(report["warnings"][0]["startLineNumber"], 4);
  assert_eq!(
    report["warnings"][0]["message"],
    "Dead Component: `d` is not on a path from Source to Sink"
  );
  assert_eq!(report["pipeline"]["links"]["c"], serde_json::json!(["b"]));
  assert_eq!(report["pipeline"]["components"][2]["id"], "c");
}

#[test]
fn json_report_with_error() {
  let output = run("a = CloudMarkovChainSource()\na = 3", &["--format", "json"]);

  assert_eq!(output.status.code(), Some(1));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report, serde_json::json!({
    "errors": [{
      "startLineNumber": 2,
      "startColumn": 1,
      "endLineNumber": 2,
      "endColumn": 2,
      "byteRange": [29, 30],
      "message": "Component Shadowed: `a` is already bound to a `CloudMarkovChainSource` component",
    }],
    "warnings": [],
  }));
}

#[test]
fn file_not_found() {
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["run", "does-not-exist.banana"])
    .output()
    .unwrap();

  assert_eq!(output.status.code(), Some(2));
  assert!(output.stdout.is_empty());

  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.contains("File not found `does-not-exist.banana`"));
}

#[test]
fn component_list() {
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .arg("components")
    .output()
    .unwrap();

  assert!(output.status.success());

  let stdout = String::from_utf8(output.stdout).unwrap();
  assert!(stdout.contains("KafkaSource (Source)\n  zk_host: string = localhost\n"));
  assert!(stdout.contains("StdoutSink (Sink)\n"));
  assert!(stdout.contains("  aggregation_function: enum (avg | max | sum | min | cnt) = avg\n"));
}
