//! # UI Tests for Typecheck Errors
#![cfg(not(miri))]

use assert_cmd::Command;
use indoc::indoc;

fn run_typecheck(file: &str) -> String {
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["typecheck", "-"])
    .write_stdin(file)
    .output()
    .unwrap();

  assert!(!output.status.success());
  String::from_utf8(output.stdout).unwrap()
}

#[test]
fn valid_program() {
  let source = indoc! {r#"
    src = KafkaSource(zk_host = "zookeeper", topics = { alerts: 2 })
    i = CloudIngestor()
    sink = KafkaSink(topic = src.group_id + "_out")
    src -> i -> sink
  "#};
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["typecheck", "-"])
    .write_stdin(source)
    .output()
    .unwrap();

  assert!(output.status.success());
  assert!(output.stdout.is_empty());
  assert!(output.stderr.is_empty());
}

#[test]
fn shadowing_a_component() {
  let source = indoc! {"
    a = CloudMarkovChainSource()
    a = 3
  "};
  let output = run_typecheck(source);

  assert_eq!(output, indoc! {"
    ✕ Error: Component Shadowed
    `a` is already bound to a `CloudMarkovChainSource` component
    hint: components can't be reassigned, try using a different name

        ╭─[STDIN:2]
      2 │ a = 3
    ────╯
  "});
}

#[test]
fn unknown_variable_with_suggestion() {
  let source = indoc! {"
    value = 5
    other = valeu + 1
  "};
  let output = run_typecheck(source);

  assert_eq!(output, indoc! {"
    ✕ Error: Unknown Name
    no variable defined with the name `valeu`
    hint: a variable with a similar name exists, did you mean `value`?

        ╭─[STDIN:2]
      2 │ other = valeu + 1
    ────╯
  "});
}

#[test]
fn unknown_operator_on_string() {
  let source = indoc! {r#"
    greeting = "hello" * 2
  "#};
  let output = run_typecheck(source);

  assert!(output.starts_with("✕ Error: Unknown Operator\n"));
  assert!(output.contains("  1 │ greeting = \"hello\" * 2\n"));
}

#[test]
fn illegal_connection_with_strict_rules() {
  let source = indoc! {"
    i = CloudIngestor()
    s = StdoutSink()
    i -> s
  "};

  let legacy = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["typecheck", "-"])
    .write_stdin(source)
    .output()
    .unwrap();
  assert!(legacy.status.success());

  let strict = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["typecheck", "-", "--rules", "strict"])
    .write_stdin(source)
    .output()
    .unwrap();
  assert_eq!(strict.status.code(), Some(1));

  let output = String::from_utf8(strict.stdout).unwrap();
  assert!(output.starts_with("✕ Error: Illegal Connection\n"));
  assert!(output.contains("  3 │ i -> s\n"));
}

#[test]
fn json_types() {
  let source = indoc! {r#"
    a = 1
    b = { c: "s" }
  "#};
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["typecheck", "-", "--format", "json"])
    .write_stdin(source)
    .output()
    .unwrap();

  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report, serde_json::json!({
    "errors": [],
    "warnings": [],
    "types": {
      "a": { "id": "number" },
      "b": { "id": "object", "props": { "c": { "id": "string" } }, "strict": false },
    },
  }));
}
