use crate::{TypeError, TypeTable, typecheck};
use banana_components::{ConnectionRules, Registry, Type};
use banana_syntax::{Span, parse};
use indoc::indoc;

fn check_with(source: &str, rules: &ConnectionRules) -> Result<TypeTable, TypeError> {
  let ast = parse(source);
  assert!(ast.is_valid(), "{:?}", ast.errors);

  typecheck(&ast, &Registry::builtin(), rules)
}

fn check(source: &str) -> TypeTable {
  match check_with(source, &ConnectionRules::legacy()) {
    Ok(table) => table,
    Err(error) => panic!("unexpected type error: {}", error.full_message()),
  }
}

fn type_of(source: &str, name: &str) -> String {
  let table = check(source);
  table.final_types()[name].to_string()
}

fn error(source: &str) -> TypeError {
  match check_with(source, &ConnectionRules::legacy()) {
    Ok(_) => panic!("expected a type error"),
    Err(error) => error,
  }
}

#[test]
fn literals_and_expressions() {
  let source = indoc! {r#"
    a = 1
    b = "s"
    c = a + 2 * 3
    d = b + a
    e = (a - 1) / 2
  "#};

  assert_eq!(type_of(source, "a"), "number");
  assert_eq!(type_of(source, "b"), "string");
  assert_eq!(type_of(source, "c"), "number");
  assert_eq!(type_of(source, "d"), "string");
  assert_eq!(type_of(source, "e"), "number");
}

#[test]
fn objects() {
  let source = indoc! {r#"
    e = { x: 1, y.z: "s", "w": [1, 2] }
    f = e.y
  "#};
  let table = check(source);

  assert_eq!(table.get_type(&["e", "y", "z"], 2), Some(&Type::String));
  assert_eq!(table.get_type(&["e", "x"], 2), Some(&Type::Number));
  assert_eq!(table.get_type(&["e", "w"], 2), Some(&Type::Any));
  assert!(table.get_type(&["f", "z"], 2).is_some());

  assert_eq!(type_of("l = { a: [1] }\nm = l.a.b.c", "m"), "any");
}

#[test]
fn conflicting_property() {
  assert!(matches!(
    error("a = { b: 1, b.c: 2 }"),
    TypeError::ConflictingProperty { key, .. } if key == "b.c"
  ));
}

#[test]
fn unknown_name() {
  let error = error("value = 1\nb = valeu + 1");

  assert_eq!(
    error,
    TypeError::UnknownName {
      identifier: "valeu".to_owned(),
      span: Span::new(14, 19),
      did_you_mean: Some("value".to_owned()),
    }
  );
  assert!(error.full_message().contains("did you mean `value`?"));
}

#[test]
fn property_does_not_exist() {
  assert!(matches!(
    error("a = 1\nb = a.c"),
    TypeError::PropertyDoesNotExist { property, parent, type_, .. }
      if property == "c" && parent == "a" && type_ == "number"
  ));
  assert!(matches!(
    error("k = KafkaSink()\nb = k.bogus"),
    TypeError::PropertyDoesNotExist { property, .. } if property == "bogus"
  ));

  assert_eq!(type_of("k = KafkaSink()\nb = k.port", "b"), "number");
}

#[test]
fn string_operators() {
  assert_eq!(
    error(r#"a = "a" - 1"#),
    TypeError::UnknownOperator {
      operator: "-".to_owned(),
      type_: "string".to_owned(),
      span: Span::new(8, 9),
    }
  );
  assert!(matches!(
    error(r#"a = 1 - "a""#),
    TypeError::UnknownOperator { span, .. } if span == Span::new(6, 7)
  ));
  assert!(matches!(
    error(r#"a = "x" * 2"#),
    TypeError::UnknownOperator { operator, .. } if operator == "*"
  ));

  assert_eq!(type_of(r#"a = "x" + (1 - 2)"#, "a"), "string");

  // any string operand makes the whole run a concatenation
  assert!(matches!(
    error(r#"a = 1 - 2 + "a""#),
    TypeError::UnknownOperator { operator, span, .. } if operator == "-" && span == Span::new(6, 7)
  ));
  assert_eq!(type_of(r#"a = (1 - 2) + "a""#, "a"), "string");
}

#[test]
fn operand_type_mismatch() {
  assert!(matches!(
    error("o = {}\na = 1 + o"),
    TypeError::TypeMismatch { given, .. } if given == "object"
  ));
}

#[test]
fn component_arguments() {
  assert_eq!(
    type_of(r#"a = KafkaSink("host", 9092, "topic")"#, "a"),
    "component KafkaSink"
  );
  assert_eq!(
    type_of(r#"a = KafkaSink(topic="t", port=1)"#, "a"),
    "component KafkaSink"
  );

  assert!(matches!(
    error(r#"a = KafkaSink(host="h", 1)"#),
    TypeError::ComponentMixedArgs { .. }
  ));
  assert!(matches!(
    error(r#"a = KafkaSink("a", 1, "b", 2)"#),
    TypeError::ComponentTooManyParams {
      expected: 3,
      given: 4,
      ..
    }
  ));
  assert!(matches!(
    error(r#"a = KafkaSink(hots="a")"#),
    TypeError::ComponentWrongParamName { did_you_mean: Some(name), .. } if name == "host"
  ));
  assert!(matches!(
    error(r#"a = KafkaSink(host="a", host="b")"#),
    TypeError::ComponentDuplicateParam { param, .. } if param == "host"
  ));
  assert!(matches!(
    error(r#"a = KafkaSink(port="x")"#),
    TypeError::TypeMismatch { expected, given, .. } if expected == "number" && given == "string"
  ));
  assert!(matches!(
    error("a = KafkaSnk()"),
    TypeError::UnknownComponent { did_you_mean: Some(name), .. } if name == "KafkaSink"
  ));
}

#[test]
fn enum_parameters() {
  assert!(matches!(
    error(r#"a = MonascaAggregateLDP(aggregation_function="median")"#),
    TypeError::UnknownVariant { value, .. } if value == "median"
  ));

  check(r#"a = MonascaAggregateLDP(aggregation_function="max")"#);
  check(r#"a = MonascaAggregateLDP(aggregation_function="m" + "ax")"#);
  check("a = MonascaAggregateLDP(aggregation_function = 1)");
}

#[test]
fn component_shadowing() {
  let error = error("a = CloudMarkovChainSource()\na = 3");

  assert_eq!(
    error,
    TypeError::ComponentShadowing {
      identifier: "a".to_owned(),
      class: "CloudMarkovChainSource".to_owned(),
      span: Span::new(29, 30),
    }
  );
  assert!(error.message().contains("CloudMarkovChainSource"));
}

#[test]
fn assignment_shape() {
  assert!(matches!(
    error("a = StdoutSink()\nb = a"),
    TypeError::AssignmentShape { .. }
  ));
  assert!(matches!(
    error("a = StdoutSink()\nx.y = a"),
    TypeError::AssignmentShape { .. }
  ));
  assert!(matches!(
    error("a = StdoutSink()\nx = { y: a }"),
    TypeError::AssignmentShape { .. }
  ));
  assert!(matches!(
    error("a = StdoutSink()\nx = { k: [1, a] }"),
    TypeError::AssignmentShape { span, .. } if span == Span::new(30, 31)
  ));
  assert!(matches!(
    error("a = StdoutSink()\nx = { k: [[a]] }"),
    TypeError::AssignmentShape { span, .. } if span == Span::new(28, 29)
  ));
}

#[test]
fn dotted_assignment() {
  let source = indoc! {"
    a = KafkaSink()
    a.port = 10
    a.host = 1
    c.d.e = 1
  "};
  let table = check(source);

  assert_eq!(table.get_type(&["a", "host"], 4), Some(&Type::String));
  assert_eq!(table.get_type(&["c", "d", "e"], 4), Some(&Type::Number));

  assert!(matches!(
    error("a = KafkaSink()\na.port = \"x\""),
    TypeError::TypeMismatch { expected, given, .. } if expected == "number" && given == "string"
  ));
  assert!(matches!(
    error("a = KafkaSink()\na.unknown = 1"),
    TypeError::PropertyDoesNotExist { property, type_, .. }
      if property == "unknown" && type_ == "component KafkaSink"
  ));
  assert!(matches!(
    error("n = 1\nn.x = 2"),
    TypeError::PropertyDoesNotExist { property, parent, .. } if property == "x" && parent == "n"
  ));
}

#[test]
fn type_table_history() {
  let source = indoc! {r#"
    a = 1
    b = 2
    a = 1
    a = "s"
  "#};
  let table = check(source);

  let indexes: Vec<_> = table.snapshots().iter().map(|s| s.index).collect();
  assert_eq!(indexes, [0, 1, 3]);

  assert_eq!(table.get_type(&["a"], 0), None);
  assert_eq!(table.get_type(&["a"], 1), Some(&Type::Number));
  assert_eq!(table.get_type(&["a"], 3), Some(&Type::Number));
  assert_eq!(table.get_type(&["a"], 4), Some(&Type::String));
  assert_eq!(table.get_type(&["b"], 1), None);
}

#[test]
fn connections() {
  let source = indoc! {"
    a = CloudMarkovChainSource()
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    a -> c -> [d, b]
  "};

  assert!(check_with(source, &ConnectionRules::legacy()).is_ok());
  assert!(matches!(
    check_with(source, &ConnectionRules::strict()),
    Err(TypeError::ConnectionIllegal { from, to, from_kind, to_kind, .. })
      if from == "c" && to == "b" && from_kind == "Ingestor" && to_kind == "Sink"
  ));

  assert!(matches!(
    error("a = StdoutSink()\nb = KafkaSource()\na -> b"),
    TypeError::ConnectionIllegal { .. }
  ));
  assert!(matches!(
    error("a = KafkaSource()\na -> zz"),
    TypeError::UnknownName { identifier, .. } if identifier == "zz"
  ));
  assert!(matches!(
    error("n = 1\na = KafkaSource()\na -> n"),
    TypeError::ConnectionNotComponent { identifier, .. } if identifier == "n"
  ));
}

#[test]
fn type_table_json() {
  let table = check("a = 1\nb = { c: \"x\" }");

  assert_eq!(
    table.to_json().to_string(),
    r#"{"a":{"id":"number"},"b":{"id":"object","props":{"c":{"id":"string"}},"strict":false}}"#
  );
}
