use crate::{
  ClassDescriptor, ComponentClass, ComponentKind, ConfigError, ConnectionRules, Registry, Type,
  Value,
  path::{PathErrorKind, assign_path},
};
use indexmap::IndexMap;

#[test]
fn builtin_registry() {
  let registry = Registry::builtin();

  assert_eq!(registry.names().count(), 22);
  assert_eq!(
    registry.get("CloudMarkovChainSource").map(|c| c.kind()),
    Some(ComponentKind::Source)
  );
  assert_eq!(
    registry.get("StdoutSink").map(|c| c.kind()),
    Some(ComponentKind::Sink)
  );
  assert!(registry.get("NotAComponent").is_none());

  for class in registry.classes() {
    let config = class.default_config();
    assert!(
      class.validate_config(&config).is_ok(),
      "{} default configuration is invalid",
      class.name()
    );
  }
}

#[test]
fn register_replaces_class() {
  let mut registry = Registry::new();
  registry.register(ClassDescriptor::new("Example", ComponentKind::Source));
  registry.register(ClassDescriptor::new("Example", ComponentKind::Sink));

  assert_eq!(registry.names().collect::<Vec<_>>(), ["Example"]);
  assert_eq!(
    registry.get("Example").map(|c| c.kind()),
    Some(ComponentKind::Sink)
  );
}

#[test]
fn component_type_from_params() {
  let registry = Registry::builtin();
  let Some(class) = registry.get("KafkaSink") else {
    panic!("missing KafkaSink");
  };

  let Type::Component {
    kind,
    class_name,
    params,
  } = class.component_type()
  else {
    panic!("expected component type");
  };
  assert_eq!(kind, ComponentKind::Sink);
  assert_eq!(class_name, "KafkaSink");
  assert_eq!(params.keys().collect::<Vec<_>>(), ["host", "port", "topic"]);
  assert_eq!(params["port"], Type::Number);
}

#[test]
fn validate_configuration() {
  let registry = Registry::builtin();
  let Some(class) = registry.get("MonascaAggregateLDP") else {
    panic!("missing MonascaAggregateLDP");
  };

  let mut config = class.default_config();
  config.insert("aggregation_function".into(), "median".into());
  assert!(matches!(
    class.validate_config(&config),
    Err(ConfigError::WrongType { .. })
  ));

  let mut config = class.default_config();
  config.insert("aggregation_period".into(), Value::Number(-1.0));
  assert!(matches!(
    class.validate_config(&config),
    Err(ConfigError::Invalid { .. })
  ));

  let mut config = class.default_config();
  config.shift_remove("aggregation_period");
  assert!(matches!(
    class.instantiate("a", config),
    Err(ConfigError::MissingParam { .. })
  ));

  let instance = class.instantiate("agg", class.default_config());
  assert!(instance.is_ok_and(|instance| instance.id == "agg"));
}

#[test]
fn casting() {
  let strict = Type::strict_object([("a", Type::Number)]);
  let enumeration = Type::enumeration(["x", "y"]);

  assert!(Type::Number.can_be_cast_to(&Type::String));
  assert!(enumeration.can_be_cast_to(&Type::String));
  assert!(Type::String.can_be_cast_to(&enumeration));
  assert!(Type::Number.can_be_cast_to(&enumeration));
  assert!(!enumeration.can_be_cast_to(&Type::Number));
  assert!(!Type::String.can_be_cast_to(&Type::Number));
  assert!(Type::open_object().can_be_cast_to(&Type::Any));

  let given = Type::Object {
    props: IndexMap::from([("a".into(), Type::Number), ("b".into(), Type::String)]),
    strict: false,
  };
  assert!(given.can_be_cast_to(&strict));
  assert!(!Type::open_object().can_be_cast_to(&strict));
  assert!(strict.can_be_cast_to(&Type::open_object()));

  let registry = Registry::builtin();
  let (Some(source), Some(sink)) = (registry.get("KafkaSource"), registry.get("StdoutSink")) else {
    panic!("missing builtin classes");
  };
  assert!(!source.component_type().can_be_cast_to(&sink.component_type()));
  assert!(!source.component_type().can_be_cast_to(&Type::String));
}

#[test]
fn connection_rules() {
  use ComponentKind::{Ingestor, Ldp, Sink, Sml, Source, Voter};

  let legacy = ConnectionRules::legacy();
  assert!(legacy.is_allowed(Source, Ingestor));
  assert!(legacy.is_allowed(Ingestor, Sink));
  assert!(!legacy.is_allowed(Sink, Source));
  assert!(!legacy.is_allowed(Source, Sink));
  assert_eq!(legacy.destinations(Voter), [Ldp, Sink]);

  let strict = ConnectionRules::strict();
  assert!(!strict.is_allowed(Ingestor, Sink));
  assert!(strict.is_allowed(Ingestor, Sml));

  assert_eq!(ConnectionRules::default(), legacy);
}

#[test]
fn assign_path_creates_open_objects() {
  let mut roots: IndexMap<String, Value> = IndexMap::new();

  assert!(assign_path(&mut roots, &["a", "b", "c"], Value::Number(1.0)).is_ok());
  assert!(assign_path(&mut roots, &["a", "d"], "x".into()).is_ok());
  assert_eq!(roots["a"].to_json().to_string(), r#"{"b":{"c":1},"d":"x"}"#);

  let error = assign_path(&mut roots, &["a", "d", "e"], Value::Number(2.0));
  assert!(error.is_err_and(|e| e.kind == PathErrorKind::NotAnObject && e.depth == 2));
}

#[test]
fn assign_path_types() {
  let mut roots: IndexMap<String, Type> = IndexMap::new();
  roots.insert(
    "s".into(),
    Type::strict_object([("a", Type::Number), ("b", Type::open_object())]),
  );

  assert!(assign_path(&mut roots, &["s", "a"], Type::Number).is_ok());
  assert!(assign_path(&mut roots, &["s", "b", "c"], Type::String).is_ok());

  let error = assign_path(&mut roots, &["s", "z"], Type::Number);
  assert!(error.is_err_and(|e| e.kind == PathErrorKind::UnknownProperty && e.depth == 1));

  let error = assign_path(&mut roots, &["s", "a"], Type::String);
  assert!(error.is_err_and(|e| e.kind == PathErrorKind::Mismatch));

  // Strict properties keep their declared type
  assert_eq!(roots["s"].property("a"), Some(&Type::Number));
  assert_eq!(
    roots["s"].property("b").and_then(|b| b.property("c")),
    Some(&Type::String)
  );

  roots.insert("any".into(), Type::Any);
  assert!(assign_path(&mut roots, &["any", "x", "y"], Type::Number).is_ok());
  assert_eq!(roots["any"], Type::Any);
}

#[test]
fn values() {
  assert_eq!(Value::Number(2.0).cast_to_string().as_str(), "2");
  assert_eq!(Value::Number(0.5).cast_to_string().as_str(), "0.5");
  assert_eq!(Value::from("3.5").as_number(), Some(3.5));
  assert_eq!(
    Type::enumeration(["avg", "max"]).default_value(),
    Value::from("avg")
  );
  assert_eq!(
    Value::object([("a", Value::Number(1.5))]).to_json().to_string(),
    r#"{"a":1.5}"#
  );
}
