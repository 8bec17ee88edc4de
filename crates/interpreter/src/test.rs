use crate::{Config, Context, Error, MachineEmitter, PassManager, Pipeline, RecordingDriver};
use banana_components::{
  ClassDescriptor, ComponentKind, ConfigError, ConnectionRules, Registry, Type, Value,
};
use banana_syntax::Span;
use banana_typechecker::TypeError;
use indoc::indoc;

struct Run {
  result: Result<Context, Error>,
  driver: RecordingDriver,
  emitter: MachineEmitter,
}
impl Run {
  fn context(&self) -> &Context {
    match &self.result {
      Ok(context) => context,
      Err(error) => panic!("unexpected error: {}", error.full_message()),
    }
  }

  fn error(&self) -> &Error {
    match &self.result {
      Ok(_) => panic!("expected an error"),
      Err(error) => error,
    }
  }

  fn pipeline(&self) -> &Pipeline {
    match &self.driver.pipeline {
      Some(pipeline) => pipeline,
      None => panic!("expected a pipeline to be set"),
    }
  }

  fn warnings(&self) -> Vec<&str> {
    self
      .emitter
      .warnings
      .iter()
      .map(|warning| warning.message.as_str())
      .collect()
  }

  fn links(&self) -> Vec<(&str, &str)> {
    let mut links: Vec<_> = self
      .pipeline()
      .links
      .iter()
      .flat_map(|(from, to)| to.iter().map(move |to| (from.as_str(), to.as_str())))
      .collect();
    links.sort_unstable();
    links
  }
}

fn run_with(source: &str, registry: &Registry, config: Config) -> Run {
  let mut driver = RecordingDriver::default();
  let mut emitter = MachineEmitter::new();
  let result = PassManager::new(registry, config).execute(source, &mut driver, &mut emitter);

  Run {
    result,
    driver,
    emitter,
  }
}

fn run(source: &str) -> Run {
  run_with(source, &Registry::builtin(), Config::default())
}

fn greeter_registry() -> Registry {
  let mut registry = Registry::builtin();
  registry.register(
    ClassDescriptor::new("Greeter", ComponentKind::Source)
      .param("greeting", Type::String, "")
      .param("k", Type::String, "")
      .param("times", Type::Number, 1.0),
  );
  registry
}

fn names(context: &Context) -> Vec<&str> {
  context.components.keys().map(String::as_str).collect()
}

#[test]
fn minimum_viable_program() {
  let source = indoc! {"
    a = CloudMarkovChainSource()
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    a -> c -> d -> b
  "};
  let run = run(source);

  assert_eq!(names(run.context()), ["a", "b", "c", "d"]);
  assert!(run.emitter.is_empty());
  assert_eq!(run.links(), [("a", "c"), ("c", "d"), ("d", "b")]);
  assert_eq!(run.driver.calls, ["stop", "set_links", "start"]);

  let lingam = &run.context().components["d"];
  assert_eq!(lingam.class_name, "LiNGAM");
  assert_eq!(lingam.kind, ComponentKind::Sml);
  assert_eq!(lingam.config["threshold"], Value::Number(0.1));
}

#[test]
fn dead_branch_pruned() {
  let source = indoc! {"
    a = CloudMarkovChainSource()
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    a -> c -> [d, b]
  "};
  let run = run(source);

  assert_eq!(names(run.context()), ["a", "b", "c"]);
  assert_eq!(
    run.warnings(),
    ["Dead Component: `d` is not on a path from Source to Sink"]
  );
  assert!(run.emitter.errors.is_empty());
  assert_eq!(run.links(), [("a", "c"), ("c", "b")]);
}

#[test]
fn dead_branch_with_strict_rules() {
  let source = indoc! {"
    a = CloudMarkovChainSource()
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    a -> c -> [d, b]
  "};
  let run = run_with(source, &Registry::builtin(), Config::strict());

  assert!(matches!(
    run.error(),
    Error::Type(TypeError::ConnectionIllegal { from, to, .. }) if from == "c" && to == "b"
  ));
  assert!(run.driver.calls.is_empty());
  assert_eq!(run.emitter.errors.len(), 1);
  assert!(run.emitter.errors[0].message.starts_with("Illegal Connection"));
}

#[test]
fn no_source() {
  let source = indoc! {"
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    c -> d -> b
  "};
  let run = run(source);

  assert!(matches!(
    run.error(),
    Error::NoFullPath {
      missing: ComponentKind::Source,
      ..
    }
  ));
  assert_eq!(run.warnings().len(), 3);
  assert!(run.warnings()[0].contains("`b`"));
  assert!(run.warnings()[1].contains("`c`"));
  assert!(run.warnings()[2].contains("`d`"));
  assert_eq!(
    run.emitter.errors[0].message,
    "No Full Path: there is no path from a Source to a Sink, as there is no Source"
  );
  assert!(run.driver.calls.is_empty());
}

#[test]
fn unconnected_source() {
  let run = run("a = KafkaSource()\nb = CloudIngestor()\na -> b");

  assert_eq!(run.warnings().len(), 2);
  assert!(matches!(
    run.error(),
    Error::NoFullPath {
      missing: ComponentKind::Source,
      ..
    }
  ));
}

#[test]
fn shadowing_a_component() {
  let run = run("a = CloudMarkovChainSource()\na = 3");

  assert!(matches!(
    run.error(),
    Error::Type(TypeError::ComponentShadowing { identifier, class, span })
      if identifier == "a" && class == "CloudMarkovChainSource" && *span == Span::new(29, 30)
  ));
  assert_eq!(
    run.emitter.to_json(),
    serde_json::json!({
      "errors": [{
        "startLineNumber": 2,
        "startColumn": 1,
        "endLineNumber": 2,
        "endColumn": 2,
        "byteRange": [29, 30],
        "message": "Component Shadowed: `a` is already bound to a `CloudMarkovChainSource` component",
      }],
      "warnings": [],
    })
  );
}

#[test]
fn expression_type_drives_evaluation() {
  let source = indoc! {r#"
    cfg = Greeter()
    i = CloudIngestor()
    out = StdoutSink()
    cfg -> i -> out
    cfg.greeting = "hi " + 2
    cfg.times = 2 + 3 * 4
  "#};
  let run = run_with(source, &greeter_registry(), Config::default());

  assert!(run.emitter.is_empty());
  let greeter = &run.context().components["cfg"];
  assert_eq!(greeter.config["greeting"], Value::from("hi 2"));
  assert_eq!(greeter.config["times"], Value::Number(14.0));
  assert_eq!(greeter.config["k"], Value::from(""));
}

#[test]
fn unknown_operator_on_string() {
  let source = indoc! {r#"
    cfg = Greeter()
    i = CloudIngestor()
    out = StdoutSink()
    cfg -> i -> out
    cfg.k = "a" - 1
  "#};
  let run = run_with(source, &greeter_registry(), Config::default());
  let Some(minus) = source.rfind(" - ") else {
    panic!("expected a minus");
  };
  let minus = u32::try_from(minus + 1).unwrap_or_default();

  assert!(matches!(
    run.error(),
    Error::Type(TypeError::UnknownOperator { operator, span, .. })
      if operator == "-" && *span == Span::new(minus, minus + 1)
  ));
  assert!(run.driver.calls.is_empty());
}

#[test]
fn duplicate_json_key() {
  let run = run("cfg = { a: 1, a: 2 }");

  let Error::Parse(errors) = run.error() else {
    panic!("expected a syntax error");
  };
  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].title(), "Duplicate Key");
  assert_eq!(errors[0].span(), Span::new(14, 15));
  assert_eq!(run.emitter.errors.len(), 1);
}

#[test]
fn every_syntax_error_is_reported() {
  let run = run("a = )\nb = 1 2\nc = KafkaSource()");

  let Error::Parse(errors) = run.error() else {
    panic!("expected a syntax error");
  };
  assert_eq!(errors.len(), 2);
  assert_eq!(run.emitter.errors.len(), 2);
}

#[test]
fn parse_warnings_are_emitted() {
  let source = indoc! {"
    a = KafkaSource()
    b = CloudIngestor()
    c = StdoutSink()
    a -> b -> c
    a -> b
  "};
  let run = run(source);

  assert_eq!(names(run.context()), ["a", "b", "c"]);
  assert_eq!(run.warnings().len(), 1);
  assert!(run.warnings()[0].starts_with("Duplicate Connection"));
  assert_eq!(run.links(), [("a", "b"), ("b", "c")]);
}

#[test]
fn denied_warnings() {
  let source = indoc! {"
    a = CloudMarkovChainSource()
    b = StdoutSink()
    c = CloudIngestor()
    d = LiNGAM()
    a -> c -> [d, b]
  "};
  let config = Config {
    deny_warnings: true,
    ..Config::default()
  };
  let run = run_with(source, &Registry::builtin(), config);

  assert!(matches!(run.error(), Error::DeniedWarnings { count: 1, .. }));
  assert_eq!(run.warnings().len(), 1);
  assert_eq!(run.emitter.errors.len(), 1);
  assert!(run.driver.pipeline.is_none());
}

#[test]
fn variables() {
  let source = indoc! {r#"
    x = 1 + 2 * 3
    s = "n" + x
    o = { a.b: x, "c": s }
    o.d.e = (x - 1) / 2
    l = [1 + 2, "a" + 1]
    k = KafkaSource(zk_host = 2 * 3, group_id = 1 + 2, zk_port = x * 1000)
    sink = StdoutSink()
    i = CloudIngestor()
    k -> i -> sink
  "#};
  let run = run(source);
  let context = run.context();

  assert_eq!(context.variables["x"], Value::Number(7.0));
  assert_eq!(context.variables["s"], Value::from("n7"));
  assert_eq!(
    context.variables["o"].to_json(),
    serde_json::json!({ "a": { "b": 7 }, "c": "n7", "d": { "e": 3 } })
  );
  assert_eq!(
    context.variables["l"],
    Value::List(vec![Value::Number(3.0), Value::from("a1")])
  );

  let kafka = &context.components["k"];
  assert_eq!(kafka.config["zk_host"], Value::from("6"));
  assert_eq!(kafka.config["group_id"], Value::from("12"));
  assert_eq!(kafka.config["zk_port"], Value::Number(7000.0));
  assert_eq!(
    kafka.config["topics"].to_json(),
    serde_json::json!({ "my_topic": 1 })
  );
}

#[test]
fn component_arguments() {
  let source = indoc! {r#"
    src = RandomSource(host = "example.com", port = 8080, model = { name: "normal", params.mean: 2 })
    agg = MonascaAggregateLDP(aggregation_function = "max")
    sink = FileSink("/var/log/monanas")
    src -> agg -> sink
    agg.aggregation_period = 30
  "#};
  let run = run(source);
  let context = run.context();

  let random = &context.components["src"];
  assert_eq!(random.config["host"], Value::from("example.com"));
  assert_eq!(random.config["port"], Value::Number(8080.0));
  assert_eq!(random.config["alert_per_burst"], Value::Number(1.0));
  assert_eq!(
    random.config["model"].to_json(),
    serde_json::json!({ "name": "normal", "params": { "mean": 2 } })
  );

  let aggregate = &context.components["agg"];
  assert_eq!(aggregate.config["aggregation_function"], Value::from("max"));
  assert_eq!(aggregate.config["aggregation_period"], Value::Number(30.0));
  assert_eq!(
    context.components["sink"].config["path"],
    Value::from("/var/log/monanas")
  );
}

#[test]
fn component_parameters_can_be_read() {
  let source = indoc! {r#"
    src = KafkaSource(zk_port = 3000)
    port = src.zk_port + 1
    host = "host:" + src.zk_port
    i = CloudIngestor()
    sink = KafkaSink(port = port)
    src -> i -> sink
  "#};
  let run = run(source);
  let context = run.context();

  assert_eq!(context.variables["port"], Value::Number(3001.0));
  assert_eq!(context.variables["host"], Value::from("host:3000"));
  assert_eq!(context.components["sink"].config["port"], Value::Number(3001.0));
}

#[test]
fn variable_rebound_to_component() {
  let source = indoc! {"
    a = 1
    a = KafkaSource(zk_port = 2000)
    c = CloudIngestor()
    b = StdoutSink()
    x = a.zk_port
    a -> c -> b
  "};
  let run = run(source);
  let context = run.context();

  assert_eq!(context.variables["x"], Value::Number(2000.0));
  assert!(!context.variables.contains_key("a"));
  assert_eq!(context.components["a"].class_name, "KafkaSource");
}

#[test]
fn number_given_to_enum_parameter() {
  let source = indoc! {"
    src = CloudMarkovChainSource()
    ldp = MonascaAggregateLDP(aggregation_function = 1)
    sink = StdoutSink()
    src -> ldp -> sink
  "};
  let run = run(source);

  assert!(matches!(
    run.error(),
    Error::InvalidConfiguration { component, .. } if component == "ldp"
  ));
}

#[test]
fn expression_parameters() {
  let source = indoc! {r#"
    src = CloudMarkovChainSource()
    combine = MonascaCombineLDP(lambda = "a * b + c")
    combine.bindings.c = "cpu.offset"
    sink = StdoutSink()
    src -> combine -> sink
  "#};
  let run = run(source);

  let Value::Expression(lambda) = &run.context().components["combine"].config["lambda"] else {
    panic!("expected the lambda to be compiled");
  };
  let lookup = |name: &str| match name {
    "cpu.idle_perc" => 0.5,
    "cpu.total_logical_cores" => 8.0,
    "cpu.offset" => 1.0,
    _ => f64::NAN,
  };

  assert_eq!(lambda.source(), "a * b + c");
  assert_eq!(lambda.call(&lookup), 5.0);
  assert_eq!(lambda.bindings()["c"], "cpu.offset");
}

#[test]
fn invalid_expression_parameter() {
  let source = indoc! {r#"
    src = CloudMarkovChainSource()
    combine = MonascaCombineLDP(lambda = "a * d")
    sink = StdoutSink()
    src -> combine -> sink
  "#};
  let run = run(source);

  assert!(matches!(
    run.error(),
    Error::InvalidExpression { component, param, .. } if component == "combine" && param == "lambda"
  ));
  assert!(run.emitter.errors[0].message.starts_with("Invalid Expression"));
  assert!(run.driver.pipeline.is_none());
}

#[test]
fn invalid_configuration() {
  let source = indoc! {"
    src = KafkaSource(zk_port = 70000)
    i = CloudIngestor()
    sink = StdoutSink()
    src -> i -> sink
  "};
  let run = run(source);

  assert!(matches!(
    run.error(),
    Error::InvalidConfiguration {
      component,
      error: ConfigError::Invalid { .. },
      ..
    } if component == "src"
  ));
}

#[test]
fn dead_components_are_not_instantiated() {
  let source = indoc! {"
    a = KafkaSource()
    b = CloudIngestor()
    c = StdoutSink()
    d = RandomSource(port = 70000)
    e = LiNGAM()
    a -> b -> c
    b -> e
    x = d.port
  "};
  let run = run(source);
  let context = run.context();

  assert_eq!(names(context), ["a", "b", "c"]);
  assert_eq!(run.warnings().len(), 2);
  assert!(run.warnings()[0].contains("`d`"));
  assert!(run.warnings()[1].contains("`e`"));
  assert_eq!(context.variables["x"], Value::Number(70000.0));
  assert_eq!(run.links(), [("a", "b"), ("b", "c")]);
}

#[test]
fn surviving_components_are_on_a_full_path() {
  let source = indoc! {"
    s1 = KafkaSource()
    s2 = RandomSource()
    i1 = CloudIngestor()
    i2 = IptablesIngestor()
    m1 = LiNGAM()
    m2 = SvmOneClass()
    v = PickIndexVoter()
    out = StdoutSink()
    s1 -> i1 -> m1 -> v -> out
    s2 -> i2 -> m2
    i1 -> m2
  "};
  let run = run(source);
  let pipeline = run.pipeline();

  assert_eq!(names(run.context()), ["s1", "i1", "m1", "v", "out"]);
  assert_eq!(run.warnings().len(), 3);

  let rules = ConnectionRules::legacy();
  for (from, destinations) in &pipeline.links {
    for to in destinations {
      let (from, to) = (&pipeline.components[from], &pipeline.components[to]);
      assert!(rules.is_allowed(from.kind, to.kind));
    }
  }

  let reaches_sink = |start: &str| {
    let mut stack = vec![start.to_owned()];
    let mut seen = Vec::new();
    while let Some(name) = stack.pop() {
      if pipeline.components[&name].kind == ComponentKind::Sink {
        return true;
      }
      if !seen.contains(&name) {
        stack.extend(pipeline.links[&name].iter().cloned());
        seen.push(name);
      }
    }
    false
  };
  assert!(pipeline.components.keys().all(|name| reaches_sink(name)));
}

#[test]
fn evaluation_is_deterministic() {
  let source = indoc! {r#"
    src = CloudMarkovChainSource(sleep = 0.5, graph = { "h1:host": ["h2:host"] })
    combine = MonascaCombineLDP()
    sink = KafkaSink(topic = "alerts" + 1)
    src -> combine -> sink
    name = combine.metric_name + "." + sink.port
  "#};
  let registry = Registry::builtin();
  let manager = PassManager::new(&registry, Config::default());

  let first = run(source);
  let second = run(source);
  assert_eq!(first.result, second.result);
  assert_eq!(first.driver, second.driver);
  assert_eq!(
    first.context().variables["name"],
    Value::from("cpu.logical_cores_actives.9092")
  );

  let mut emitter = MachineEmitter::new();
  let tables = (
    manager.typecheck_only(source, &mut emitter),
    manager.typecheck_only(source, &mut emitter),
  );
  assert!(tables.0.is_ok());
  assert_eq!(tables.0, tables.1);
  assert!(emitter.is_empty());
}

#[test]
fn typecheck_only_reports_errors() {
  let registry = Registry::builtin();
  let manager = PassManager::new(&registry, Config::default());
  let mut emitter = MachineEmitter::new();

  let result = manager.typecheck_only("a = KafkaSorce()", &mut emitter);

  assert!(matches!(
    result,
    Err(Error::Type(TypeError::UnknownComponent { .. }))
  ));
  assert_eq!(emitter.errors.len(), 1);
  assert!(emitter.errors[0].message.starts_with("Unknown Component"));
}

#[test]
fn pipeline_json() {
  let run = run("a = KafkaSource()\nb = CloudIngestor()\nc = FileSink()\na -> b -> c");

  assert_eq!(
    run.pipeline().to_json()["links"],
    serde_json::json!({ "a": ["b"], "b": ["c"], "c": [] })
  );
  assert_eq!(
    run.pipeline().to_json()["components"][2],
    serde_json::json!({
      "id": "c",
      "component": "FileSink",
      "kind": "Sink",
      "params": { "path": "/tmp/monanas.log" },
    })
  );
}

#[test]
fn replacing_the_pipeline() {
  let registry = Registry::builtin();
  let manager = PassManager::new(&registry, Config::default());
  let mut driver = RecordingDriver::default();
  let mut emitter = MachineEmitter::new();

  let first = manager.execute(
    "a = KafkaSource()\nb = CloudIngestor()\nc = StdoutSink()\na -> b -> c",
    &mut driver,
    &mut emitter,
  );
  assert!(first.is_ok());

  let second = manager.execute("a = KafkaSource()", &mut driver, &mut emitter);
  assert!(second.is_err());
  assert_eq!(driver.calls, ["stop", "set_links", "start"]);

  let third = manager.execute(
    "x = RandomSource()\ny = IptablesIngestor()\nz = IptablesSQLiteSink()\nx -> y -> z",
    &mut driver,
    &mut emitter,
  );
  assert!(third.is_ok());
  assert_eq!(driver.calls.len(), 6);
  assert_eq!(
    driver.pipeline.map(|pipeline| pipeline.components.len()),
    Some(3)
  );
}
