//! The builtin component classes

use crate::{
  kind::ComponentKind,
  registry::{
    ComponentClass, Config, ConfigError, ExpressionParam, ParamDescriptor, check_params,
  },
  types::Type,
  value::Value,
};

type Validator = fn(&Config) -> Result<(), String>;

/// A component class described by a list of parameters
///
/// Used for every builtin class, and available for registering extra classes.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
  name: &'static str,
  kind: ComponentKind,
  params: Vec<ParamDescriptor>,
  expression_params: Vec<ExpressionParam>,
  validator: Option<Validator>,
}
impl ClassDescriptor {
  /// A class with no parameters
  #[must_use]
  pub fn new(name: &'static str, kind: ComponentKind) -> Self {
    Self {
      name,
      kind,
      params: Vec::new(),
      expression_params: Vec::new(),
      validator: None,
    }
  }

  /// Add a parameter, after the existing parameters
  #[must_use]
  pub fn param(mut self, name: &str, type_: Type, default: impl Into<Value>) -> Self {
    self.params.push(ParamDescriptor {
      name: name.to_owned(),
      type_,
      default: default.into(),
    });
    self
  }

  /// Mark a parameter as an expression, with names bound by another parameter
  #[must_use]
  pub fn expression(mut self, expression: &'static str, environment: &'static str) -> Self {
    self.expression_params.push(ExpressionParam {
      expression,
      environment,
    });
    self
  }

  /// Add extra validation, run after the parameter types are checked
  #[must_use]
  pub fn validate(mut self, validator: Validator) -> Self {
    self.validator = Some(validator);
    self
  }
}
impl ComponentClass for ClassDescriptor {
  fn name(&self) -> &str {
    self.name
  }

  fn kind(&self) -> ComponentKind {
    self.kind
  }

  fn params(&self) -> Vec<ParamDescriptor> {
    self.params.clone()
  }

  fn expression_params(&self) -> Vec<ExpressionParam> {
    self.expression_params.clone()
  }

  fn validate_config(&self, config: &Config) -> Result<(), ConfigError> {
    check_params(self.name, &self.params, config)?;

    match self.validator {
      Some(validator) => validator(config).map_err(|message| ConfigError::Invalid {
        class: self.name.to_owned(),
        message,
      }),
      None => Ok(()),
    }
  }
}

fn number(config: &Config, name: &str) -> f64 {
  config.get(name).and_then(Value::as_number).unwrap_or_default()
}

fn port(config: &Config, name: &str) -> Result<(), String> {
  let port = number(config, name);

  if port.fract() == 0.0 && (1.0..=65535.0).contains(&port) {
    Ok(())
  } else {
    Err(format!("has `{name}` {port}, which is not a valid port"))
  }
}

fn positive(config: &Config, name: &str) -> Result<(), String> {
  let value = number(config, name);

  if value > 0.0 {
    Ok(())
  } else {
    Err(format!("requires `{name}` to be greater than 0, but it is {value}"))
  }
}

fn non_negative_integer(config: &Config, name: &str) -> Result<(), String> {
  let value = number(config, name);

  if value.fract() == 0.0 && value >= 0.0 {
    Ok(())
  } else {
    Err(format!("requires `{name}` to be a whole number, but it is {value}"))
  }
}

fn sml(name: &'static str) -> ClassDescriptor {
  ClassDescriptor::new(name, ComponentKind::Sml)
    .param("nb_samples", Type::Number, 1000.0)
    .validate(|config| positive(config, "nb_samples"))
}

/// Every builtin component class, grouped by kind
#[allow(clippy::too_many_lines)]
pub fn builtin_classes() -> Vec<ClassDescriptor> {
  use ComponentKind::{Ingestor, Ldp, Sink, Source, Voter};

  vec![
    // Sources
    ClassDescriptor::new("CloudMarkovChainSource", Source)
      .param("sleep", Type::Number, 0.01)
      .param("min_event_per_burst", Type::Number, 500.0)
      .param(
        "transitions",
        Type::open_object(),
        Value::object([
          ("web_service", Value::object([])),
          ("host", Value::object([])),
          ("switch", Value::object([])),
        ]),
      )
      .param(
        "triggers",
        Type::open_object(),
        Value::object([("support", Value::object([]))]),
      )
      .param("graph", Type::open_object(), Value::object([]))
      .validate(|config| positive(config, "sleep")),
    ClassDescriptor::new("IPTablesSource", Source)
      .param("sleep", Type::Number, 0.01)
      .validate(|config| positive(config, "sleep")),
    ClassDescriptor::new("KafkaSource", Source)
      .param("zk_host", Type::String, "localhost")
      .param("zk_port", Type::Number, 2181.0)
      .param("group_id", Type::String, "my_group_id")
      .param(
        "topics",
        Type::open_object(),
        Value::object([("my_topic", Value::Number(1.0))]),
      )
      .validate(|config| port(config, "zk_port")),
    ClassDescriptor::new("MonascaMarkovChainSource", Source)
      .param("sleep", Type::Number, 0.01)
      .validate(|config| positive(config, "sleep")),
    ClassDescriptor::new("RandomSource", Source)
      .param("host", Type::String, "localhost")
      .param("port", Type::Number, 1010.0)
      .param("alert_per_burst", Type::Number, 1.0)
      .param("idle_time_between_bursts", Type::Number, 1.0)
      .param("model", Type::open_object(), Value::object([]))
      .validate(|config| port(config, "port")),
    // Ingestors
    ClassDescriptor::new("CloudIngestor", Ingestor),
    ClassDescriptor::new("IptablesIngestor", Ingestor),
    // Statistical and machine learning models
    ClassDescriptor::new("LiNGAM", ComponentKind::Sml).param("threshold", Type::Number, 0.1),
    sml("SvmOneClass"),
    sml("SvcClassifier"),
    sml("DecisionTreeClassifier"),
    sml("LogisticRegression"),
    // Voters
    ClassDescriptor::new("PickIndexVoter", Voter)
      .param("index", Type::Number, 0.0)
      .validate(|config| non_negative_integer(config, "index")),
    // Live data processors
    ClassDescriptor::new("CloudCausalityLDP", Ldp),
    ClassDescriptor::new("IptablesLDP", Ldp),
    ClassDescriptor::new("MonascaDerivativeLDP", Ldp),
    ClassDescriptor::new("MonascaAggregateLDP", Ldp)
      .param("aggregation_period", Type::Number, 60.0)
      .param(
        "aggregation_function",
        Type::enumeration(["avg", "max", "sum", "min", "cnt"]),
        "avg",
      )
      .validate(|config| positive(config, "aggregation_period")),
    ClassDescriptor::new("MonascaCombineLDP", Ldp)
      .param("metric_name", Type::String, "cpu.logical_cores_actives")
      .param("combine_period", Type::Number, 1.0)
      .param("lambda", Type::String, "a * b")
      .param(
        "bindings",
        Type::open_object(),
        Value::object([
          ("a", Value::from("cpu.idle_perc")),
          ("b", Value::from("cpu.total_logical_cores")),
        ]),
      )
      .expression("lambda", "bindings")
      .validate(|config| positive(config, "combine_period")),
    // Sinks
    ClassDescriptor::new("StdoutSink", Sink),
    ClassDescriptor::new("FileSink", Sink).param("path", Type::String, "/tmp/monanas.log"),
    ClassDescriptor::new("KafkaSink", Sink)
      .param("host", Type::String, "localhost")
      .param("port", Type::Number, 9092.0)
      .param("topic", Type::String, "transformed_alerts")
      .validate(|config| port(config, "port")),
    ClassDescriptor::new("IptablesSQLiteSink", Sink).param(
      "db_file_name",
      Type::String,
      "sqlite_sink.db",
    ),
  ]
}
