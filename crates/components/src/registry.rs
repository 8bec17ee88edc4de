use crate::{catalog, kind::ComponentKind, types::Type, value::Value};
use indexmap::IndexMap;
use std::{error, fmt};

/// The configuration of a component, parameter name to value
pub type Config = IndexMap<String, Value>;

/// A parameter accepted by a component class
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
  /// The name of the parameter
  pub name: String,
  /// The type of the parameter
  pub type_: Type,
  /// The value used when the parameter isn't given
  pub default: Value,
}

/// A parameter holding an arithmetic expression, and the parameter holding the
/// bindings of the expression's names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionParam {
  /// The parameter containing the expression source
  pub expression: &'static str,
  /// The parameter containing an object of expression name to external name
  pub environment: &'static str,
}

/// A class of component, which can be constructed in a Banana file
pub trait ComponentClass: Send + Sync {
  /// The name used to construct the component
  fn name(&self) -> &str;

  /// The kind of the component
  fn kind(&self) -> ComponentKind;

  /// The parameters of the component, in positional order
  fn params(&self) -> Vec<ParamDescriptor>;

  /// Parameters which hold arithmetic expressions
  fn expression_params(&self) -> Vec<ExpressionParam> {
    Vec::new()
  }

  /// The configuration where every parameter has its default value
  fn default_config(&self) -> Config {
    self
      .params()
      .into_iter()
      .map(|param| (param.name, param.default))
      .collect()
  }

  /// The type of an instance of the component
  fn component_type(&self) -> Type {
    Type::Component {
      kind: self.kind(),
      class_name: self.name().to_owned(),
      params: self
        .params()
        .into_iter()
        .map(|param| (param.name, param.type_))
        .collect(),
    }
  }

  /// Check a configuration is valid for the component
  ///
  /// # Errors
  /// If a parameter is missing, or has a value which doesn't match its type
  fn validate_config(&self, config: &Config) -> Result<(), ConfigError> {
    check_params(self.name(), &self.params(), config)
  }

  /// Create an instance of the component
  ///
  /// # Errors
  /// If the configuration is not valid for the component
  fn instantiate(&self, id: &str, config: Config) -> Result<ComponentInstance, ConfigError> {
    self.validate_config(&config)?;

    Ok(ComponentInstance {
      id: id.to_owned(),
      class_name: self.name().to_owned(),
      kind: self.kind(),
      config,
    })
  }
}

/// Check every parameter has a value matching its type
pub(crate) fn check_params(
  class: &str,
  params: &[ParamDescriptor],
  config: &Config,
) -> Result<(), ConfigError> {
  for param in params {
    let Some(value) = config.get(&param.name) else {
      return Err(ConfigError::MissingParam {
        class: class.to_owned(),
        param: param.name.clone(),
      });
    };

    if !value_matches(&param.type_, value) {
      return Err(ConfigError::WrongType {
        class: class.to_owned(),
        param: param.name.clone(),
        expected: param.type_.to_string(),
        given: value.type_name().to_owned(),
      });
    }
  }

  Ok(())
}

/// Does a value match the shape of a type?
fn value_matches(type_: &Type, value: &Value) -> bool {
  match (type_, value) {
    (Type::Any, _) => true,
    (Type::Number, Value::Number(_)) => true,
    (Type::String, Value::String(_) | Value::Number(_) | Value::Expression(_)) => true,
    (Type::Enum { variants }, Value::String(string)) => {
      variants.iter().any(|variant| variant == string.as_str())
    }
    (Type::Object { props, strict }, Value::Object(properties)) => {
      props.iter().all(|(name, type_)| {
        properties
          .get(name)
          .is_none_or(|value| value_matches(type_, value))
      }) && (!strict || properties.keys().all(|name| props.contains_key(name)))
    }
    _ => false,
  }
}

/// An instantiated component, with its configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
  /// The name the component is bound to
  pub id: String,
  /// The class of the component
  pub class_name: String,
  /// The kind of the component
  pub kind: ComponentKind,
  /// The configuration the component was created with
  pub config: Config,
}
impl ComponentInstance {
  /// A JSON representation of the component
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    let params: serde_json::Map<String, serde_json::Value> = self
      .config
      .iter()
      .map(|(name, value)| (name.clone(), value.to_json()))
      .collect();

    serde_json::json!({
      "id": self.id,
      "component": self.class_name,
      "kind": self.kind.name(),
      "params": params,
    })
  }
}

/// The component classes available to a Banana program
#[derive(Default)]
pub struct Registry {
  classes: IndexMap<String, Box<dyn ComponentClass>>,
}
impl Registry {
  /// A registry without any classes
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with all the builtin component classes
  #[must_use]
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    for class in catalog::builtin_classes() {
      registry.register(class);
    }
    registry
  }

  /// Add a class, replacing any class with the same name
  pub fn register(&mut self, class: impl ComponentClass + 'static) {
    self.classes.insert(class.name().to_owned(), Box::new(class));
  }

  /// Get a class by name
  #[must_use]
  pub fn get(&self, name: &str) -> Option<&dyn ComponentClass> {
    self.classes.get(name).map(|class| &**class)
  }

  /// The names of all the classes, in registration order
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.classes.keys().map(String::as_str)
  }

  /// All the classes, in registration order
  pub fn classes(&self) -> impl Iterator<Item = &dyn ComponentClass> {
    self.classes.values().map(|class| &**class)
  }
}
impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("classes", &self.classes.keys().collect::<Vec<_>>())
      .finish()
  }
}

/// An error when validating the configuration of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  /// A parameter has no value
  MissingParam {
    /// The class of the component
    class: String,
    /// The missing parameter
    param: String,
  },
  /// A parameter has a value of the wrong type
  WrongType {
    /// The class of the component
    class: String,
    /// The parameter with the wrong type
    param: String,
    /// The type of the parameter
    expected: String,
    /// The type of the value given
    given: String,
  },
  /// The configuration is not valid for the class
  Invalid {
    /// The class of the component
    class: String,
    /// Why the configuration is invalid
    message: String,
  },
}
impl ConfigError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self {
      Self::MissingParam { .. } => "Missing Parameter",
      Self::WrongType { .. } => "Parameter Has Wrong Type",
      Self::Invalid { .. } => "Invalid Configuration",
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::MissingParam { class, param } => {
        format!("`{class}` requires a value for the parameter `{param}`")
      }
      Self::WrongType {
        class,
        param,
        expected,
        given,
      } => format!("`{class}` expected `{param}` to be `{expected}`, but received `{given}`"),
      Self::Invalid { class, message } => format!("`{class}` {message}"),
    }
  }
}
impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for ConfigError {}
