use crate::path::{Container, PathErrorKind, PathTarget};
use indexmap::IndexMap;
use smartstring::alias::String as SmartString;
use std::{fmt, sync::Arc};

/// The string type used for runtime values
pub type Str = SmartString;

/// A concrete value produced by evaluating a Banana program
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// A floating point number
  Number(f64),
  /// A string
  String(Str),
  /// An object of named values, in insertion order
  Object(IndexMap<String, Value>),
  /// A list of values
  List(Vec<Value>),
  /// An arithmetic expression compiled into a function
  Expression(CompiledExpression),
}
impl Value {
  /// Create an object from pairs of names and values
  pub fn object<'a>(properties: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
    Self::Object(
      properties
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect(),
    )
  }

  /// The name of the type of the value
  #[must_use]
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Number(_) => "number",
      Self::String(_) => "string",
      Self::Object(_) => "object",
      Self::List(_) => "list",
      Self::Expression(_) => "expression",
    }
  }

  /// Get the value as a number, if it is one
  #[must_use]
  pub fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(number) => Some(*number),
      Self::String(string) => string.trim().parse().ok(),
      _ => None,
    }
  }

  /// Get the value as a string, if it is one
  #[must_use]
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(string) => Some(string.as_str()),
      _ => None,
    }
  }

  /// Convert the value into a string, numbers are written without a trailing `.0`
  #[must_use]
  pub fn cast_to_string(&self) -> Str {
    match self {
      Self::String(string) => string.clone(),
      Self::Expression(expression) => expression.source().into(),
      other => other.to_string().into(),
    }
  }

  /// Get a property of an object
  #[must_use]
  pub fn property(&self, name: &str) -> Option<&Self> {
    match self {
      Self::Object(properties) => properties.get(name),
      _ => None,
    }
  }

  /// A JSON representation of the value
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    match self {
      Self::Number(number) => number_to_json(*number),
      Self::String(string) => serde_json::Value::String(string.to_string()),
      Self::Object(properties) => serde_json::Value::Object(
        properties
          .iter()
          .map(|(name, value)| (name.clone(), value.to_json()))
          .collect(),
      ),
      Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
      Self::Expression(expression) => expression.to_json(),
    }
  }
}
impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Self::Number(value)
  }
}
impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Self::String(value.into())
  }
}
impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(number) => write!(f, "{number}"),
      Self::String(string) => write!(f, "{string}"),
      Self::Expression(expression) => write!(f, "{}", expression.source()),
      Self::Object(_) | Self::List(_) => write!(f, "{}", self.to_json()),
    }
  }
}

#[allow(clippy::cast_possible_truncation, reason = "checked the number is integral")]
fn number_to_json(number: f64) -> serde_json::Value {
  const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

  if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
    serde_json::Value::from(number as i64)
  } else {
    serde_json::Number::from_f64(number).map_or(serde_json::Value::Null, serde_json::Value::Number)
  }
}

impl PathTarget for Value {
  fn open_object() -> Self {
    Self::Object(IndexMap::new())
  }

  fn container(&self) -> Container {
    match self {
      Self::Object(_) => Container::Open,
      _ => Container::NotAnObject,
    }
  }

  fn has_property(&self, name: &str) -> bool {
    matches!(self, Self::Object(properties) if properties.contains_key(name))
  }

  fn property_mut(&mut self, name: &str) -> Option<&mut Self> {
    match self {
      Self::Object(properties) => properties.get_mut(name),
      _ => None,
    }
  }

  fn create_property(&mut self, name: &str, value: Self) {
    if let Self::Object(properties) = self {
      properties.insert(name.to_owned(), value);
    }
  }

  fn overwrite_property(&mut self, value: Self, _strict: bool) -> Result<(), PathErrorKind> {
    *self = value;
    Ok(())
  }
}

type ExpressionFn = dyn Fn(&dyn Fn(&str) -> f64) -> f64 + Send + Sync;

/// An arithmetic expression compiled into a function
///
/// The function is called with a lookup, which gets the current value of an external
/// name. Each parameter of the expression is bound to the external name it maps to.
#[derive(Clone)]
pub struct CompiledExpression {
  source: String,
  bindings: IndexMap<String, String>,
  function: Arc<ExpressionFn>,
}
impl CompiledExpression {
  /// Create a compiled expression from its source, bindings, and function
  pub fn new(
    source: impl Into<String>,
    bindings: IndexMap<String, String>,
    function: impl Fn(&dyn Fn(&str) -> f64) -> f64 + Send + Sync + 'static,
  ) -> Self {
    Self {
      source: source.into(),
      bindings,
      function: Arc::new(function),
    }
  }

  /// Evaluate the expression, getting the value of external names from `lookup`
  pub fn call(&self, lookup: &dyn Fn(&str) -> f64) -> f64 {
    (self.function)(lookup)
  }

  /// The source of the expression
  #[must_use]
  pub fn source(&self) -> &str {
    &self.source
  }

  /// The parameters of the expression, and the external names they are bound to
  #[must_use]
  pub fn bindings(&self) -> &IndexMap<String, String> {
    &self.bindings
  }

  /// A JSON representation of the expression
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    let bindings: serde_json::Map<String, serde_json::Value> = self
      .bindings
      .iter()
      .map(|(parameter, external)| (parameter.clone(), external.clone().into()))
      .collect();

    serde_json::json!({ "expression": self.source, "bindings": bindings })
  }
}
impl fmt::Debug for CompiledExpression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CompiledExpression")
      .field("source", &self.source)
      .field("bindings", &self.bindings)
      .finish_non_exhaustive()
  }
}
impl PartialEq for CompiledExpression {
  fn eq(&self, other: &Self) -> bool {
    self.source == other.source && self.bindings == other.bindings
  }
}
