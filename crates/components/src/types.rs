use crate::{
  kind::ComponentKind,
  path::{Container, PathErrorKind, PathTarget},
  value::Value,
};
use indexmap::IndexMap;
use serde_json::json;
use std::fmt;

static ANY: Type = Type::Any;

/// The type of a value in a Banana program
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
  /// A floating point number
  Number,
  /// A string
  String,
  /// One of a fixed set of strings
  Enum {
    /// The allowed strings
    variants: Vec<String>,
  },
  /// An object of named properties
  Object {
    /// The types of the properties, in order
    props: IndexMap<String, Type>,
    /// Strict objects only allow the properties they declare
    strict: bool,
  },
  /// An instance of a component class
  Component {
    /// The kind of the component
    kind: ComponentKind,
    /// The name of the component class
    class_name: String,
    /// The parameters of the class, in order
    params: IndexMap<String, Type>,
  },
  /// Any value, not checked
  Any,
}
impl Type {
  /// An open object with no properties
  #[must_use]
  pub fn open_object() -> Self {
    Self::Object {
      props: IndexMap::new(),
      strict: false,
    }
  }

  /// A strict object with the given properties
  pub fn strict_object<'a>(props: impl IntoIterator<Item = (&'a str, Self)>) -> Self {
    Self::Object {
      props: props
        .into_iter()
        .map(|(name, type_)| (name.to_owned(), type_))
        .collect(),
      strict: true,
    }
  }

  /// An enum of the given strings
  pub fn enumeration<'a>(variants: impl IntoIterator<Item = &'a str>) -> Self {
    Self::Enum {
      variants: variants.into_iter().map(str::to_owned).collect(),
    }
  }

  /// Is the type a component?
  #[must_use]
  pub fn is_component(&self) -> bool {
    matches!(self, Self::Component { .. })
  }

  /// Is the type a string or enum?
  #[must_use]
  pub fn is_string_like(&self) -> bool {
    matches!(self, Self::String | Self::Enum { .. })
  }

  /// Can a value of this type be used where the `target` type is expected?
  #[must_use]
  pub fn can_be_cast_to(&self, target: &Self) -> bool {
    match (self, target) {
      (_, Self::Any) => true,
      (a, b) if a == b => true,
      (Self::Number | Self::String | Self::Enum { .. }, Self::String) => true,
      (Self::Number | Self::String | Self::Enum { .. }, Self::Enum { .. }) => true,
      (Self::Object { props: given, .. }, Self::Object { props, strict }) => {
        !strict
          || props.iter().all(|(name, expected)| {
            given
              .get(name)
              .is_some_and(|type_| type_.can_be_cast_to(expected))
          })
      }
      _ => false,
    }
  }

  /// The type of a property, if it exists
  ///
  /// Any property of [`Type::Any`] is [`Type::Any`].
  #[must_use]
  pub fn property(&self, name: &str) -> Option<&Self> {
    match self {
      Self::Object { props, .. } => props.get(name),
      Self::Component { params, .. } => params.get(name),
      Self::Any => Some(&ANY),
      _ => None,
    }
  }

  /// Can properties of the type be accessed, even if they don't exist?
  #[must_use]
  pub fn has_properties(&self) -> bool {
    matches!(
      self,
      Self::Object { .. } | Self::Component { .. } | Self::Any
    )
  }

  /// Is the type an object which accepts any property?
  #[must_use]
  pub fn is_open_object(&self) -> bool {
    matches!(self, Self::Object { strict: false, .. })
  }

  /// The default value of the type
  #[must_use]
  pub fn default_value(&self) -> Value {
    match self {
      Self::Number => Value::Number(0.0),
      Self::String => Value::String("".into()),
      Self::Enum { variants } => Value::String(variants.first().map_or("", String::as_str).into()),
      Self::Object { props, .. } | Self::Component { params: props, .. } => Value::Object(
        props
          .iter()
          .map(|(name, type_)| (name.clone(), type_.default_value()))
          .collect(),
      ),
      Self::Any => Value::Object(IndexMap::new()),
    }
  }

  /// A JSON description of the type
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    match self {
      Self::Number => json!({ "id": "number" }),
      Self::String => json!({ "id": "string" }),
      Self::Enum { variants } => json!({ "id": "enum", "variants": variants }),
      Self::Object { props, strict } => {
        let props: serde_json::Map<_, _> = props
          .iter()
          .map(|(name, type_)| (name.clone(), type_.to_json()))
          .collect();
        json!({ "id": "object", "props": props, "strict": strict })
      }
      Self::Component {
        kind,
        class_name,
        params,
      } => {
        let args: serde_json::Map<_, _> = params
          .iter()
          .map(|(name, type_)| (name.clone(), type_.to_json()))
          .collect();
        json!({ "id": "component", "name": class_name, "kind": kind.name(), "args": args })
      }
      Self::Any => json!({ "id": "any" }),
    }
  }
}
impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number => write!(f, "number"),
      Self::String => write!(f, "string"),
      Self::Enum { variants } => write!(f, "enum ({})", variants.join(" | ")),
      Self::Object { strict: true, .. } => write!(f, "strict object"),
      Self::Object { strict: false, .. } => write!(f, "object"),
      Self::Component { class_name, .. } => write!(f, "component {class_name}"),
      Self::Any => write!(f, "any"),
    }
  }
}

impl PathTarget for Type {
  fn open_object() -> Self {
    Self::open_object()
  }

  fn container(&self) -> Container {
    match self {
      Self::Object { strict: false, .. } => Container::Open,
      Self::Object { strict: true, .. } | Self::Component { .. } => Container::Strict,
      Self::Any => Container::Opaque,
      Self::Number | Self::String | Self::Enum { .. } => Container::NotAnObject,
    }
  }

  fn has_property(&self, name: &str) -> bool {
    match self {
      Self::Object { props, .. } | Self::Component { params: props, .. } => {
        props.contains_key(name)
      }
      _ => false,
    }
  }

  fn property_mut(&mut self, name: &str) -> Option<&mut Self> {
    match self {
      Self::Object { props, .. } | Self::Component { params: props, .. } => props.get_mut(name),
      _ => None,
    }
  }

  fn create_property(&mut self, name: &str, value: Self) {
    if let Self::Object { props, .. } = self {
      props.insert(name.to_owned(), value);
    }
  }

  /// Strict properties keep their declared type
  fn overwrite_property(&mut self, value: Self, strict: bool) -> Result<(), PathErrorKind> {
    if !strict {
      *self = value;
      Ok(())
    } else if value.can_be_cast_to(self) {
      Ok(())
    } else {
      Err(PathErrorKind::Mismatch)
    }
  }
}
