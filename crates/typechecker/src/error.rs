use banana_syntax::Span;
use std::{error, fmt};

/// A error found by the type checker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
  /// A variable which was not defined was used
  UnknownName {
    /// The identifier of the variable
    identifier: String,
    /// The location of the variable
    span: Span,
    /// Suggestion for which variable could be used instead
    did_you_mean: Option<String>,
  },
  /// A component class which is not in the registry was constructed
  UnknownComponent {
    /// The name of the class
    class: String,
    /// The location of the class name
    span: Span,
    /// Suggestion for which class could be meant instead
    did_you_mean: Option<String>,
  },
  /// A property was accessed which the value doesn't have
  PropertyDoesNotExist {
    /// The property accessed
    property: String,
    /// The path of the value the property was accessed on
    parent: String,
    /// The type of the value the property was accessed on
    type_: String,
    /// The location of the property
    span: Span,
  },
  /// Expected a type, but recieved a different one
  TypeMismatch {
    /// The type that was expected
    expected: String,
    /// The type that was recieved
    given: String,
    /// The location of the error
    span: Span,
  },
  /// An operator was used which is not allowed for the type of the expression
  UnknownOperator {
    /// The operator used
    operator: String,
    /// The type of the expression
    type_: String,
    /// The location of the operator
    span: Span,
  },
  /// A string was given for an enum which isn't one of its variants
  UnknownVariant {
    /// The string given
    value: String,
    /// The variants of the enum
    variants: Vec<String>,
    /// The location of the string
    span: Span,
  },
  /// A component was constructed with a named argument it doesn't have
  ComponentWrongParamName {
    /// The class of the component
    class: String,
    /// The name of the argument
    param: String,
    /// The location of the argument name
    span: Span,
    /// Suggestion for which parameter could be meant instead
    did_you_mean: Option<String>,
  },
  /// A component was constructed with the same parameter twice
  ComponentDuplicateParam {
    /// The class of the component
    class: String,
    /// The name of the parameter
    param: String,
    /// The location of the second argument
    span: Span,
  },
  /// A component was constructed with more arguments than it has parameters
  ComponentTooManyParams {
    /// The class of the component
    class: String,
    /// The number of parameters the class has
    expected: usize,
    /// The number of arguments given
    given: usize,
    /// The location of the first extra argument
    span: Span,
  },
  /// A component was constructed with both named and positional arguments
  ComponentMixedArgs {
    /// The class of the component
    class: String,
    /// The location of the constructor
    span: Span,
  },
  /// A name bound to a component was assigned again
  ComponentShadowing {
    /// The name of the component
    identifier: String,
    /// The class of the existing component
    class: String,
    /// The location of the second assignment
    span: Span,
  },
  /// A connection between two kinds of component which can't be connected
  ConnectionIllegal {
    /// The component the connection comes from
    from: String,
    /// The kind of the component the connection comes from
    from_kind: String,
    /// The component the connection goes to
    to: String,
    /// The kind of the component the connection goes to
    to_kind: String,
    /// The location of the connection
    span: Span,
  },
  /// A connection to something which is not a component
  ConnectionNotComponent {
    /// The name used in the connection
    identifier: String,
    /// The type of the name
    type_: String,
    /// The location of the name
    span: Span,
  },
  /// A value was assigned somewhere it can't be
  AssignmentShape {
    /// The type of the value
    type_: String,
    /// The location of the value
    span: Span,
  },
  /// A key of an object descends through a property which isn't an object
  ConflictingProperty {
    /// The key
    key: String,
    /// The location of the key
    span: Span,
  },
}
impl TypeError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self {
      Self::UnknownName { .. } => "Unknown Name",
      Self::UnknownComponent { .. } => "Unknown Component",
      Self::PropertyDoesNotExist { .. } => "Property Does Not Exist",
      Self::TypeMismatch { .. } => "Type Mismatch",
      Self::UnknownOperator { .. } => "Unknown Operator",
      Self::UnknownVariant { .. } => "Unknown Enum Variant",
      Self::ComponentWrongParamName { .. } => "Wrong Parameter Name",
      Self::ComponentDuplicateParam { .. } => "Duplicate Parameter",
      Self::ComponentTooManyParams { .. } => "Too Many Parameters",
      Self::ComponentMixedArgs { .. } => "Mixed Named And Positional Arguments",
      Self::ComponentShadowing { .. } => "Component Shadowed",
      Self::ConnectionIllegal { .. } => "Illegal Connection",
      Self::ConnectionNotComponent { .. } => "Connection To Non-Component",
      Self::AssignmentShape { .. } => "Invalid Assignment",
      Self::ConflictingProperty { .. } => "Conflicting Property",
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::UnknownName { identifier, .. } => {
        format!("no variable defined with the name `{identifier}`")
      }
      Self::UnknownComponent { class, .. } => format!("no component named `{class}` exists"),
      Self::PropertyDoesNotExist {
        property,
        parent,
        type_,
        ..
      } => format!("`{parent}` has type `{type_}`, which has no property `{property}`"),
      Self::TypeMismatch {
        expected, given, ..
      } => format!("expected type `{expected}`, but recieved `{given}`"),
      Self::UnknownOperator {
        operator, type_, ..
      } => format!("operator `{operator}` can't be used in an expression of type `{type_}`"),
      Self::UnknownVariant {
        value, variants, ..
      } => format!(
        "`{value}` is not one of the allowed values ({})",
        variants.join(", ")
      ),
      Self::ComponentWrongParamName { class, param, .. } => {
        format!("`{class}` has no parameter named `{param}`")
      }
      Self::ComponentDuplicateParam { class, param, .. } => {
        format!("the parameter `{param}` of `{class}` is given more than once")
      }
      Self::ComponentTooManyParams {
        class,
        expected,
        given,
        ..
      } => format!("`{class}` takes {expected} parameters, but {given} were given"),
      Self::ComponentMixedArgs { class, .. } => {
        format!("the arguments of `{class}` must be either all named, or all positional")
      }
      Self::ComponentShadowing {
        identifier, class, ..
      } => format!("`{identifier}` is already bound to a `{class}` component"),
      Self::ConnectionIllegal {
        from,
        from_kind,
        to,
        to_kind,
        ..
      } => format!(
        "`{from}` is a {from_kind}, which can't be connected to `{to}`, which is a {to_kind}"
      ),
      Self::ConnectionNotComponent {
        identifier, type_, ..
      } => format!("`{identifier}` has type `{type_}`, only components can be connected"),
      Self::AssignmentShape { type_, .. } => {
        format!("a value of type `{type_}` can't be assigned here")
      }
      Self::ConflictingProperty { key, .. } => {
        format!("the key `{key}` conflicts with an earlier property which is not an object")
      }
    }
  }

  /// A suggestion for how to fix the error
  #[must_use]
  pub fn suggestion(&self) -> Option<String> {
    match self {
      Self::UnknownName {
        did_you_mean: Some(did_you_mean),
        ..
      } => Some(format!(
        "a variable with a similar name exists, did you mean `{did_you_mean}`?",
      )),
      Self::UnknownComponent {
        did_you_mean: Some(did_you_mean),
        ..
      } => Some(format!(
        "a component with a similar name exists, did you mean `{did_you_mean}`?",
      )),
      Self::ComponentWrongParamName {
        did_you_mean: Some(did_you_mean),
        ..
      } => Some(format!(
        "a parameter with a similar name exists, did you mean `{did_you_mean}`?",
      )),
      Self::ComponentShadowing { .. } => {
        Some("components can't be reassigned, try using a different name".to_owned())
      }
      Self::AssignmentShape { .. } => Some(
        "components can only be bound to a variable by calling their constructor".to_owned(),
      ),
      _ => None,
    }
  }

  /// The title and message of the error in a combined string
  #[must_use]
  pub fn full_message(&self) -> String {
    let mut message = self.title().to_owned();
    message.push('\n');
    message.push_str(&self.message());

    if let Some(suggestion) = self.suggestion() {
      message.push('\n');
      message.push_str("hint: ");
      message.push_str(&suggestion);
    }

    message
  }

  /// The location of the error in the source code
  pub fn span(&self) -> Span {
    match self {
      Self::UnknownName { span, .. }
      | Self::UnknownComponent { span, .. }
      | Self::PropertyDoesNotExist { span, .. }
      | Self::TypeMismatch { span, .. }
      | Self::UnknownOperator { span, .. }
      | Self::UnknownVariant { span, .. }
      | Self::ComponentWrongParamName { span, .. }
      | Self::ComponentDuplicateParam { span, .. }
      | Self::ComponentTooManyParams { span, .. }
      | Self::ComponentMixedArgs { span, .. }
      | Self::ComponentShadowing { span, .. }
      | Self::ConnectionIllegal { span, .. }
      | Self::ConnectionNotComponent { span, .. }
      | Self::AssignmentShape { span, .. }
      | Self::ConflictingProperty { span, .. } => *span,
    }
  }
}
impl fmt::Display for TypeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for TypeError {}
