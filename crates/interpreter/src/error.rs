use crate::emitter::Diagnostic;
use banana_components::{ComponentKind, ConfigError};
use banana_syntax::{ParseError, Span};
use banana_typechecker::TypeError;
use std::{error, fmt};

/// An error which stops a Banana file from being run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
  /// The file has syntax errors
  Parse(Vec<ParseError>),
  /// The file has a type error
  Type(TypeError),
  /// After removing dead components, there is no component of a kind
  NoFullPath {
    /// The kind of component which is missing
    missing: ComponentKind,
    /// The location of the whole file
    span: Span,
  },
  /// An expression parameter could not be compiled
  InvalidExpression {
    /// The component with the expression
    component: String,
    /// The parameter holding the expression
    param: String,
    /// Why the expression is invalid
    reason: String,
    /// The location of the component
    span: Span,
  },
  /// The configuration of a component was rejected by its class
  InvalidConfiguration {
    /// The component being created
    component: String,
    /// Why the configuration is invalid
    error: ConfigError,
    /// The location of the component
    span: Span,
  },
  /// Warnings were found, and warnings are denied
  DeniedWarnings {
    /// How many warnings were found
    count: usize,
    /// The location of the whole file
    span: Span,
  },
  /// Something which the type checker should have prevented happened
  InternalBug {
    /// What happened
    message: String,
    /// The location of the value being evaluated
    span: Span,
  },
}
impl Error {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> String {
    match self {
      Self::Parse(errors) => errors
        .first()
        .map_or_else(|| "Syntax Error".to_owned(), ParseError::title),
      Self::Type(error) => error.title().to_owned(),
      Self::NoFullPath { .. } => "No Full Path".to_owned(),
      Self::InvalidExpression { .. } => "Invalid Expression".to_owned(),
      Self::InvalidConfiguration { error, .. } => error.title().to_owned(),
      Self::DeniedWarnings { .. } => "Warnings Denied".to_owned(),
      Self::InternalBug { .. } => "Internal Bug".to_owned(),
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::Parse(errors) => errors.first().map(ParseError::message).unwrap_or_default(),
      Self::Type(error) => error.message(),
      Self::NoFullPath { missing, .. } => {
        format!("there is no path from a Source to a Sink, as there is no {missing}")
      }
      Self::InvalidExpression {
        component,
        param,
        reason,
        ..
      } => format!("the expression `{param}` of `{component}` is invalid, {reason}"),
      Self::InvalidConfiguration {
        component, error, ..
      } => format!("`{component}` can't be created: {error}"),
      Self::DeniedWarnings { count, .. } => {
        format!("{count} warning(s) were found, and warnings are denied")
      }
      Self::InternalBug { message, .. } => format!("{message}, this is a bug"),
    }
  }

  /// A suggestion for how to fix the error
  #[must_use]
  pub fn suggestion(&self) -> Option<String> {
    match self {
      Self::Parse(errors) => errors.first().and_then(ParseError::suggestion),
      Self::Type(error) => error.suggestion(),
      Self::NoFullPath { missing, .. } => Some(format!(
        "connect a {missing} so data can flow from a Source to a Sink"
      )),
      _ => None,
    }
  }

  /// The title and message of the error in a combined string
  #[must_use]
  pub fn full_message(&self) -> String {
    let mut message = self.title();
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
      Self::Parse(errors) => errors.first().map(ParseError::span).unwrap_or_default(),
      Self::Type(error) => error.span(),
      Self::NoFullPath { span, .. }
      | Self::InvalidExpression { span, .. }
      | Self::InvalidConfiguration { span, .. }
      | Self::DeniedWarnings { span, .. }
      | Self::InternalBug { span, .. } => *span,
    }
  }

  /// The diagnostics to report for the error
  ///
  /// Every syntax error is reported, other errors report once.
  #[must_use]
  pub fn diagnostics(&self) -> Vec<Diagnostic> {
    match self {
      Self::Parse(errors) => errors.iter().map(Diagnostic::from).collect(),
      Self::Type(error) => vec![Diagnostic::from(error)],
      _ => vec![
        Diagnostic::error(self.title(), self.message(), self.span())
          .with_hint(self.suggestion()),
      ],
    }
  }
}
impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for Error {}
impl From<TypeError> for Error {
  fn from(error: TypeError) -> Self {
    Self::Type(error)
  }
}
