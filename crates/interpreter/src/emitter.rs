//! Reporting errors and warnings found while compiling a Banana file

use banana_syntax::{LineIndex, ParseError, ParseWarning, Span};
use banana_typechecker::TypeError;
use serde_json::json;

/// How serious a diagnostic is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
  /// Compilation stopped
  Error,
  /// Compilation continued
  Warning,
}

/// An error or warning, with its location in the source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  /// Is it an error or a warning?
  pub severity: Severity,
  /// The location in the source
  pub span: Span,
  /// A short summary
  pub title: String,
  /// A description of what went wrong
  pub message: String,
  /// How it could be fixed
  pub hint: Option<String>,
}
impl Diagnostic {
  /// An error diagnostic
  #[must_use]
  pub fn error(title: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
    Self {
      severity: Severity::Error,
      span,
      title: title.into(),
      message: message.into(),
      hint: None,
    }
  }

  /// A warning diagnostic
  #[must_use]
  pub fn warning(title: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
    Self {
      severity: Severity::Warning,
      ..Self::error(title, message, span)
    }
  }

  /// Add a hint to the diagnostic
  #[must_use]
  pub fn with_hint(mut self, hint: Option<String>) -> Self {
    self.hint = hint;
    self
  }

  /// Is the diagnostic a warning?
  #[must_use]
  pub fn is_warning(&self) -> bool {
    self.severity == Severity::Warning
  }
}
impl From<&ParseError> for Diagnostic {
  fn from(error: &ParseError) -> Self {
    Self::error(error.title(), error.message(), error.span()).with_hint(error.suggestion())
  }
}
impl From<&ParseWarning> for Diagnostic {
  fn from(warning: &ParseWarning) -> Self {
    Self::warning(warning.title(), warning.message(), warning.span())
      .with_hint(warning.suggestion())
  }
}
impl From<&TypeError> for Diagnostic {
  fn from(error: &TypeError) -> Self {
    Self::error(error.title(), error.message(), error.span()).with_hint(error.suggestion())
  }
}

/// Receives the diagnostics found while compiling a Banana file
pub trait Emitter {
  /// Report a diagnostic in the given source
  fn emit(&mut self, source: &str, diagnostic: Diagnostic);
}

/// A diagnostic with its location as lines and columns, starting at 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Located {
  /// The line the diagnostic starts on
  pub start_line_number: usize,
  /// The column the diagnostic starts at
  pub start_column: usize,
  /// The line the diagnostic ends on
  pub end_line_number: usize,
  /// The column the diagnostic ends at
  pub end_column: usize,
  /// The bytes of the source the diagnostic covers
  pub byte_range: (u32, u32),
  /// The title and description of the diagnostic
  pub message: String,
}
impl Located {
  fn new(source: &str, lines: &LineIndex, diagnostic: &Diagnostic) -> Self {
    let start = lines.start_position(source, diagnostic.span);
    let end = lines.end_position(source, diagnostic.span);

    Self {
      start_line_number: start.line,
      start_column: start.column,
      end_line_number: end.line,
      end_column: end.column,
      byte_range: (diagnostic.span.start, diagnostic.span.end),
      message: format!("{}: {}", diagnostic.title, diagnostic.message),
    }
  }

  /// A JSON representation, for editors and other tools
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    json!({
      "startLineNumber": self.start_line_number,
      "startColumn": self.start_column,
      "endLineNumber": self.end_line_number,
      "endColumn": self.end_column,
      "byteRange": [self.byte_range.0, self.byte_range.1],
      "message": self.message,
    })
  }
}

/// Collects diagnostics into a structured result
#[derive(Clone, Debug, Default)]
pub struct MachineEmitter {
  /// The errors reported, in order
  pub errors: Vec<Located>,
  /// The warnings reported, in order
  pub warnings: Vec<Located>,
}
impl MachineEmitter {
  /// An emitter with no diagnostics
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Have any diagnostics been reported?
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.errors.is_empty() && self.warnings.is_empty()
  }

  /// The diagnostics as `{ errors: [...], warnings: [...] }`
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    json!({
      "errors": self.errors.iter().map(Located::to_json).collect::<Vec<_>>(),
      "warnings": self.warnings.iter().map(Located::to_json).collect::<Vec<_>>(),
    })
  }
}
impl Emitter for MachineEmitter {
  fn emit(&mut self, source: &str, diagnostic: Diagnostic) {
    let lines = LineIndex::from_source(source);
    let located = Located::new(source, &lines, &diagnostic);

    match diagnostic.severity {
      Severity::Error => self.errors.push(located),
      Severity::Warning => self.warnings.push(located),
    }
  }
}
