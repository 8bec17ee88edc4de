//! # AST
//!
//! The definition of the Abstract Syntax Tree (AST)

use crate::{
  parser::{ParseError, ParseWarning},
  span::{LineIndex, Span},
};
use std::cell::OnceCell;

pub mod node;
mod prettyprint;
pub mod statement;

pub use node::*;
pub use statement::*;

/// Abstract Syntax Tree representing a Banana file
#[must_use]
#[derive(Debug)]
pub struct AST {
  /// The source code which the AST is for
  pub source: String,
  /// Index of line locations, lazily constructed when required
  line_index: OnceCell<LineIndex>,

  /// The parsed statements, components and connections
  pub file: BananaFile,

  /// Errors found during parsing
  pub errors: Vec<ParseError>,
  /// Recoverable problems found during parsing
  pub warnings: Vec<ParseWarning>,
}
impl AST {
  pub(crate) fn new(source: String) -> Self {
    Self {
      source,
      line_index: OnceCell::new(),
      file: BananaFile::default(),
      errors: Vec::new(),
      warnings: Vec::new(),
    }
  }

  /// Is the parsed AST valid, with no errors found during parsing?
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }

  /// The line index for the AST, the locations of the new lines in the source code
  ///
  /// It is lazily initialised, and will be initialised on the first call
  pub fn line_index(&self) -> &LineIndex {
    self
      .line_index
      .get_or_init(|| LineIndex::from_source(&self.source))
  }

  /// The source text covered by a span
  #[must_use]
  pub fn text(&self, span: Span) -> &str {
    span.source_text(&self.source)
  }
}
