//! # Syntax
//! Parse Banana source code into an Abstract Syntax Tree
//!
//! A recursive descent parser, where every node of the tree owns its children and
//! carries the span of source it covers.
//!
//! Tries to be error tolerant, and recover from errors to continue parsing. If an
//! error is found it will skip to the start of a new line and try parsing again,
//! so every error in the file is reported.

pub mod ast;
mod parser;
mod span;
mod tokeniser;


/// Parses a source code string into an AST.
///
/// # Examples
/// ```
/// use banana_syntax::parse;
/// let ast = parse("a = 5 + 3");
///
/// assert!(ast.is_valid());
/// ```
pub fn parse(source: impl Into<String>) -> AST {
  let mut ast = AST::new(source.into());

  let (file, errors, warnings) = parser::Parser::new(&ast.source).parse();
  ast.file = file;
  ast.errors = errors;
  ast.warnings = warnings;

  ast
}

/// Parses a single expression, which must be followed by the end of the input.
///
/// # Examples
/// ```
/// use banana_syntax::{parse_expression, ast::Node};
/// let expression = parse_expression("a * (b + 2)").unwrap();
///
/// assert!(matches!(expression, Node::Expr(_)));
/// ```
///
/// # Errors
/// Returns the first syntax error found in the expression
pub fn parse_expression(source: &str) -> Result<ast::Node, ParseError> {
  parser::Parser::new(source).parse_standalone_expression()
}

/// Get the tokens from a source code string
pub fn tokenise(source: &str) -> impl Iterator<Item = tokeniser::Token> + '_ {
  tokeniser::Tokeniser::from(source)
}

pub use ast::AST;
pub use parser::{ParseError, ParseWarning};
pub use span::{LineIndex, Position, Span};
pub use tokeniser::{Token, TokenKind};
