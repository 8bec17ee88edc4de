//! Compiles arithmetic expressions into functions
//!
//! Expression parameters, such as the `lambda` of a combining component, are written
//! in terms of short parameter names. Each parameter is bound to an external name,
//! and the compiled function gets the value of each external name when it is called.

use banana_components::CompiledExpression;
use banana_syntax::{
  ParseError,
  ast::{ExprToken, Node, Operator},
  parse_expression,
};
use indexmap::IndexMap;
use std::{error, fmt};

/// Apply a binary operator
pub(crate) fn apply(operator: Operator, left: f64, right: f64) -> f64 {
  match operator {
    Operator::Add => left + right,
    Operator::Subtract => left - right,
    Operator::Multiply => left * right,
    Operator::Divide => left / right,
  }
}

/// Fold a sequence of operations, with `*` and `/` applied before `+` and `-`
pub(crate) fn fold(first: f64, rest: impl IntoIterator<Item = (Operator, f64)>) -> f64 {
  let mut total = 0.0;
  let mut pending = Operator::Add;
  let mut term = first;

  for (operator, value) in rest {
    if operator.is_multiplicative() {
      term = apply(operator, term, value);
    } else {
      total = apply(pending, total, term);
      pending = operator;
      term = value;
    }
  }

  apply(pending, total, term)
}

#[derive(Clone, Debug, PartialEq)]
enum Term {
  Constant(f64),
  Parameter(usize),
  Expression(Box<Term>, Vec<(Operator, Term)>),
}
impl Term {
  fn evaluate(&self, parameters: &[f64]) -> f64 {
    match self {
      Self::Constant(value) => *value,
      Self::Parameter(index) => parameters.get(*index).copied().unwrap_or(f64::NAN),
      Self::Expression(first, rest) => fold(
        first.evaluate(parameters),
        rest
          .iter()
          .map(|(operator, term)| (*operator, term.evaluate(parameters))),
      ),
    }
  }
}

struct Compiler<'a> {
  environment: &'a IndexMap<String, String>,
  /// The parameters used, and the external names they are bound to
  parameters: Vec<(String, String)>,
}
impl Compiler<'_> {
  fn term(&mut self, node: &Node) -> Result<Term, ExpressionError> {
    match node {
      Node::Number(number) => Ok(Term::Constant(number.value)),
      Node::String(string) => Err(ExpressionError::StringLiteral(string.raw.clone())),
      Node::Ident(ident) => self.parameter(&ident.name),
      Node::DotPath(path) => self.parameter(&path.to_string()),
      Node::Expr(expr) => {
        let mut tokens = expr.tokens.iter();
        let Some(ExprToken::Operand(first)) = tokens.next() else {
          return Err(ExpressionError::NotArithmetic("Expression"));
        };
        let first = self.term(first)?;

        let mut rest = Vec::new();
        while let (Some(ExprToken::Operator(operator, _)), Some(ExprToken::Operand(operand))) =
          (tokens.next(), tokens.next())
        {
          rest.push((*operator, self.term(operand)?));
        }

        Ok(Term::Expression(Box::new(first), rest))
      }
      Node::JsonObj(_) | Node::List(_) | Node::Component(_) => {
        Err(ExpressionError::NotArithmetic(node.kind_name()))
      }
    }
  }

  fn parameter(&mut self, name: &str) -> Result<Term, ExpressionError> {
    if let Some(index) = self.parameters.iter().position(|(p, _)| p == name) {
      return Ok(Term::Parameter(index));
    }

    let Some(external) = self.environment.get(name) else {
      return Err(ExpressionError::UnknownName {
        name: name.to_owned(),
        known: self.environment.keys().cloned().collect(),
      });
    };

    self.parameters.push((name.to_owned(), external.clone()));
    Ok(Term::Parameter(self.parameters.len() - 1))
  }
}

/// Compile an arithmetic expression into a function
///
/// `environment` maps each name which can be used in the expression to the
/// external name it is bound to.
///
/// # Examples
/// ```
/// use banana_interpreter::compile_expression;
/// use indexmap::IndexMap;
///
/// let environment = IndexMap::from([
///   ("a".to_owned(), "cpu.idle_perc".to_owned()),
///   ("b".to_owned(), "cpu.total_logical_cores".to_owned()),
/// ]);
/// let expression = compile_expression(&environment, "a * b").unwrap();
///
/// let lookup = |name: &str| if name == "cpu.idle_perc" { 0.5 } else { 8.0 };
/// assert_eq!(expression.call(&lookup), 4.0);
/// ```
///
/// # Errors
/// If the expression has a syntax error, uses a name which isn't in the
/// environment, or contains a string
pub fn compile_expression(
  environment: &IndexMap<String, String>,
  source: &str,
) -> Result<CompiledExpression, ExpressionError> {
  let node = parse_expression(source).map_err(ExpressionError::Syntax)?;

  let mut compiler = Compiler {
    environment,
    parameters: Vec::new(),
  };
  let term = compiler.term(&node)?;
  let externals: Vec<String> = compiler
    .parameters
    .into_iter()
    .map(|(_, external)| external)
    .collect();

  Ok(CompiledExpression::new(
    source,
    environment.clone(),
    move |lookup| {
      let values: Vec<f64> = externals.iter().map(|external| lookup(external)).collect();
      term.evaluate(&values)
    },
  ))
}

/// Why an expression could not be compiled
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpressionError {
  /// The expression has a syntax error
  Syntax(ParseError),
  /// A name was used which isn't bound
  UnknownName {
    /// The name used
    name: String,
    /// The names which are bound
    known: Vec<String>,
  },
  /// Strings can't be used in expressions
  StringLiteral(String),
  /// A value which isn't a number was used
  NotArithmetic(&'static str),
}
impl fmt::Display for ExpressionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Syntax(error) => write!(f, "{}", error.message()),
      Self::UnknownName { name, known } if known.is_empty() => {
        write!(f, "`{name}` is not bound, and no names are bound")
      }
      Self::UnknownName { name, known } => {
        write!(f, "`{name}` is not bound, expected one of {}", known.join(", "))
      }
      Self::StringLiteral(string) => write!(f, "the string {string} can't be used"),
      Self::NotArithmetic(kind) => write!(f, "a {kind} can't be used"),
    }
  }
}
impl error::Error for ExpressionError {}
