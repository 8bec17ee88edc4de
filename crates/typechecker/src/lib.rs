//! # Typechecker
//! Typechecks Banana source code
//!
//! Walks the assignments of a file in order, inferring the type of each value from
//! the variables before it and the parameters of component classes. Every change to
//! the types is recorded in a [`TypeTable`], which the evaluator uses to decide how
//! values are built. Connections are checked last, against the [`ConnectionRules`].
//!
//! [`ConnectionRules`]: banana_components::ConnectionRules
#![deny(unsafe_code)]

mod check;
mod connections;
mod error;
mod infer;
mod similarity;
mod table;

#[cfg(test)]
mod test;

use banana_components::{ConnectionRules, Registry, Type};
use banana_syntax::{AST, ast::Node};

pub use check::TypeChecker;
pub use error::TypeError;
pub use infer::Infer;
pub use table::{Snapshot, TypeTable, Types};

/// Checks the given AST for type errors
///
/// # Examples
/// ```
/// use banana_components::{ConnectionRules, Registry};
/// use banana_syntax::parse;
///
/// let ast = parse("a = KafkaSource()\nb = CloudIngestor()\na -> b");
/// let registry = Registry::builtin();
///
/// let table = banana_typechecker::typecheck(&ast, &registry, &ConnectionRules::legacy());
/// assert!(table.is_ok());
/// ```
///
/// # Errors
/// The first type error found
pub fn typecheck(
  ast: &AST,
  registry: &Registry,
  rules: &ConnectionRules,
) -> Result<TypeTable, TypeError> {
  TypeChecker::new(registry, rules).check(&ast.file)
}

/// Infers the type of a value, given the types of the variables in scope
///
/// # Errors
/// If the value isn't correctly typed
pub fn infer_type(node: &Node, types: &Types, registry: &Registry) -> Result<Type, TypeError> {
  Infer { types, registry }.node(node)
}
