//! # Components
//!
//! The types, values and component classes shared by the Banana type checker and
//! interpreter.
//!
//! A [`Registry`] holds every [`ComponentClass`] which can be constructed in a Banana
//! file. Classes describe their parameters with ordered [`ParamDescriptor`]s, which
//! the type checker turns into a [`Type::Component`] and the evaluator uses to build
//! the default configuration.

mod catalog;
mod kind;
pub mod path;
mod registry;
mod types;
mod value;

#[cfg(test)]
mod test;

pub use catalog::ClassDescriptor;
pub use kind::{ComponentKind, ConnectionRules};
pub use registry::{
  ComponentClass, ComponentInstance, Config, ConfigError, ExpressionParam, ParamDescriptor,
  Registry,
};
pub use types::Type;
pub use value::{CompiledExpression, Str, Value};
