//! # Interpreter
//! Compiles Banana source into a pipeline of configured components
//!
//! The [`PassManager`] parses and type checks the source, removes components which
//! are not on a path from a Source to a Sink, then evaluates the statements to
//! build the configuration of each component. The result is handed to a [`Driver`],
//! which replaces the running pipeline.
//!
//! Errors and warnings are reported to an [`Emitter`] as they are found.
#![deny(unsafe_code)]

mod config;
mod context;
mod dead_paths;
mod emitter;
mod error;
mod evaluator;
mod expression;
mod full_path;
mod pass_manager;

#[cfg(test)]
mod test;

pub use config::Config;
pub use context::Context;
pub use dead_paths::{DeadComponent, Graph, eliminate_dead_paths};
pub use emitter::{Diagnostic, Emitter, Located, MachineEmitter, Severity};
pub use error::Error;
pub use evaluator::Evaluator;
pub use expression::{ExpressionError, compile_expression};
pub use full_path::check_full_path;
pub use pass_manager::{Driver, PassManager, Pipeline, RecordingDriver};

/// Compile source with the builtin components, and run it with a driver
///
/// # Examples
/// ```
/// use banana_interpreter::{MachineEmitter, RecordingDriver, run};
///
/// let mut driver = RecordingDriver::default();
/// let mut emitter = MachineEmitter::new();
/// let source = "a = KafkaSource()\nb = StdoutSink()\na -> b";
///
/// let context = run(source, &mut driver, &mut emitter).unwrap();
/// assert_eq!(context.components.len(), 2);
/// assert_eq!(driver.calls, ["stop", "set_links", "start"]);
/// ```
///
/// # Errors
/// The first fatal error found, which has also been emitted
pub fn run(
  source: &str,
  driver: &mut dyn Driver,
  emitter: &mut dyn Emitter,
) -> Result<Context, Error> {
  let registry = banana_components::Registry::builtin();
  PassManager::new(&registry, Config::default()).execute(source, driver, emitter)
}
