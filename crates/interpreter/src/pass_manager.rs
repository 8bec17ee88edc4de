//! Runs the passes which turn Banana source into a running pipeline
//!
//! 1. Parse, reporting warnings and stopping on syntax errors
//! 2. Type check
//! 3. Remove components not on a path from a Source to a Sink
//! 4. Check a Source and a Sink remain
//! 5. Evaluate the statements and instantiate the components
//! 6. Replace the pipeline run by the driver

use crate::{
  config::Config,
  context::Context,
  dead_paths::eliminate_dead_paths,
  emitter::{Diagnostic, Emitter},
  error::Error,
  evaluator::Evaluator,
  full_path::check_full_path,
};
use banana_components::{ComponentInstance, Registry};
use banana_syntax::{AST, parse};
use banana_typechecker::{TypeTable, typecheck};
use indexmap::IndexMap;
use serde_json::json;
use tracing::{debug, info};

/// The components to run, and the connections between them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
  /// The instantiated components, in declaration order
  pub components: IndexMap<String, ComponentInstance>,
  /// The components each component sends data to
  pub links: IndexMap<String, Vec<String>>,
}
impl Pipeline {
  /// A JSON representation of the pipeline
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    let components: Vec<_> = self
      .components
      .values()
      .map(ComponentInstance::to_json)
      .collect();
    let links: serde_json::Map<String, serde_json::Value> = self
      .links
      .iter()
      .map(|(from, to)| (from.clone(), json!(to)))
      .collect();

    json!({
      "components": components,
      "links": links,
    })
  }
}

/// Controls the running pipeline
///
/// A new pipeline replaces the old one: the old pipeline is stopped, the new
/// one is set, and then it is started.
pub trait Driver {
  /// Stop the running pipeline, if there is one
  fn stop_pipeline(&mut self);

  /// Set the pipeline which will be run
  fn set_links(&mut self, pipeline: Pipeline);

  /// Start running the pipeline
  fn start_pipeline(&mut self);
}

/// A driver which keeps the last pipeline it was given, and records its calls
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingDriver {
  /// The pipeline which was last set
  pub pipeline: Option<Pipeline>,
  /// The calls made, in order
  pub calls: Vec<&'static str>,
}
impl Driver for RecordingDriver {
  fn stop_pipeline(&mut self) {
    self.calls.push("stop");
  }

  fn set_links(&mut self, pipeline: Pipeline) {
    self.calls.push("set_links");
    self.pipeline = Some(pipeline);
  }

  fn start_pipeline(&mut self) {
    self.calls.push("start");
  }
}

/// Runs Banana source through every pass
pub struct PassManager<'a> {
  registry: &'a Registry,
  config: Config,
}
impl<'a> PassManager<'a> {
  /// Create a pass manager using the component classes of a registry
  #[must_use]
  pub fn new(registry: &'a Registry, config: Config) -> Self {
    Self { registry, config }
  }

  /// The options used
  #[must_use]
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Parse and type check source, without running it
  ///
  /// # Errors
  /// If the source has syntax errors, or a type error
  pub fn typecheck_only(
    &self,
    source: &str,
    emitter: &mut dyn Emitter,
  ) -> Result<TypeTable, Error> {
    let result = self.check(source, emitter).map(|(_, table)| table);
    report(source, result, emitter)
  }

  /// Compile source and replace the pipeline run by the driver
  ///
  /// If an error is found, every diagnostic is emitted and the driver is untouched.
  ///
  /// # Errors
  /// The first fatal error found
  pub fn execute(
    &self,
    source: &str,
    driver: &mut dyn Driver,
    emitter: &mut dyn Emitter,
  ) -> Result<Context, Error> {
    let result = self.compile(source, emitter);
    let (context, pipeline) = report(source, result, emitter)?;

    driver.stop_pipeline();
    driver.set_links(pipeline);
    driver.start_pipeline();
    info!(components = context.components.len(), "pipeline started");

    Ok(context)
  }

  fn check(&self, source: &str, emitter: &mut dyn Emitter) -> Result<(AST, TypeTable), Error> {
    let ast = parse(source);

    for warning in &ast.warnings {
      emitter.emit(source, Diagnostic::from(warning));
    }
    if !ast.is_valid() {
      return Err(Error::Parse(ast.errors));
    }
    debug!(statements = ast.file.statements.len(), "parsed");

    let table = typecheck(&ast, self.registry, &self.config.connection_rules)?;
    debug!(snapshots = table.snapshots().len(), "type checked");

    Ok((ast, table))
  }

  fn compile(
    &self,
    source: &str,
    emitter: &mut dyn Emitter,
  ) -> Result<(Context, Pipeline), Error> {
    let (mut ast, table) = self.check(source, emitter)?;
    let mut warnings = ast.warnings.len();

    for dead in eliminate_dead_paths(&mut ast.file, table.final_types()) {
      debug!(component = %dead.name, "removed dead component");
      emitter.emit(source, dead.diagnostic());
      warnings += 1;
    }

    let span = ast.line_index().file_span();
    check_full_path(&ast.file, table.final_types(), span)?;

    if self.config.deny_warnings && warnings > 0 {
      return Err(Error::DeniedWarnings {
        count: warnings,
        span,
      });
    }

    let context = Evaluator::new(&ast.file, &table, self.registry).evaluate()?;
    let links: IndexMap<String, Vec<String>> = context
      .components
      .keys()
      .map(|name| {
        let destinations: Vec<String> = ast
          .file
          .connections
          .destinations(name)
          .map(|to| to.name.clone())
          .collect();

        (name.clone(), destinations)
      })
      .collect();
    let pipeline = Pipeline {
      components: context.components.clone(),
      links,
    };

    Ok((context, pipeline))
  }
}

fn report<T>(source: &str, result: Result<T, Error>, emitter: &mut dyn Emitter) -> Result<T, Error> {
  if let Err(error) = &result {
    debug!(error = %error.title(), "compilation failed");
    for diagnostic in error.diagnostics() {
      emitter.emit(source, diagnostic);
    }
  }

  result
}
