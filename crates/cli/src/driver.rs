use banana_interpreter::{Driver, Pipeline};

use anstream::println;
use owo_colors::OwoColorize;
use tracing::debug;

/// Prints the pipeline when it starts, in place of running the components
pub struct StdoutDriver {
  pipeline: Option<Pipeline>,
  json: bool,
}
impl StdoutDriver {
  pub fn new(json: bool) -> Self {
    Self {
      pipeline: None,
      json,
    }
  }

  pub fn pipeline(&self) -> Option<&Pipeline> {
    self.pipeline.as_ref()
  }
}
impl Driver for StdoutDriver {
  fn stop_pipeline(&mut self) {
    if let Some(pipeline) = self.pipeline.take() {
      debug!(components = pipeline.components.len(), "stopped pipeline");
    }
  }

  fn set_links(&mut self, pipeline: Pipeline) {
    self.pipeline = Some(pipeline);
  }

  fn start_pipeline(&mut self) {
    let Some(pipeline) = &self.pipeline else {
      return;
    };

    // the json report is printed by the command, with the diagnostics
    if self.json {
      return;
    }

    println!("{}", "Pipeline started".bold());
    for component in pipeline.components.values() {
      println!(
        "  {}: {} {}",
        component.id,
        component.class_name,
        format!("({})", component.kind).dimmed()
      );
    }
    for (from, destinations) in &pipeline.links {
      for to in destinations {
        println!("  {from} {} {to}", "->".cyan());
      }
    }
  }
}
