//! Removes components which are not on a path from a Source to a Sink
//!
//! The connections form a graph, stored as an arena of nodes which refer to each
//! other by index. Walking forwards from every Source marks the nodes which can be
//! reached, then walking backwards from every reached Sink marks the nodes which
//! can reach a Sink. Nodes without both marks are dead.

use crate::emitter::Diagnostic;
use banana_components::{ComponentKind, Type};
use banana_syntax::{Span, ast::BananaFile};
use banana_typechecker::Types;
use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Node {
  name: String,
  span: Span,
  kind: ComponentKind,
  parents: Vec<usize>,
  children: Vec<usize>,
  visited: bool,
  seen_sink: bool,
}
impl Node {
  fn is_alive(&self) -> bool {
    self.visited && self.seen_sink
  }
}

/// The graph of connections between components
#[derive(Debug, Default)]
pub struct Graph {
  nodes: Vec<Node>,
}
impl Graph {
  /// Build the graph of a file, with one node per component in declaration order
  #[must_use]
  pub fn new(file: &BananaFile, types: &Types) -> Self {
    let mut graph = Self::default();
    let mut indexes = FxHashMap::default();

    for ident in file.components.keys() {
      let Some(Type::Component { kind, .. }) = types.get(ident.name.as_str()) else {
        continue;
      };

      indexes.insert(ident.name.as_str(), graph.nodes.len());
      graph.nodes.push(Node {
        name: ident.name.clone(),
        span: ident.span,
        kind: *kind,
        parents: Vec::new(),
        children: Vec::new(),
        visited: false,
        seen_sink: false,
      });
    }

    for (from, to) in &file.connections.connections {
      if let (Some(&from), Some(&to)) = (
        indexes.get(from.name.as_str()),
        indexes.get(to.name.as_str()),
      ) {
        graph.nodes[from].children.push(to);
        graph.nodes[to].parents.push(from);
      }
    }

    graph
  }

  fn mark_visited(&mut self) {
    let mut stack: Vec<usize> = (0..self.nodes.len())
      .filter(|index| self.nodes[*index].kind == ComponentKind::Source)
      .collect();

    while let Some(index) = stack.pop() {
      let node = &mut self.nodes[index];
      if node.visited {
        continue;
      }

      node.visited = true;
      stack.extend(node.children.iter().copied());
    }
  }

  fn mark_seen_sink(&mut self) {
    let mut stack: Vec<usize> = (0..self.nodes.len())
      .filter(|index| {
        let node = &self.nodes[*index];
        node.kind == ComponentKind::Sink && node.visited
      })
      .collect();

    while let Some(index) = stack.pop() {
      let node = &mut self.nodes[index];
      if node.seen_sink {
        continue;
      }

      node.seen_sink = true;
      stack.extend(node.parents.iter().copied());
    }
  }

  /// The components which are not on a path from a Source to a Sink, in
  /// declaration order
  #[must_use]
  pub fn dead_components(mut self) -> Vec<DeadComponent> {
    self.mark_visited();
    self.mark_seen_sink();

    self
      .nodes
      .into_iter()
      .filter(|node| !node.is_alive())
      .map(|node| DeadComponent {
        name: node.name,
        span: node.span,
      })
      .collect()
  }
}

/// A component which was removed, as it is not on a path from a Source to a Sink
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeadComponent {
  /// The name of the component
  pub name: String,
  /// The location of the name of the component
  pub span: Span,
}
impl DeadComponent {
  /// The warning for the removed component
  #[must_use]
  pub fn diagnostic(&self) -> Diagnostic {
    Diagnostic::warning(
      "Dead Component",
      format!("`{}` is not on a path from Source to Sink", self.name),
      self.span,
    )
    .with_hint(Some(
      "the component is removed, connect it between a Source and a Sink to use it".to_owned(),
    ))
  }
}

/// Remove every component which is not on a path from a Source to a Sink, and
/// their connections
pub fn eliminate_dead_paths(file: &mut BananaFile, types: &Types) -> Vec<DeadComponent> {
  let dead = Graph::new(file, types).dead_components();

  for component in &dead {
    file.remove_component(&component.name);
  }

  dead
}
