//! Statements of a Banana file, and the file itself

use super::node::{Component, DotPath, Ident, Node, PathSegment};
use crate::{parser::ParseWarning, span::Span};
use indexmap::IndexMap;
use thin_vec::{ThinVec, thin_vec};

/// An assignment, `lhs = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
  /// The path being assigned to
  pub lhs: DotPath,
  /// The value being assigned
  pub rhs: Node,
  /// The location of the whole statement
  pub span: Span,
}

/// A set of directed edges between components
///
/// `inputs` and `outputs` are the open ends of the chain, used while a chain is
/// being built up from atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connection {
  /// Components which edges into this connection go to
  pub inputs: ThinVec<Ident>,
  /// Components which edges out of this connection come from
  pub outputs: ThinVec<Ident>,
  /// Edges `(from, to)` in insertion order, each stored once
  pub connections: Vec<(Ident, Ident)>,
  /// The location of the connection in the source
  pub span: Span,
}
impl Connection {
  /// A connection of a single component, with no edges
  pub fn atom(ident: Ident) -> Self {
    Self {
      span: ident.span,
      inputs: thin_vec![ident.clone()],
      outputs: thin_vec![ident],
      connections: Vec::new(),
    }
  }

  /// Add an edge if it is not already present
  ///
  /// Returns a warning for a repeated edge
  pub fn add_edge(&mut self, from: Ident, to: Ident) -> Result<(), ParseWarning> {
    if self.has_edge(&from.name, &to.name) {
      return Err(ParseWarning::DuplicateConnection {
        span: from.span.merge(to.span),
        from: from.name,
        to: to.name,
      });
    }

    self.connections.push((from, to));
    Ok(())
  }

  /// Is there an edge from one component to another?
  #[must_use]
  pub fn has_edge(&self, from: &str, to: &str) -> bool {
    self
      .connections
      .iter()
      .any(|(a, b)| a.name == from && b.name == to)
  }

  /// Connect every output of this connection to every input of another
  ///
  /// The other connection's own edges follow, and its outputs become the outputs.
  pub fn connect_to(&mut self, other: Self, warnings: &mut Vec<ParseWarning>) {
    for from in &self.outputs.clone() {
      for to in &other.inputs {
        if let Err(warning) = self.add_edge(from.clone(), to.clone()) {
          warnings.push(warning);
        }
      }
    }

    self.add_edges(other.connections, warnings);
    self.outputs = other.outputs;
    self.span = self.span.merge(other.span);
  }

  /// Combine two connections side by side, as in `[a, b]`
  pub fn merge(&mut self, other: Self, warnings: &mut Vec<ParseWarning>) {
    for input in other.inputs {
      if !self.inputs.contains(&input) {
        self.inputs.push(input);
      }
    }
    for output in other.outputs {
      if !self.outputs.contains(&output) {
        self.outputs.push(output);
      }
    }

    self.add_edges(other.connections, warnings);
    self.span = self.span.merge(other.span);
  }

  /// Combine many connections side by side
  pub fn merge_all(
    connections: impl IntoIterator<Item = Self>,
    warnings: &mut Vec<ParseWarning>,
  ) -> Self {
    let mut merged = Self::default();
    for connection in connections {
      merged.merge(connection, warnings);
    }
    merged
  }

  fn add_edges(&mut self, edges: Vec<(Ident, Ident)>, warnings: &mut Vec<ParseWarning>) {
    for (from, to) in edges {
      if let Err(warning) = self.add_edge(from, to) {
        warnings.push(warning);
      }
    }
  }

  /// Remove every edge touching a component
  pub fn remove_component(&mut self, name: &str) {
    self
      .connections
      .retain(|(from, to)| from.name != name && to.name != name);
    self.inputs.retain(|ident| ident.name != name);
    self.outputs.retain(|ident| ident.name != name);
  }

  /// The destinations of edges from a component, in insertion order
  pub fn destinations<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Ident> + 'a {
    self
      .connections
      .iter()
      .filter(move |(from, _)| from.name == name)
      .map(|(_, to)| to)
  }
}

/// A parsed Banana file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BananaFile {
  /// All assignments, in source order
  pub statements: Vec<Assignment>,
  /// Components bound to an identifier, in declaration order
  pub components: IndexMap<Ident, Component>,
  /// Every connection in the file
  pub connections: Connection,
}
impl BananaFile {
  /// Add an assignment, recording it as a component if it binds one
  ///
  /// If the name is already bound to a component, the first binding is kept.
  pub fn add_assignment(&mut self, assignment: Assignment) {
    if let Node::Component(component) = &assignment.rhs
      && let PathSegment::Ident(ident) = &assignment.lhs.head
      && assignment.lhs.properties.is_empty()
      && !self.components.contains_key(ident.name.as_str())
    {
      self.components.insert(ident.clone(), component.clone());
    }

    self.statements.push(assignment);
  }

  /// Remove a component and all of its connections
  pub fn remove_component(&mut self, name: &str) {
    self.components.shift_remove(name);
    self.connections.remove_component(name);
  }

  /// Is the name bound to a component?
  #[must_use]
  pub fn is_component(&self, name: &str) -> bool {
    self.components.contains_key(name)
  }
}
