use rustc_hash::FxHashSet;
use std::fmt;

/// The role a component plays in a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
  /// Produces data
  Source,
  /// Turns raw data into features
  Ingestor,
  /// A statistical or machine learning model
  Sml,
  /// Chooses between the results of models
  Voter,
  /// Processes live data with the result of a model
  Ldp,
  /// Consumes data
  Sink,
}
impl ComponentKind {
  /// Every kind, in pipeline order
  pub const ALL: [Self; 6] = [
    Self::Source,
    Self::Ingestor,
    Self::Sml,
    Self::Voter,
    Self::Ldp,
    Self::Sink,
  ];

  /// The name of the kind
  #[must_use]
  pub fn name(self) -> &'static str {
    match self {
      Self::Source => "Source",
      Self::Ingestor => "Ingestor",
      Self::Sml => "Sml",
      Self::Voter => "Voter",
      Self::Ldp => "Ldp",
      Self::Sink => "Sink",
    }
  }
}
impl fmt::Display for ComponentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Which kinds of component may be connected to which
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRules {
  allowed: FxHashSet<(ComponentKind, ComponentKind)>,
}
impl ConnectionRules {
  /// No connections are allowed
  #[must_use]
  pub fn none() -> Self {
    Self {
      allowed: FxHashSet::default(),
    }
  }

  /// The rules used by existing pipelines, where an ingestor may feed a sink directly
  #[must_use]
  pub fn legacy() -> Self {
    use ComponentKind::{Ingestor, Ldp, Sink, Sml, Source, Voter};

    Self::none()
      .allow(Source, Ingestor)
      .allow(Source, Ldp)
      .allow(Ingestor, Sml)
      .allow(Ingestor, Sink)
      .allow(Sml, Voter)
      .allow(Sml, Sink)
      .allow(Voter, Ldp)
      .allow(Voter, Sink)
      .allow(Ldp, Sink)
  }

  /// The legacy rules without `Ingestor -> Sink`
  #[must_use]
  pub fn strict() -> Self {
    Self::legacy().forbid(ComponentKind::Ingestor, ComponentKind::Sink)
  }

  /// Allow a connection between two kinds
  #[must_use]
  pub fn allow(mut self, from: ComponentKind, to: ComponentKind) -> Self {
    self.allowed.insert((from, to));
    self
  }

  /// Forbid a connection between two kinds
  #[must_use]
  pub fn forbid(mut self, from: ComponentKind, to: ComponentKind) -> Self {
    self.allowed.remove(&(from, to));
    self
  }

  /// Can a component of kind `from` be connected to a component of kind `to`?
  #[must_use]
  pub fn is_allowed(&self, from: ComponentKind, to: ComponentKind) -> bool {
    self.allowed.contains(&(from, to))
  }

  /// The kinds a component of kind `from` may connect to, in pipeline order
  #[must_use]
  pub fn destinations(&self, from: ComponentKind) -> Vec<ComponentKind> {
    ComponentKind::ALL
      .into_iter()
      .filter(|to| self.is_allowed(from, *to))
      .collect()
  }
}
impl Default for ConnectionRules {
  fn default() -> Self {
    Self::legacy()
  }
}
