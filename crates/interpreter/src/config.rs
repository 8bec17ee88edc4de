use banana_components::ConnectionRules;

/// Options for compiling and running Banana files
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
  /// Which kinds of component may be connected
  pub connection_rules: ConnectionRules,
  /// Treat any warning as a fatal error
  pub deny_warnings: bool,
}
impl Config {
  /// The default options, with the strict connection rules
  #[must_use]
  pub fn strict() -> Self {
    Self {
      connection_rules: ConnectionRules::strict(),
      ..Self::default()
    }
  }
}
