use banana_components::{ComponentInstance, Value};
use indexmap::IndexMap;
use serde_json::json;

/// The result of evaluating a Banana file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
  /// The final value of every variable which isn't a component
  pub variables: IndexMap<String, Value>,
  /// The instantiated components, in declaration order
  pub components: IndexMap<String, ComponentInstance>,
}
impl Context {
  /// Get the value of a variable
  #[must_use]
  pub fn variable(&self, name: &str) -> Option<&Value> {
    self.variables.get(name)
  }

  /// Get an instantiated component
  #[must_use]
  pub fn component(&self, name: &str) -> Option<&ComponentInstance> {
    self.components.get(name)
  }

  /// A JSON representation of the variables and components
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    let variables: serde_json::Map<String, serde_json::Value> = self
      .variables
      .iter()
      .map(|(name, value)| (name.clone(), value.to_json()))
      .collect();
    let components: Vec<_> = self
      .components
      .values()
      .map(ComponentInstance::to_json)
      .collect();

    json!({
      "variables": variables,
      "components": components,
    })
  }
}
