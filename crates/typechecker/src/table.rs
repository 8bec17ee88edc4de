use banana_components::Type;
use indexmap::IndexMap;
use std::sync::LazyLock;

/// The types of every variable, at a point in the program
pub type Types = IndexMap<String, Type>;

/// The types of every variable after a statement changed them
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
  /// The index of the statement which made the change
  pub index: usize,
  /// The types of every variable after the statement
  pub types: Types,
}

/// The history of variable types while checking a file
///
/// A snapshot is only recorded when a statement changes a type, and snapshot
/// indexes strictly increase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeTable {
  snapshots: Vec<Snapshot>,
}
impl TypeTable {
  /// An empty type table, where no variables are defined
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the types after a statement, if they have changed
  ///
  /// Returns whether a snapshot was recorded.
  pub(crate) fn record(&mut self, index: usize, types: &Types) -> bool {
    let changed = self.final_types() != types;
    let increasing = self.snapshots.last().is_none_or(|last| last.index < index);

    if changed && increasing {
      self.snapshots.push(Snapshot {
        index,
        types: types.clone(),
      });
    }

    changed && increasing
  }

  /// All the recorded snapshots, oldest first
  #[must_use]
  pub fn snapshots(&self) -> &[Snapshot] {
    &self.snapshots
  }

  /// The types visible to the statement at `index`, from statements before it
  #[must_use]
  pub fn types_before(&self, index: usize) -> &Types {
    static EMPTY: LazyLock<Types> = LazyLock::new(Types::new);

    self
      .snapshots
      .iter()
      .rev()
      .find(|snapshot| snapshot.index < index)
      .map_or(&*EMPTY, |snapshot| &snapshot.types)
  }

  /// The types after every statement
  #[must_use]
  pub fn final_types(&self) -> &Types {
    self.types_before(usize::MAX)
  }

  /// The type of a path, as seen by the statement at `index`
  #[must_use]
  pub fn get_type(&self, path: &[&str], index: usize) -> Option<&Type> {
    let (head, properties) = path.split_first()?;
    let root = self.types_before(index).get(*head)?;

    properties
      .iter()
      .try_fold(root, |type_, property| type_.property(property))
  }

  /// The final type of every variable as a JSON object
  #[must_use]
  pub fn to_json(&self) -> serde_json::Value {
    serde_json::Value::Object(
      self
        .final_types()
        .iter()
        .map(|(name, type_)| (name.clone(), type_.to_json()))
        .collect(),
    )
  }
}
