//! Assignment to dotted paths, such as `a.b.c = 1`
//!
//! The type checker assigns types and the evaluator assigns values with the same
//! rules: missing intermediate properties are created as open objects, strict
//! objects only accept properties they already have.

use indexmap::IndexMap;
use std::fmt;

/// What kind of container a value is, when a property is assigned into it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
  /// Accepts any property, creating it if missing
  Open,
  /// Only accepts properties it already has
  Strict,
  /// Accepts any property, but doesn't record it
  Opaque,
  /// Properties can't be assigned
  NotAnObject,
}

/// A tree of objects which can be assigned into with a path
pub trait PathTarget: Sized {
  /// A new, empty, open object
  fn open_object() -> Self;

  /// How properties are assigned into this value
  fn container(&self) -> Container;

  /// Does the value have the property?
  fn has_property(&self, name: &str) -> bool;

  /// Get a mutable reference to a property
  fn property_mut(&mut self, name: &str) -> Option<&mut Self>;

  /// Add a new property, only called on [`Container::Open`] values
  fn create_property(&mut self, name: &str, value: Self);

  /// Assign over an existing property
  ///
  /// # Errors
  /// If a strict container's property does not accept the value
  fn overwrite_property(&mut self, value: Self, strict: bool) -> Result<(), PathErrorKind>;
}

/// Why a path could not be assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathErrorKind {
  /// A segment before the last is not an object
  NotAnObject,
  /// The property doesn't exist on a strict object
  UnknownProperty,
  /// The value doesn't match the declared type of the property
  Mismatch,
  /// The path has no segments
  Empty,
}

/// An error assigning to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathError {
  /// The reason for the error
  pub kind: PathErrorKind,
  /// The index of the segment of the path where the error happened
  pub depth: usize,
}
impl fmt::Display for PathError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      PathErrorKind::NotAnObject => write!(f, "segment {} is not an object", self.depth),
      PathErrorKind::UnknownProperty => write!(f, "segment {} does not exist", self.depth),
      PathErrorKind::Mismatch => write!(f, "segment {} has a different type", self.depth),
      PathErrorKind::Empty => write!(f, "the path is empty"),
    }
  }
}

/// Assign a value at a path in a map of named roots
///
/// A path of one segment replaces the root. Longer paths create the root as an
/// open object if it is missing.
///
/// # Errors
/// If the path can't be assigned, with the segment which caused the error
pub fn assign_path<T: PathTarget>(
  roots: &mut IndexMap<String, T>,
  path: &[&str],
  value: T,
) -> Result<(), PathError> {
  let Some((head, rest)) = path.split_first() else {
    return Err(PathError {
      kind: PathErrorKind::Empty,
      depth: 0,
    });
  };

  if rest.is_empty() {
    roots.insert((*head).to_owned(), value);
    return Ok(());
  }

  let root = roots
    .entry((*head).to_owned())
    .or_insert_with(T::open_object);
  assign_property(root, rest, value, 1)
}

/// Assign a value at a path inside an object
///
/// `depth` is the index of the first segment of `path` within the full path.
///
/// # Errors
/// If the path can't be assigned, with the segment which caused the error
pub fn assign_property<T: PathTarget>(
  target: &mut T,
  path: &[&str],
  value: T,
  depth: usize,
) -> Result<(), PathError> {
  let Some((name, rest)) = path.split_first() else {
    return Err(PathError {
      kind: PathErrorKind::Empty,
      depth,
    });
  };
  let error = |kind| PathError { kind, depth };

  let strict = match target.container() {
    Container::Open => false,
    Container::Strict => true,
    Container::Opaque => return Ok(()),
    Container::NotAnObject => return Err(error(PathErrorKind::NotAnObject)),
  };

  if !target.has_property(name) {
    if strict {
      return Err(error(PathErrorKind::UnknownProperty));
    }

    if rest.is_empty() {
      target.create_property(name, value);
      return Ok(());
    }
    target.create_property(name, T::open_object());
  }

  let Some(property) = target.property_mut(name) else {
    return Err(error(PathErrorKind::UnknownProperty));
  };

  if rest.is_empty() {
    property.overwrite_property(value, strict).map_err(error)
  } else {
    assign_property(property, rest, value, depth + 1)
  }
}
