use crate::{
  error::TypeError,
  infer::Infer,
  table::{TypeTable, Types},
};
use banana_components::{
  ConnectionRules, Registry, Type,
  path::{PathError, PathErrorKind, assign_path},
};
use banana_syntax::ast::{Assignment, BananaFile, DotPath, Node};

/// Type checker for Banana files
///
/// Checks each assignment in order, then every connection. Stops at the first error.
#[derive(Debug)]
pub struct TypeChecker<'a> {
  pub(crate) registry: &'a Registry,
  pub(crate) rules: &'a ConnectionRules,
  pub(crate) types: Types,
  table: TypeTable,
}
impl<'a> TypeChecker<'a> {
  /// Creates a new type checker, with no variables defined
  #[must_use]
  pub fn new(registry: &'a Registry, rules: &'a ConnectionRules) -> Self {
    Self {
      registry,
      rules,
      types: Types::new(),
      table: TypeTable::new(),
    }
  }

  /// Check a file, returning the history of the types of its variables
  ///
  /// # Errors
  /// The first type error found in the file
  pub fn check(mut self, file: &BananaFile) -> Result<TypeTable, TypeError> {
    for (index, statement) in file.statements.iter().enumerate() {
      self.statement(index, statement)?;
    }

    self.connections(&file.connections)?;

    Ok(self.table)
  }

  fn statement(&mut self, index: usize, assignment: &Assignment) -> Result<(), TypeError> {
    let infer = Infer {
      types: &self.types,
      registry: self.registry,
    };
    let type_ = infer.node(&assignment.rhs)?;

    self.install(&assignment.lhs, &assignment.rhs, type_)?;
    self.table.record(index, &self.types);

    Ok(())
  }

  fn install(&mut self, lhs: &DotPath, rhs: &Node, type_: Type) -> Result<(), TypeError> {
    let name = lhs.name();

    if lhs.properties.is_empty() {
      if let Some(Type::Component { class_name, .. }) = self.types.get(name) {
        return Err(TypeError::ComponentShadowing {
          identifier: name.to_owned(),
          class: class_name.clone(),
          span: lhs.span,
        });
      }

      // components are only created by their constructor
      if type_.is_component() && !matches!(rhs, Node::Component(_)) {
        return Err(TypeError::AssignmentShape {
          type_: type_.to_string(),
          span: rhs.span(),
        });
      }

      self.types.insert(name.to_owned(), type_);
      return Ok(());
    }

    if type_.is_component() {
      return Err(TypeError::AssignmentShape {
        type_: type_.to_string(),
        span: rhs.span(),
      });
    }

    let names = lhs.names();
    match assign_path(&mut self.types, &names, type_.clone()) {
      Ok(()) => Ok(()),
      Err(error) => Err(self.path_error(lhs, &names, error, &type_, rhs)),
    }
  }

  fn lookup(&self, names: &[&str]) -> Option<&Type> {
    let (head, properties) = names.split_first()?;
    let root = self.types.get(*head)?;

    properties
      .iter()
      .try_fold(root, |type_, property| type_.property(property))
  }

  fn path_error(
    &self,
    lhs: &DotPath,
    names: &[&str],
    error: PathError,
    given: &Type,
    rhs: &Node,
  ) -> TypeError {
    match error.kind {
      PathErrorKind::Mismatch => TypeError::TypeMismatch {
        expected: self
          .lookup(names)
          .map_or_else(|| "unknown".to_owned(), Type::to_string),
        given: given.to_string(),
        span: rhs.span(),
      },
      PathErrorKind::NotAnObject | PathErrorKind::UnknownProperty | PathErrorKind::Empty => {
        let parent = &names[..error.depth.min(names.len())];

        TypeError::PropertyDoesNotExist {
          property: names.get(error.depth).copied().unwrap_or_default().to_owned(),
          parent: parent.join("."),
          type_: self
            .lookup(parent)
            .map_or_else(|| "unknown".to_owned(), Type::to_string),
          span: lhs
            .segments()
            .nth(error.depth)
            .map_or(lhs.span, |segment| segment.span()),
        }
      }
    }
  }
}
