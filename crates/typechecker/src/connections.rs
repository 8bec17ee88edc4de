use crate::{check::TypeChecker, error::TypeError, similarity::similarly_named};
use banana_components::{ComponentKind, Type};
use banana_syntax::ast::{Connection, Ident};

impl TypeChecker<'_> {
  /// Check every edge connects two components of kinds which may be connected
  pub(crate) fn connections(&self, connection: &Connection) -> Result<(), TypeError> {
    for (from, to) in &connection.connections {
      let from_kind = self.component_kind(from)?;
      let to_kind = self.component_kind(to)?;

      if !self.rules.is_allowed(from_kind, to_kind) {
        return Err(TypeError::ConnectionIllegal {
          from: from.name.clone(),
          from_kind: from_kind.to_string(),
          to: to.name.clone(),
          to_kind: to_kind.to_string(),
          span: from.span.merge(to.span),
        });
      }
    }

    Ok(())
  }

  fn component_kind(&self, ident: &Ident) -> Result<ComponentKind, TypeError> {
    match self.types.get(ident.name.as_str()) {
      Some(Type::Component { kind, .. }) => Ok(*kind),
      Some(type_) => Err(TypeError::ConnectionNotComponent {
        identifier: ident.name.clone(),
        type_: type_.to_string(),
        span: ident.span,
      }),
      None => Err(TypeError::UnknownName {
        identifier: ident.name.clone(),
        span: ident.span,
        did_you_mean: similarly_named(
          &ident.name,
          self
            .types
            .iter()
            .filter(|(_, type_)| type_.is_component())
            .map(|(name, _)| name.as_str()),
        ),
      }),
    }
  }
}
