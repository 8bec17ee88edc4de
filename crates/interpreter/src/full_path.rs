use crate::error::Error;
use banana_components::{ComponentKind, Type};
use banana_syntax::{Span, ast::BananaFile};
use banana_typechecker::Types;

/// Check a Source and a Sink remain, so data can flow through the pipeline
///
/// # Errors
/// If there is no Source, or no Sink. The Source is checked first.
pub fn check_full_path(file: &BananaFile, types: &Types, span: Span) -> Result<(), Error> {
  let has_kind = |wanted: ComponentKind| {
    file.components.keys().any(|ident| {
      matches!(
        types.get(ident.name.as_str()),
        Some(Type::Component { kind, .. }) if *kind == wanted
      )
    })
  };

  for missing in [ComponentKind::Source, ComponentKind::Sink] {
    if !has_kind(missing) {
      return Err(Error::NoFullPath { missing, span });
    }
  }

  Ok(())
}
