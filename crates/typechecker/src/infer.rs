use crate::{error::TypeError, similarity::similarly_named, table::Types};
use banana_components::{ParamDescriptor, Registry, Type, path::assign_property};
use banana_syntax::{
  Span,
  ast::{Component, DotPath, Expr, ExprToken, JsonObj, Node, Operator},
};
use rustc_hash::FxHashSet;

/// Infers the type of values, from the types of the variables in scope
#[derive(Clone, Copy, Debug)]
pub struct Infer<'a> {
  /// The variables in scope
  pub types: &'a Types,
  /// The component classes which can be constructed
  pub registry: &'a Registry,
}
impl<'a> Infer<'a> {
  /// The type of a value
  ///
  /// # Errors
  /// If the value isn't correctly typed
  pub fn node(&self, node: &Node) -> Result<Type, TypeError> {
    match node {
      Node::Number(_) => Ok(Type::Number),
      Node::String(_) => Ok(Type::String),
      Node::Ident(ident) => self.variable(&ident.name, ident.span).cloned(),
      Node::DotPath(path) => self.path(path),
      Node::Expr(expr) => self.expression(expr),
      Node::JsonObj(object) => self.object(object),
      Node::List(list) => {
        for item in &list.items {
          let type_ = self.node(item)?;
          if type_.is_component() {
            return Err(TypeError::AssignmentShape {
              type_: type_.to_string(),
              span: item.span(),
            });
          }
        }
        Ok(Type::Any)
      }
      Node::Component(component) => self.component(component),
    }
  }

  fn variable(&self, name: &str, span: Span) -> Result<&'a Type, TypeError> {
    self.types.get(name).ok_or_else(|| TypeError::UnknownName {
      identifier: name.to_owned(),
      span,
      did_you_mean: similarly_named(name, self.types.keys().map(String::as_str)),
    })
  }

  /// The type of a variable or one of its properties
  ///
  /// # Errors
  /// If the variable is not defined, or a property doesn't exist
  pub fn path(&self, path: &DotPath) -> Result<Type, TypeError> {
    let mut type_ = self.variable(path.name(), path.head.span())?;
    let mut parent = path.name().to_owned();

    for segment in &path.properties {
      let Some(property) = type_.property(segment.name()) else {
        return Err(TypeError::PropertyDoesNotExist {
          property: segment.name().to_owned(),
          parent,
          type_: type_.to_string(),
          span: segment.span(),
        });
      };

      parent.push('.');
      parent.push_str(segment.name());
      type_ = property;
    }

    Ok(type_.clone())
  }

  fn expression(&self, expr: &Expr) -> Result<Type, TypeError> {
    if let [ExprToken::Operand(operand)] = expr.tokens.as_slice() {
      return self.node(operand);
    }

    let mut result = Type::Number;
    for operand in expr.operands() {
      match self.node(operand)? {
        Type::Number | Type::Any => {}
        type_ if type_.is_string_like() => result = Type::String,
        type_ => {
          return Err(TypeError::TypeMismatch {
            expected: "number or string".to_owned(),
            given: type_.to_string(),
            span: operand.span(),
          });
        }
      }
    }

    if result == Type::String
      && let Some((operator, span)) = expr.operators().find(|(op, _)| *op != Operator::Add)
    {
      return Err(TypeError::UnknownOperator {
        operator: operator.to_string(),
        type_: result.to_string(),
        span,
      });
    }

    Ok(result)
  }

  fn object(&self, object: &JsonObj) -> Result<Type, TypeError> {
    let mut type_ = Type::open_object();

    for property in &object.properties {
      let value = self.node(&property.value)?;
      if value.is_component() {
        return Err(TypeError::AssignmentShape {
          type_: value.to_string(),
          span: property.value.span(),
        });
      }

      let names = property.key.names();
      assign_property(&mut type_, &names, value, 0).map_err(|_| {
        TypeError::ConflictingProperty {
          key: property.key.to_string(),
          span: property.key.span,
        }
      })?;
    }

    Ok(type_)
  }

  fn component(&self, component: &Component) -> Result<Type, TypeError> {
    let name = component.type_name.name.as_str();
    let Some(class) = self.registry.get(name) else {
      return Err(TypeError::UnknownComponent {
        class: name.to_owned(),
        span: component.type_name.span,
        did_you_mean: similarly_named(name, self.registry.names()),
      });
    };

    let params = class.params();
    let args = &component.args;

    let named = args.iter().filter(|arg| arg.name.is_some()).count();
    if named != 0 && named != args.len() {
      return Err(TypeError::ComponentMixedArgs {
        class: name.to_owned(),
        span: component.span,
      });
    }

    let mut given = FxHashSet::default();
    for (position, arg) in args.iter().enumerate() {
      let param = match &arg.name {
        Some(param_name) => {
          let Some(param) = params.iter().find(|param| param.name == param_name.name) else {
            return Err(TypeError::ComponentWrongParamName {
              class: name.to_owned(),
              param: param_name.name.clone(),
              span: param_name.span,
              did_you_mean: similarly_named(
                &param_name.name,
                params.iter().map(|param| param.name.as_str()),
              ),
            });
          };
          if !given.insert(param.name.as_str()) {
            return Err(TypeError::ComponentDuplicateParam {
              class: name.to_owned(),
              param: param.name.clone(),
              span: arg.span,
            });
          }
          param
        }
        None => {
          let Some(param) = params.get(position) else {
            return Err(TypeError::ComponentTooManyParams {
              class: name.to_owned(),
              expected: params.len(),
              given: args.len(),
              span: arg.span,
            });
          };
          param
        }
      };

      self.argument(param, &arg.value)?;
    }

    Ok(class.component_type())
  }

  fn argument(&self, param: &ParamDescriptor, value: &Node) -> Result<(), TypeError> {
    let type_ = self.node(value)?;

    if type_.is_component() || !type_.can_be_cast_to(&param.type_) {
      return Err(TypeError::TypeMismatch {
        expected: param.type_.to_string(),
        given: type_.to_string(),
        span: value.span(),
      });
    }

    if let (Type::Enum { variants }, Node::String(string)) = (&param.type_, value)
      && !variants.iter().any(|variant| variant == string.inner())
    {
      return Err(TypeError::UnknownVariant {
        value: string.inner().to_owned(),
        variants: variants.clone(),
        span: string.span,
      });
    }

    Ok(())
  }
}
