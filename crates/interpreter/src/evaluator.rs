//! Evaluates the statements of a type checked file, then instantiates its components
//!
//! The shape of every value comes from the type table. Expressions assigned to a
//! string are concatenated when every operator is `+`, and otherwise computed as
//! numbers. JSON objects start from the default value of their declared type.

use crate::{
  context::Context,
  error::Error,
  expression::{compile_expression, fold},
};
use banana_components::{
  ComponentClass, Config, Registry, Str, Type, Value,
  path::{assign_path, assign_property},
};
use banana_syntax::{
  Span,
  ast::{Assignment, BananaFile, Component, Expr, ExprToken, JsonObj, Node, Operator},
};
use banana_typechecker::{TypeTable, infer_type};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// A component which has been constructed, but not yet instantiated
struct Pending<'a> {
  class: &'a dyn ComponentClass,
  config: Config,
  span: Span,
}

fn internal_bug(message: impl Into<String>, span: Span) -> Error {
  Error::InternalBug {
    message: message.into(),
    span,
  }
}

/// Numbers assigned to a string are stored as their string form
fn cast(value: Value, expected: &Type) -> Value {
  match value {
    Value::Number(_) if expected.is_string_like() => Value::String(value.cast_to_string()),
    value => value,
  }
}

/// Evaluates a file which has passed type checking
pub struct Evaluator<'a> {
  file: &'a BananaFile,
  table: &'a TypeTable,
  registry: &'a Registry,

  variables: IndexMap<String, Value>,
  components: IndexMap<String, Pending<'a>>,
}
impl<'a> Evaluator<'a> {
  /// Create an evaluator for a file, with the types found when it was checked
  #[must_use]
  pub fn new(file: &'a BananaFile, table: &'a TypeTable, registry: &'a Registry) -> Self {
    Self {
      file,
      table,
      registry,
      variables: IndexMap::new(),
      components: IndexMap::new(),
    }
  }

  /// Evaluate every statement, then instantiate the components of the file in
  /// declaration order
  ///
  /// Components which were removed from the file are still evaluated, so their
  /// parameters can be read, but are never instantiated.
  ///
  /// # Errors
  /// If an expression parameter can't be compiled, or a component rejects its
  /// configuration
  pub fn evaluate(mut self) -> Result<Context, Error> {
    let file = self.file;
    for (index, statement) in file.statements.iter().enumerate() {
      self.statement(index, statement)?;
    }

    self.instantiate()
  }

  fn statement(&mut self, index: usize, assignment: &Assignment) -> Result<(), Error> {
    let lhs = &assignment.lhs;
    let names = lhs.names();

    if let Node::Component(component) = &assignment.rhs {
      let pending = self.component(index, component)?;
      self.variables.shift_remove(lhs.name());
      self.components.insert(lhs.name().to_owned(), pending);
      return Ok(());
    }

    let Some(expected) = self.table.get_type(&names, index + 1) else {
      return Err(internal_bug(format!("`{lhs}` has no type"), lhs.span));
    };
    let value = self.value(index, &assignment.rhs, expected)?;
    trace!(variable = %lhs, %value, "assigned");

    let result = match self.components.get_mut(lhs.name()) {
      Some(pending) => assign_path(&mut pending.config, &names[1..], value),
      None => assign_path(&mut self.variables, &names, value),
    };
    result.map_err(|error| internal_bug(format!("can't assign to `{lhs}`, {error}"), lhs.span))
  }

  fn component(&self, index: usize, component: &Component) -> Result<Pending<'a>, Error> {
    let class_name = &component.type_name.name;
    let Some(class) = self.registry.get(class_name) else {
      return Err(internal_bug(
        format!("unknown component `{class_name}`"),
        component.span,
      ));
    };

    let params = class.params();
    let mut config = class.default_config();

    for (position, argument) in component.args.iter().enumerate() {
      let param = match &argument.name {
        Some(name) => params.iter().find(|param| param.name == name.name),
        None => params.get(position),
      };
      let Some(param) = param else {
        return Err(internal_bug(
          format!("no parameter for argument {position} of `{class_name}`"),
          argument.span,
        ));
      };

      let value = self.value(index, &argument.value, &param.type_)?;
      config.insert(param.name.clone(), value);
    }

    Ok(Pending {
      class,
      config,
      span: component.span,
    })
  }

  fn value(&self, index: usize, node: &Node, expected: &Type) -> Result<Value, Error> {
    let value = match node {
      Node::Number(number) => Value::Number(number.value),
      Node::String(string) => Value::String(string.inner().into()),
      Node::Ident(_) | Node::DotPath(_) => self.lookup(node)?,
      Node::Expr(expr) => self.expression(index, node, expr, expected)?,
      Node::JsonObj(object) => self.object(index, object, expected)?,
      Node::List(list) => Value::List(
        list
          .items
          .iter()
          .map(|item| self.value(index, item, &Type::Any))
          .collect::<Result<_, _>>()?,
      ),
      Node::Component(component) => {
        return Err(internal_bug(
          "a component can't be used as a value",
          component.span,
        ));
      }
    };

    Ok(cast(value, expected))
  }

  fn lookup(&self, node: &Node) -> Result<Value, Error> {
    let Some(path) = node.as_path() else {
      return Err(internal_bug("expected a variable", node.span()));
    };
    let names = path.names();
    let Some((head, properties)) = names.split_first() else {
      return Err(internal_bug("expected a variable", path.span));
    };

    let found = match (self.variables.get(*head), self.components.get(*head)) {
      (Some(value), _) => properties
        .iter()
        .try_fold(value, |value, name| value.property(name)),
      (None, Some(pending)) => properties.split_first().and_then(|(first, rest)| {
        let value = pending.config.get(*first)?;
        rest.iter().try_fold(value, |value, name| value.property(name))
      }),
      (None, None) => None,
    };

    found
      .cloned()
      .ok_or_else(|| internal_bug(format!("`{path}` has no value"), path.span))
  }

  fn expression(
    &self,
    index: usize,
    node: &Node,
    expr: &Expr,
    expected: &Type,
  ) -> Result<Value, Error> {
    let concatenate = match expected {
      Type::String | Type::Enum { .. } => {
        expr.operators().all(|(operator, _)| operator == Operator::Add)
      }
      Type::Number => false,
      Type::Any => {
        let types = self.table.types_before(index);
        infer_type(node, types, self.registry)?.is_string_like()
      }
      other => {
        return Err(internal_bug(
          format!("an expression can't be used as {other}"),
          expr.span,
        ));
      }
    };

    if concatenate {
      let mut result = Str::new();
      for operand in expr.operands() {
        let value = self.value(index, operand, &Type::String)?;
        result.push_str(&value.cast_to_string());
      }

      return Ok(Value::String(result));
    }

    let mut first = None;
    let mut rest = Vec::new();
    let mut operator = None;

    for token in &expr.tokens {
      match token {
        ExprToken::Operator(op, _) => operator = Some(*op),
        ExprToken::Operand(operand) => {
          let value = self.value(index, operand, &Type::Number)?;
          let Some(number) = value.as_number() else {
            return Err(internal_bug(
              format!("a {} can't be used as a number", value.type_name()),
              operand.span(),
            ));
          };

          match operator.take() {
            Some(op) => rest.push((op, number)),
            None => first = Some(number),
          }
        }
      }
    }

    Ok(Value::Number(fold(first.unwrap_or_default(), rest)))
  }

  fn object(&self, index: usize, object: &JsonObj, expected: &Type) -> Result<Value, Error> {
    let mut result = match expected {
      Type::Object { .. } => expected.default_value(),
      _ => Value::Object(IndexMap::new()),
    };

    for property in &object.properties {
      let names = property.key.names();
      let property_type = names
        .iter()
        .try_fold(expected, |type_, name| type_.property(name))
        .unwrap_or(&Type::Any);

      let value = self.value(index, &property.value, property_type)?;
      assign_property(&mut result, &names, value, 0).map_err(|error| {
        internal_bug(
          format!("can't assign `{}`, {error}", property.key),
          property.key.span,
        )
      })?;
    }

    Ok(result)
  }

  fn instantiate(mut self) -> Result<Context, Error> {
    let mut context = Context {
      variables: std::mem::take(&mut self.variables),
      components: IndexMap::new(),
    };

    for ident in self.file.components.keys() {
      let name = ident.name.as_str();
      let Some(mut pending) = self.components.shift_remove(name) else {
        return Err(internal_bug(
          format!("`{name}` was never constructed"),
          ident.span,
        ));
      };
      let span = pending.span;

      compile_expressions(name, &mut pending)?;
      let instance = pending
        .class
        .instantiate(name, pending.config)
        .map_err(|error| Error::InvalidConfiguration {
          component: name.to_owned(),
          error,
          span,
        })?;

      debug!(component = name, class = pending.class.name(), "instantiated");
      context.components.insert(name.to_owned(), instance);
    }

    Ok(context)
  }
}

/// Replace the source of each expression parameter with its compiled function
fn compile_expressions(name: &str, pending: &mut Pending) -> Result<(), Error> {
  for param in pending.class.expression_params() {
    let Some(Value::String(source)) = pending.config.get(param.expression) else {
      continue;
    };
    let environment: IndexMap<String, String> = match pending.config.get(param.environment) {
      Some(Value::Object(bindings)) => bindings
        .iter()
        .map(|(name, external)| (name.clone(), external.cast_to_string().to_string()))
        .collect(),
      _ => IndexMap::new(),
    };

    let compiled = compile_expression(&environment, source.as_str()).map_err(|error| {
      Error::InvalidExpression {
        component: name.to_owned(),
        param: param.expression.to_owned(),
        reason: error.to_string(),
        span: pending.span,
      }
    })?;

    pending
      .config
      .insert(param.expression.to_owned(), Value::Expression(compiled));
  }

  Ok(())
}
