//! Value nodes of the AST, the right hand side of statements

use crate::span::Span;
use std::{borrow::Borrow, fmt, hash};
use thin_vec::ThinVec;

/// A numeric literal
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
  /// The parsed value
  pub value: f64,
  /// The raw text of the literal, as it was written
  pub raw: String,
  /// The location of the literal
  pub span: Span,
}
impl Number {
  /// The literal exactly as it appeared in the source
  #[must_use]
  pub fn into_unmodified_str(&self) -> &str {
    &self.raw
  }
}

/// A string literal, including its quotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLit {
  /// The raw text, with the surrounding quotes
  pub raw: String,
  /// The location of the literal
  pub span: Span,
}
impl StringLit {
  /// The text between the quotes
  #[must_use]
  pub fn inner(&self) -> &str {
    self.raw.get(1..self.raw.len().saturating_sub(1)).unwrap_or_default()
  }

  /// The literal exactly as it appeared in the source, quotes included
  #[must_use]
  pub fn into_unmodified_str(&self) -> &str {
    &self.raw
  }
}

/// An identifier
///
/// Identifiers are compared and hashed by name only, the span is ignored
#[derive(Debug, Clone, Eq)]
pub struct Ident {
  /// The text of the identifier
  pub name: String,
  /// The location of the identifier
  pub span: Span,
}
impl Ident {
  /// Create an identifier from a name and a location
  pub fn new(name: impl Into<String>, span: Span) -> Self {
    Self {
      name: name.into(),
      span,
    }
  }

  /// The identifier exactly as it appeared in the source
  #[must_use]
  pub fn into_unmodified_str(&self) -> &str {
    &self.name
  }
}
impl PartialEq for Ident {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}
impl hash::Hash for Ident {
  fn hash<H: hash::Hasher>(&self, state: &mut H) {
    self.name.hash(state);
  }
}
impl Borrow<str> for Ident {
  fn borrow(&self) -> &str {
    &self.name
  }
}
impl fmt::Display for Ident {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

/// One segment of a dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
  /// `a`
  Ident(Ident),
  /// `"a"`
  String(StringLit),
}
impl PathSegment {
  /// The name of the property, string segments without their quotes
  #[must_use]
  pub fn name(&self) -> &str {
    match self {
      Self::Ident(ident) => &ident.name,
      Self::String(string) => string.inner(),
    }
  }

  /// The location of the segment
  pub fn span(&self) -> Span {
    match self {
      Self::Ident(ident) => ident.span,
      Self::String(string) => string.span,
    }
  }

  /// The segment exactly as it appeared in the source
  #[must_use]
  pub fn into_unmodified_str(&self) -> &str {
    match self {
      Self::Ident(ident) => ident.into_unmodified_str(),
      Self::String(string) => string.into_unmodified_str(),
    }
  }
}

/// A path of properties, such as `a.b."c"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotPath {
  /// The first segment
  pub head: PathSegment,
  /// The properties accessed after the head, in order
  pub properties: ThinVec<PathSegment>,
  /// The location of the whole path
  pub span: Span,
}
impl DotPath {
  /// Create a path from a single segment
  pub fn from_segment(head: PathSegment) -> Self {
    Self {
      span: head.span(),
      head,
      properties: ThinVec::new(),
    }
  }

  /// Is the path a single identifier, without any properties?
  #[must_use]
  pub fn is_ident(&self) -> bool {
    self.properties.is_empty() && matches!(self.head, PathSegment::Ident(_))
  }

  /// The name of the first segment
  #[must_use]
  pub fn name(&self) -> &str {
    self.head.name()
  }

  /// All segments of the path, head first
  pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
    std::iter::once(&self.head).chain(self.properties.iter())
  }

  /// The names of all the segments, head first
  #[must_use]
  pub fn names(&self) -> Vec<&str> {
    self.segments().map(PathSegment::name).collect()
  }

  /// Do the paths refer to the same property?
  ///
  /// Identifiers and strings with the same text are the same property
  #[must_use]
  pub fn same_path(&self, other: &Self) -> bool {
    self.properties.len() == other.properties.len()
      && self.segments().zip(other.segments()).all(|(a, b)| a.name() == b.name())
  }

  /// The path exactly as it appeared in the source
  #[must_use]
  pub fn into_unmodified_str(&self) -> String {
    let segments: Vec<_> = self.segments().map(PathSegment::into_unmodified_str).collect();
    segments.join(".")
  }
}
impl fmt::Display for DotPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.names().join("."))
  }
}

/// A binary operator within an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
  /// `+`
  Add,
  /// `-`
  Subtract,
  /// `*`
  Multiply,
  /// `/`
  Divide,
}
impl Operator {
  /// Does the operator bind tighter than `+` and `-`?
  #[must_use]
  pub fn is_multiplicative(self) -> bool {
    matches!(self, Self::Multiply | Self::Divide)
  }
}
impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Add => write!(f, "+"),
      Self::Subtract => write!(f, "-"),
      Self::Multiply => write!(f, "*"),
      Self::Divide => write!(f, "/"),
    }
  }
}

/// An item in the token list of an expression
#[derive(Debug, Clone, PartialEq)]
pub enum ExprToken {
  /// A value
  Operand(Node),
  /// An operator, with its location
  Operator(Operator, Span),
}

/// An arithmetic expression
///
/// Operands are interleaved with operators, left associative. Runs of `*` and `/`
/// and parenthesised groups are nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
  /// Operands and operators in source order
  pub tokens: ThinVec<ExprToken>,
  /// The location of the whole expression
  pub span: Span,
}
impl Expr {
  /// The operands of the expression
  pub fn operands(&self) -> impl Iterator<Item = &Node> {
    self.tokens.iter().filter_map(|token| match token {
      ExprToken::Operand(node) => Some(node),
      ExprToken::Operator(..) => None,
    })
  }

  /// The operators of the expression, with their locations
  pub fn operators(&self) -> impl Iterator<Item = (Operator, Span)> + '_ {
    self.tokens.iter().filter_map(|token| match token {
      ExprToken::Operator(operator, span) => Some((*operator, *span)),
      ExprToken::Operand(_) => None,
    })
  }

  /// The expression exactly as it appeared in the source, up to whitespace
  #[must_use]
  pub fn into_unmodified_str(&self, source: &str) -> String {
    self.span.source_text(source).to_owned()
  }
}

/// A property of a json object
#[derive(Debug, Clone, PartialEq)]
pub struct JsonProperty {
  /// The key, possibly a dotted path
  pub key: DotPath,
  /// The value assigned to the key
  pub value: Node,
}

/// A json object literal, `{ a: 1, b.c: "d" }`
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObj {
  /// The properties in source order, with unique keys
  pub properties: ThinVec<JsonProperty>,
  /// The location of the object, including the braces
  pub span: Span,
}

/// A json list literal, `[1, 2, 3]`
#[derive(Debug, Clone, PartialEq)]
pub struct JsonList {
  /// The items in source order
  pub items: ThinVec<Node>,
  /// The location of the list, including the brackets
  pub span: Span,
}

/// An argument to a component constructor
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCtorArg {
  /// The name of the argument, if it is named
  pub name: Option<Ident>,
  /// The value of the argument
  pub value: Node,
  /// The location of the argument, including the name
  pub span: Span,
}

/// A component constructor, `KafkaSource(zk_host="localhost")`
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
  /// The class of the component
  pub type_name: Ident,
  /// The arguments in source order
  pub args: ThinVec<ComponentCtorArg>,
  /// The location of the constructor, including the brackets
  pub span: Span,
}

/// A value in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  /// `1.5`
  Number(Number),
  /// `"hello"`
  String(StringLit),
  /// `a`
  Ident(Ident),
  /// `a.b`
  DotPath(DotPath),
  /// `a + 1`
  Expr(Expr),
  /// `{ a: 1 }`
  JsonObj(JsonObj),
  /// `[1, 2]`
  List(JsonList),
  /// `StdoutSink()`
  Component(Component),
}
impl Node {
  /// The location of the node
  pub fn span(&self) -> Span {
    match self {
      Self::Number(x) => x.span,
      Self::String(x) => x.span,
      Self::Ident(x) => x.span,
      Self::DotPath(x) => x.span,
      Self::Expr(x) => x.span,
      Self::JsonObj(x) => x.span,
      Self::List(x) => x.span,
      Self::Component(x) => x.span,
    }
  }

  /// The name of the kind of node
  #[must_use]
  pub fn kind_name(&self) -> &'static str {
    match self {
      Self::Number(_) => "Number",
      Self::String(_) => "String",
      Self::Ident(_) => "Identifier",
      Self::DotPath(_) => "Path",
      Self::Expr(_) => "Expression",
      Self::JsonObj(_) => "Object",
      Self::List(_) => "List",
      Self::Component(_) => "Component",
    }
  }

  /// The direct children of the node
  pub fn children(&self) -> Vec<&Self> {
    match self {
      Self::Number(_) | Self::String(_) | Self::Ident(_) | Self::DotPath(_) => Vec::new(),
      Self::Expr(expr) => expr.operands().collect(),
      Self::JsonObj(object) => object.properties.iter().map(|p| &p.value).collect(),
      Self::List(list) => list.items.iter().collect(),
      Self::Component(component) => component.args.iter().map(|a| &a.value).collect(),
    }
  }

  /// Convert an identifier or path into a [`DotPath`]
  #[must_use]
  pub fn as_path(&self) -> Option<DotPath> {
    match self {
      Self::Ident(ident) => Some(DotPath::from_segment(PathSegment::Ident(ident.clone()))),
      Self::DotPath(path) => Some(path.clone()),
      _ => None,
    }
  }
}
