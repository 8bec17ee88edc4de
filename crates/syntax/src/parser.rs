use crate::{
  ast::*,
  span::Span,
  tokeniser::{Token, TokenKind, Tokeniser},
};
use std::{error, fmt};
use thin_vec::{ThinVec, thin_vec};

enum Statement {
  Assignment(Assignment),
  Connection(Connection),
}

pub struct Parser<'source> {
  /// The source code being parsed
  source: &'source str,
  /// The tokens of the source, without comments
  tokens: Vec<Token>,

  /// The current token
  position: usize,
  /// How many brackets deep are we, newlines are insignificant inside brackets
  depth: usize,

  errors: Vec<ParseError>,
  warnings: Vec<ParseWarning>,
}
impl<'source> Parser<'source> {
  pub fn new(source: &'source str) -> Self {
    let tokens = Tokeniser::from(source)
      .filter(|token| token.kind != TokenKind::Comment)
      .collect();

    Self {
      source,
      tokens,
      position: 0,
      depth: 0,
      errors: Vec::new(),
      warnings: Vec::new(),
    }
  }

  pub fn parse(mut self) -> (BananaFile, Vec<ParseError>, Vec<ParseWarning>) {
    let mut file = BananaFile::default();
    self.skip_newline();

    while !self.is_finished() {
      match self.statement() {
        Ok(Statement::Assignment(assignment)) => file.add_assignment(assignment),
        Ok(Statement::Connection(connection)) => {
          file.connections.merge(connection, &mut self.warnings);
        }
        Err(error) => {
          self.errors.push(error);
          self.resync();
        }
      }

      self.skip_newline();
    }

    (file, self.errors, self.warnings)
  }

  pub fn parse_standalone_expression(mut self) -> Result<Node, ParseError> {
    self.skip_newline();
    let expression = self.expression()?;
    self.skip_newline();

    if self.is_finished() {
      Ok(expression)
    } else {
      Err(self.error_at_current(|received| ParseError::Expected {
        expected: TokenKind::EndOfFile,
        received,
      }))
    }
  }

  fn is_finished(&self) -> bool {
    self.current_kind() == TokenKind::EndOfFile
  }

  fn token_at(&self, position: usize) -> Token {
    // The tokeniser always ends with an end of file token
    let last = self.tokens.len().saturating_sub(1);
    self.tokens.get(position.min(last)).copied().unwrap_or(Token {
      kind: TokenKind::EndOfFile,
      start: u32::try_from(self.source.len()).unwrap_or(u32::MAX),
      length: 0,
    })
  }

  fn current_token(&self) -> Token {
    self.token_at(self.position)
  }

  fn current_kind(&self) -> TokenKind {
    self.current_token().kind
  }

  fn peek_kind(&self) -> TokenKind {
    self.token_at(self.position + 1).kind
  }

  fn advance(&mut self) -> Token {
    let token = self.current_token();
    if self.position < self.tokens.len() {
      self.position += 1;
    }
    token
  }

  fn skip_newline(&mut self) {
    while self.current_kind() == TokenKind::EndOfLine {
      self.position += 1;
    }
  }

  fn skip_newline_in_brackets(&mut self) {
    if self.depth > 0 {
      self.skip_newline();
    }
  }

  fn text(&self, token: Token) -> &'source str {
    token.text(self.source)
  }

  /// Create an error for the current token
  ///
  /// Unknown characters and unterminated strings report themselves
  fn error_at_current(&self, error: impl FnOnce(Token) -> ParseError) -> ParseError {
    let token = self.current_token();

    match token.kind {
      TokenKind::Unknown => ParseError::UnknownCharacter(token),
      TokenKind::UnterminatedString => ParseError::UnterminatedString(token),
      _ => error(token),
    }
  }

  fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
    if self.current_kind() == kind {
      Ok(self.advance())
    } else {
      Err(self.error_at_current(|received| ParseError::Expected {
        expected: kind,
        received,
      }))
    }
  }

  /// Expect a comma or the closing bracket after an item in a list
  fn separator(&mut self, closing: TokenKind) -> Result<(), ParseError> {
    self.skip_newline();

    match self.current_kind() {
      TokenKind::Comma => {
        self.advance();
        Ok(())
      }
      kind if kind == closing => Ok(()),
      TokenKind::EndOfFile => Err(ParseError::Expected {
        expected: closing,
        received: self.current_token(),
      }),
      _ => Err(self.error_at_current(ParseError::MissingComma)),
    }
  }

  fn expect_end_of_statement(&self) -> Result<(), ParseError> {
    match self.current_kind() {
      TokenKind::EndOfLine | TokenKind::EndOfFile => Ok(()),
      _ => Err(self.error_at_current(|received| ParseError::Expected {
        expected: TokenKind::EndOfLine,
        received,
      })),
    }
  }

  fn resync(&mut self) {
    while !matches!(
      self.current_kind(),
      TokenKind::EndOfFile | TokenKind::EndOfLine
    ) {
      self.position += 1;
    }
    self.depth = 0;
  }

  fn statement(&mut self) -> Result<Statement, ParseError> {
    let statement = match (self.current_kind(), self.peek_kind()) {
      (TokenKind::LeftSquare, _) | (TokenKind::Identifier, TokenKind::RightArrow) => {
        Statement::Connection(self.connection()?)
      }
      (TokenKind::Identifier | TokenKind::String, _) => Statement::Assignment(self.assignment()?),
      _ => return Err(self.error_at_current(ParseError::ExpectedStatement)),
    };

    self.expect_end_of_statement()?;
    Ok(statement)
  }

  fn assignment(&mut self) -> Result<Assignment, ParseError> {
    let lhs = self.dot_path()?;
    self.expect(TokenKind::Equal)?;
    self.skip_newline();

    let rhs = match (self.current_kind(), self.peek_kind()) {
      (TokenKind::Identifier, TokenKind::LeftParen) => {
        let component = self.component()?;

        if !lhs.is_ident() {
          return Err(ParseError::ComponentBoundToPath {
            path: lhs.span,
            component: component.span,
          });
        }

        Node::Component(component)
      }
      (TokenKind::LeftCurly, _) => Node::JsonObj(self.json_object()?),
      _ => self.expression()?,
    };

    Ok(Assignment {
      span: lhs.span.merge(rhs.span()),
      lhs,
      rhs,
    })
  }

  fn ident(&mut self) -> Result<Ident, ParseError> {
    let token = self.expect(TokenKind::Identifier)?;
    Ok(Ident::new(self.text(token), token.into()))
  }

  fn string(&mut self) -> Result<StringLit, ParseError> {
    let token = self.expect(TokenKind::String)?;
    Ok(StringLit {
      raw: self.text(token).to_owned(),
      span: token.into(),
    })
  }

  fn path_segment(&mut self) -> Result<PathSegment, ParseError> {
    match self.current_kind() {
      TokenKind::String => Ok(PathSegment::String(self.string()?)),
      _ => Ok(PathSegment::Ident(self.ident()?)),
    }
  }

  fn dot_path(&mut self) -> Result<DotPath, ParseError> {
    let mut path = DotPath::from_segment(self.path_segment()?);

    while self.current_kind() == TokenKind::Dot {
      self.advance();
      let segment = self.path_segment()?;
      path.span = path.span.merge(segment.span());
      path.properties.push(segment);
    }

    Ok(path)
  }

  fn expression(&mut self) -> Result<Node, ParseError> {
    self.binary_run(false)
  }

  /// Parse a run of operands separated by operators of the same precedence
  ///
  /// `+` and `-` runs contain `*` and `/` runs as nested expressions.
  fn binary_run(&mut self, multiplicative: bool) -> Result<Node, ParseError> {
    let mut tokens = thin_vec![ExprToken::Operand(self.binary_operand(multiplicative)?)];

    while let Some(operator) = self.operator(multiplicative) {
      let token = self.advance();
      self.skip_newline();

      tokens.push(ExprToken::Operator(operator, token.into()));
      tokens.push(ExprToken::Operand(self.binary_operand(multiplicative)?));
    }

    Ok(collapse(tokens))
  }

  fn binary_operand(&mut self, multiplicative: bool) -> Result<Node, ParseError> {
    if multiplicative {
      self.operand()
    } else {
      self.binary_run(true)
    }
  }

  fn operator(&mut self, multiplicative: bool) -> Option<Operator> {
    self.skip_newline_in_brackets();

    let operator = match self.current_kind() {
      TokenKind::Plus => Operator::Add,
      TokenKind::Minus => Operator::Subtract,
      TokenKind::Star => Operator::Multiply,
      TokenKind::Slash => Operator::Divide,
      _ => return None,
    };

    (operator.is_multiplicative() == multiplicative).then_some(operator)
  }

  fn operand(&mut self) -> Result<Node, ParseError> {
    match self.current_kind() {
      TokenKind::Number => {
        let token = self.advance();
        let raw = self.text(token);
        let value = raw
          .parse()
          .map_err(|_| ParseError::InvalidNumber(token))?;

        Ok(Node::Number(Number {
          value,
          raw: raw.to_owned(),
          span: token.into(),
        }))
      }
      TokenKind::String if self.peek_kind() != TokenKind::Dot => Ok(Node::String(self.string()?)),
      TokenKind::Identifier | TokenKind::String => {
        let path = self.dot_path()?;

        match path.head {
          PathSegment::Ident(ident) if path.properties.is_empty() => Ok(Node::Ident(ident)),
          head => Ok(Node::DotPath(DotPath { head, ..path })),
        }
      }
      TokenKind::LeftParen => {
        let opening = self.advance();
        self.depth += 1;
        self.skip_newline();

        let inner = self.expression()?;

        self.skip_newline();
        let closing = self.expect(TokenKind::RightParen)?;
        self.depth -= 1;

        match inner {
          Node::Expr(mut expr) => {
            expr.span = Span::from(opening).merge(closing.into());
            Ok(Node::Expr(expr))
          }
          operand => Ok(operand),
        }
      }
      _ => Err(self.error_at_current(ParseError::ExpectedValue)),
    }
  }

  fn json_value(&mut self) -> Result<Node, ParseError> {
    match self.current_kind() {
      TokenKind::LeftCurly => Ok(Node::JsonObj(self.json_object()?)),
      TokenKind::LeftSquare => Ok(Node::List(self.json_list()?)),
      _ => self.expression(),
    }
  }

  fn json_object(&mut self) -> Result<JsonObj, ParseError> {
    let opening = self.expect(TokenKind::LeftCurly)?;
    self.depth += 1;

    let mut properties: ThinVec<JsonProperty> = ThinVec::new();
    let closing = loop {
      self.skip_newline();
      if self.current_kind() == TokenKind::RightCurly {
        break self.advance();
      }

      let key = self.dot_path()?;
      if let Some(previous) = properties.iter().find(|p| p.key.same_path(&key)) {
        return Err(ParseError::DuplicateKey {
          key: key.to_string(),
          span: key.span,
          previous: previous.key.span,
        });
      }

      self.skip_newline();
      self.expect(TokenKind::Colon)?;
      self.skip_newline();

      let value = self.json_value()?;
      properties.push(JsonProperty { key, value });

      self.separator(TokenKind::RightCurly)?;
    };

    self.depth -= 1;
    Ok(JsonObj {
      properties,
      span: Span::from(opening).merge(closing.into()),
    })
  }

  fn json_list(&mut self) -> Result<JsonList, ParseError> {
    let opening = self.expect(TokenKind::LeftSquare)?;
    self.depth += 1;

    let mut items = ThinVec::new();
    let closing = loop {
      self.skip_newline();
      if self.current_kind() == TokenKind::RightSquare {
        break self.advance();
      }

      items.push(self.json_value()?);
      self.separator(TokenKind::RightSquare)?;
    };

    self.depth -= 1;
    Ok(JsonList {
      items,
      span: Span::from(opening).merge(closing.into()),
    })
  }

  fn component(&mut self) -> Result<Component, ParseError> {
    let type_name = self.ident()?;
    self.expect(TokenKind::LeftParen)?;
    self.depth += 1;

    let mut args = ThinVec::new();
    let closing = loop {
      self.skip_newline();
      if self.current_kind() == TokenKind::RightParen {
        break self.advance();
      }

      args.push(self.component_argument()?);
      self.separator(TokenKind::RightParen)?;
    };

    self.depth -= 1;
    Ok(Component {
      span: type_name.span.merge(closing.into()),
      type_name,
      args,
    })
  }

  fn component_argument(&mut self) -> Result<ComponentCtorArg, ParseError> {
    let name = if self.current_kind() == TokenKind::Identifier
      && self.peek_kind() == TokenKind::Equal
    {
      let name = self.ident()?;
      self.advance();
      self.skip_newline();
      Some(name)
    } else {
      None
    };

    let value = self.json_value()?;
    let span = name
      .as_ref()
      .map_or(value.span(), |name| name.span.merge(value.span()));

    Ok(ComponentCtorArg { name, value, span })
  }

  fn connection(&mut self) -> Result<Connection, ParseError> {
    let mut connection = self.connection_atom()?;

    if self.current_kind() != TokenKind::RightArrow {
      return Err(self.error_at_current(|received| ParseError::Expected {
        expected: TokenKind::RightArrow,
        received,
      }));
    }

    self.connection_links(&mut connection)?;
    Ok(connection)
  }

  fn connection_chain(&mut self) -> Result<Connection, ParseError> {
    let mut connection = self.connection_atom()?;
    self.connection_links(&mut connection)?;
    Ok(connection)
  }

  fn connection_links(&mut self, connection: &mut Connection) -> Result<(), ParseError> {
    self.skip_newline_in_brackets();

    while self.current_kind() == TokenKind::RightArrow {
      self.advance();
      self.skip_newline();

      let next = self.connection_atom()?;
      connection.connect_to(next, &mut self.warnings);
      self.skip_newline_in_brackets();
    }

    Ok(())
  }

  fn connection_atom(&mut self) -> Result<Connection, ParseError> {
    if self.current_kind() != TokenKind::LeftSquare {
      return Ok(Connection::atom(self.ident()?));
    }

    let opening = self.advance();
    self.depth += 1;

    let mut chains = Vec::new();
    let closing = loop {
      self.skip_newline();
      if self.current_kind() == TokenKind::RightSquare {
        let closing = self.advance();

        if chains.is_empty() {
          return Err(ParseError::EmptyConnectionList(
            Span::from(opening).merge(closing.into()),
          ));
        }
        break closing;
      }

      chains.push(self.connection_chain()?);
      self.separator(TokenKind::RightSquare)?;
    };

    self.depth -= 1;
    let mut group = Connection::merge_all(chains, &mut self.warnings);
    group.span = Span::from(opening).merge(closing.into());
    Ok(group)
  }
}

/// Turn a list of expression tokens into a node, a single operand is left unwrapped
fn collapse(mut tokens: ThinVec<ExprToken>) -> Node {
  if tokens.len() == 1
    && let Some(ExprToken::Operand(operand)) = tokens.pop()
  {
    return operand;
  }

  let span = tokens
    .iter()
    .map(|token| match token {
      ExprToken::Operand(node) => node.span(),
      ExprToken::Operator(_, span) => *span,
    })
    .fold(Span::default(), Span::merge);

  Node::Expr(Expr { tokens, span })
}

/// An error found whilst parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// Expected a token of a certain kind
  Expected {
    /// Expected Token Kind to be
    expected: TokenKind,
    /// Received this Token instead
    received: Token,
  },
  /// Expected a Value
  ExpectedValue(Token),
  /// Expected a Statement
  ExpectedStatement(Token),
  /// Unknown Character
  UnknownCharacter(Token),
  /// Unterminated String Literal
  UnterminatedString(Token),
  /// Number can't be represented
  InvalidNumber(Token),
  /// Missing Comma between items
  MissingComma(Token),
  /// Duplicate Key in Object
  DuplicateKey {
    /// The key which is repeated
    key: String,
    /// The repeated key
    span: Span,
    /// The first use of the key
    previous: Span,
  },
  /// Component assigned to a property instead of a variable
  ComponentBoundToPath {
    /// The left hand side of the assignment
    path: Span,
    /// The component constructor
    component: Span,
  },
  /// Connection list with no items, `[]`
  EmptyConnectionList(Span),
}
impl ParseError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> String {
    match self {
      Self::Expected { expected, .. } => format!("Expected {expected}"),
      Self::ExpectedValue(_) => "Expected Value".into(),
      Self::ExpectedStatement(_) => "Expected Statement".into(),
      Self::UnknownCharacter(_) => "Unknown Character".into(),
      Self::UnterminatedString(_) => "Unterminated String".into(),
      Self::InvalidNumber(_) => "Invalid Number".into(),
      Self::MissingComma(_) => "Missing Comma".into(),
      Self::DuplicateKey { .. } => "Duplicate Key".into(),
      Self::ComponentBoundToPath { .. } => "Component Assigned to Property".into(),
      Self::EmptyConnectionList(_) => "Empty Connection List".into(),
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::Expected { expected, received } => {
        format!("expected {expected} but got {}", received.kind)
      }
      Self::ExpectedValue(t) => format!("expected value but got {}", t.kind),
      Self::ExpectedStatement(t) => format!("expected statement but got {}", t.kind),
      Self::UnknownCharacter(_) => "got unknown character".into(),
      Self::UnterminatedString(_) => "missing closing quote for string".into(),
      Self::InvalidNumber(_) => "number literal is not a valid number".into(),
      Self::MissingComma(_) => "expected there to be a comma between items".into(),
      Self::DuplicateKey { key, .. } => format!("the key `{key}` is already in the object"),
      Self::ComponentBoundToPath { .. } => {
        "components can only be assigned to a variable, not a property".into()
      }
      Self::EmptyConnectionList(_) => "a connection list must contain a component".into(),
    }
  }

  /// A suggestion for how to fix the error
  #[must_use]
  pub fn suggestion(&self) -> Option<String> {
    match self {
      Self::ExpectedStatement(_) => {
        Some("a statement is an assignment `a = 1` or a connection `a -> b`".into())
      }
      Self::DuplicateKey { key, .. } => Some(format!("remove one of the `{key}` properties")),
      Self::ComponentBoundToPath { .. } => {
        Some("assign the component to a name, e.g. `source = KafkaSource()`".into())
      }
      _ => None,
    }
  }

  /// The title and message of the error in a combined string
  #[must_use]
  pub fn full_message(&self) -> String {
    let mut message = self.title();
    message.push('\n');
    message.push_str(&self.message());

    if let Some(suggestion) = self.suggestion() {
      message.push('\n');
      message.push_str("hint: ");
      message.push_str(&suggestion);
    }

    message
  }

  /// The location of the error
  pub fn span(&self) -> Span {
    match self {
      Self::Expected { received, .. } => received.into(),
      Self::ExpectedValue(token)
      | Self::ExpectedStatement(token)
      | Self::UnknownCharacter(token)
      | Self::UnterminatedString(token)
      | Self::InvalidNumber(token)
      | Self::MissingComma(token) => token.into(),
      Self::DuplicateKey { span, .. } => *span,
      Self::ComponentBoundToPath { path, component } => path.merge(*component),
      Self::EmptyConnectionList(span) => *span,
    }
  }
}
impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.full_message())
  }
}
impl error::Error for ParseError {}

/// A recoverable problem found whilst parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
  /// The same connection is made more than once
  DuplicateConnection {
    /// The component the connection is from
    from: String,
    /// The component the connection is to
    to: String,
    /// The repeated connection
    span: Span,
  },
}
impl ParseWarning {
  /// The title of the warning
  #[must_use]
  pub fn title(&self) -> String {
    match self {
      Self::DuplicateConnection { .. } => "Duplicate Connection".into(),
    }
  }

  /// The body of the warning describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::DuplicateConnection { from, to, .. } => {
        format!("`{from}` is already connected to `{to}`, the repeat is ignored")
      }
    }
  }

  /// A suggestion for how to fix the warning
  #[must_use]
  pub fn suggestion(&self) -> Option<String> {
    match self {
      Self::DuplicateConnection { .. } => Some("remove the repeated connection".into()),
    }
  }

  /// The title and message of the warning in a combined string
  #[must_use]
  pub fn full_message(&self) -> String {
    format!("{}\n{}", self.title(), self.message())
  }

  /// The location of the warning
  pub fn span(&self) -> Span {
    match self {
      Self::DuplicateConnection { span, .. } => *span,
    }
  }
}
impl fmt::Display for ParseWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.full_message())
  }
}
