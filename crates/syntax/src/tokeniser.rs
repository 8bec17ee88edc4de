use crate::span::Span;
use std::{fmt, iter};

/// Convert a string of source code into an [Iterator] of [Token]s
pub struct Tokeniser<'source> {
  /// The source code to tokenise
  source: &'source [u8],
  /// The current position in the source code
  position: usize,
  /// Has the end of file token been emitted?
  finished: bool,
}
impl<'source> From<&'source str> for Tokeniser<'source> {
  /// Create a new [Tokeniser] from a source code string
  ///
  /// # Panics
  /// Panics if the length of the source code is greater than `u32::MAX`
  fn from(value: &'source str) -> Self {
    assert!(value.len() < u32::MAX as usize);

    Self {
      source: value.as_ref(),
      position: 0,
      finished: false,
    }
  }
}
impl Tokeniser<'_> {
  /// Has the end of the source code been reached?
  fn is_end(&self, position: usize) -> bool {
    position >= self.source.len()
  }

  /// Get the next token from the source code
  fn get_next_token(&mut self) -> (TokenKind, usize) {
    if self.is_end(self.position) {
      return (TokenKind::EndOfFile, 0);
    }

    let character = &self.source[self.position];
    let next_character = self.source.get(self.position + 1);

    match character {
      // Whitespace + Comments
      b' ' | b'\r' | b'\t' => {
        self.position += 1;
        self.get_next_token()
      }
      b'\n' => (TokenKind::EndOfLine, 1),
      b'#' => self.comment(),

      // Values
      quote @ (b'"' | b'\'') => self.string(*quote),
      b'0'..=b'9' => self.number(),
      b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.identifier(),

      // Brackets + Separators
      b'(' => (TokenKind::LeftParen, 1),
      b')' => (TokenKind::RightParen, 1),
      b'{' => (TokenKind::LeftCurly, 1),
      b'}' => (TokenKind::RightCurly, 1),
      b'[' => (TokenKind::LeftSquare, 1),
      b']' => (TokenKind::RightSquare, 1),
      b',' => (TokenKind::Comma, 1),
      b':' => (TokenKind::Colon, 1),
      b'.' => (TokenKind::Dot, 1),
      b'=' => (TokenKind::Equal, 1),

      // Connections
      b'-' if matches!(next_character, Some(b'>')) => (TokenKind::RightArrow, 2),

      // Operators
      b'+' => (TokenKind::Plus, 1),
      b'-' => (TokenKind::Minus, 1),
      b'/' => (TokenKind::Slash, 1),
      b'*' => (TokenKind::Star, 1),

      // Unknown character
      x if (x & 0b1111_0000) == 0b1111_0000 => (TokenKind::Unknown, 4),
      x if (x & 0b1110_0000) == 0b1110_0000 => (TokenKind::Unknown, 3),
      x if (x & 0b1100_0000) == 0b1100_0000 => (TokenKind::Unknown, 2),
      _ => (TokenKind::Unknown, 1),
    }
  }

  /// Skip to the end of a comment token (a newline)
  fn comment(&self) -> (TokenKind, usize) {
    let length = self.source[self.position..]
      .iter()
      .take_while(|c| **c != b'\n')
      .count();

    (TokenKind::Comment, length)
  }

  /// Go to the end of a string token, the closing quote
  ///
  /// Strings can't span lines, a newline ends the string as unterminated
  fn string(&mut self, quote: u8) -> (TokenKind, usize) {
    let mut pos = self.position + 1;

    loop {
      if self.is_end(pos) || self.source[pos] == b'\n' {
        break (TokenKind::UnterminatedString, pos - self.position);
      } else if self.source[pos] == quote {
        break (TokenKind::String, pos - self.position + 1);
      }

      pos += 1;
    }
  }

  fn digits_from(&self, position: usize) -> usize {
    self.source[position.min(self.source.len())..]
      .iter()
      .take_while(|c| c.is_ascii_digit())
      .count()
  }

  /// Get a number token, `\d+(\.\d*)?([eE]\d+)?`
  fn number(&self) -> (TokenKind, usize) {
    let mut position = self.position + 1;
    position += self.digits_from(position);

    // Match a decimal point, and the digits after it
    if !self.is_end(position) && self.source[position] == b'.' {
      position += 1;
      position += self.digits_from(position);
    }

    // Match an exponent, only if it has digits
    if !self.is_end(position + 1)
      && matches!(self.source[position], b'e' | b'E')
      && self.source[position + 1].is_ascii_digit()
    {
      position += 1;
      position += self.digits_from(position);
    }

    (TokenKind::Number, position - self.position)
  }

  /// Get an identifier token, a sequence of [a-zA-Z0-9_]
  fn identifier(&self) -> (TokenKind, usize) {
    let length = self.source[self.position..]
      .iter()
      .take_while(|c| c.is_ascii_alphanumeric() || **c == b'_')
      .count();

    (TokenKind::Identifier, length)
  }
}
impl Iterator for Tokeniser<'_> {
  type Item = Token;

  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }

    let (kind, len) = self.get_next_token();
    let start = self.position;
    self.position += len;

    if kind == TokenKind::EndOfFile {
      self.finished = true;
    }

    Some(Token {
      kind,
      start: u32::try_from(start).unwrap_or(u32::MAX),
      length: u32::try_from(len).unwrap_or(u32::MAX),
    })
  }
}
impl iter::FusedIterator for Tokeniser<'_> {}

/// A Token of source code, a lexeme of the language
///
/// With the type of token, start position and length of the token in the source code
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Token {
  /// The type of the token
  pub kind: TokenKind,
  /// The byte offset the token starts at
  pub start: u32,
  /// The length of the token in bytes
  pub length: u32,
}
impl Token {
  /// The source text of the token
  #[must_use]
  pub fn text(self, source: &str) -> &str {
    Span::from(self).source_text(source)
  }
}
impl From<Token> for Span {
  fn from(token: Token) -> Self {
    Self {
      start: token.start,
      end: token.start + token.length,
    }
  }
}
impl From<&Token> for Span {
  fn from(token: &Token) -> Self {
    Self::from(*token)
  }
}

/// The type of a token
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum TokenKind {
  // Brackets
  /// `(`
  LeftParen,
  /// `)`
  RightParen,
  /// `{`
  LeftCurly,
  /// `}`
  RightCurly,
  /// `[`
  LeftSquare,
  /// `]`
  RightSquare,

  // Separators
  /// `,`
  Comma,
  /// `:`
  Colon,
  /// `.`
  Dot,
  /// `=`
  Equal,
  /// `->`
  RightArrow,

  // Operators
  /// `-`
  Minus,
  /// `+`
  Plus,
  /// `/`
  Slash,
  /// `*`
  Star,

  // Values
  /// A identifier for a variable, a sequence of [a-zA-Z0-9_]
  Identifier,
  /// A number, with possible decimal part and exponent
  Number,
  /// A string, any characters between `'` or `"`
  String,

  // Whitespace + Comments
  /// A comment, consisting of `#` then any number of characters before a newline
  Comment,
  /// The end of a line, indicating a `\n`
  EndOfLine,
  /// A token to indicate the end of the file
  EndOfFile,

  // Error
  /// An unknown character, not known to fit in a [`TokenKind`]
  #[default]
  Unknown,
  /// A string where the end of the line has been reached, thus unterminated
  UnterminatedString,
}
impl TokenKind {
  /// Is the token always the same length?
  #[must_use]
  pub fn has_fixed_length(self) -> bool {
    !matches!(
      self,
      Self::Identifier
        | Self::Number
        | Self::String
        | Self::Comment
        | Self::Unknown
        | Self::UnterminatedString
    )
  }
}
impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      // Brackets
      Self::LeftParen => write!(f, "("),
      Self::RightParen => write!(f, ")"),
      Self::LeftCurly => write!(f, "{{"),
      Self::RightCurly => write!(f, "}}"),
      Self::LeftSquare => write!(f, "["),
      Self::RightSquare => write!(f, "]"),

      // Separators
      Self::Comma => write!(f, ","),
      Self::Colon => write!(f, ":"),
      Self::Dot => write!(f, "."),
      Self::Equal => write!(f, "="),
      Self::RightArrow => write!(f, "->"),

      // Operators
      Self::Minus => write!(f, "-"),
      Self::Plus => write!(f, "+"),
      Self::Slash => write!(f, "/"),
      Self::Star => write!(f, "*"),

      // With Values
      Self::Identifier => write!(f, "Identifier"),
      Self::Number => write!(f, "Number"),
      Self::String => write!(f, "String"),

      // Whitespace + Comments
      Self::Comment => write!(f, "Comment"),
      Self::EndOfLine => write!(f, "New Line"),
      Self::EndOfFile => write!(f, "End of File"),

      // Errors
      Self::Unknown => write!(f, "Unknown Character"),
      Self::UnterminatedString => write!(f, "Unterminated String"),
    }
  }
}
