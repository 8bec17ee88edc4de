use banana_interpreter::{Diagnostic, Emitter, MachineEmitter};
use banana_syntax::{LineIndex, Span};
use owo_colors::{OwoColorize, Style};
use std::fmt;

use anstream::{eprintln, println};

#[derive(Debug)]
pub enum Severity {
  Error,
  Warning,
}
pub struct Message {
  pub title: String,
  pub body: String,
  pub hint: Option<String>,
  pub severity: Severity,
}
impl Message {
  pub fn error(message: String) -> Self {
    Self {
      title: message,
      body: String::new(),
      hint: None,
      severity: Severity::Error,
    }
  }
  pub fn warning(message: String) -> Self {
    Self {
      title: message,
      body: String::new(),
      hint: None,
      severity: Severity::Warning,
    }
  }
}
impl fmt::Display for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.severity {
      Severity::Error => write!(f, "{}", "✕ Error".bold().red()),
      Severity::Warning => write!(f, "{}", "⚠ Warning".bold().yellow()),
    }?;
    writeln!(f, "{} {}", ":".bold(), &self.title.bold())?;

    if !self.body.is_empty() {
      writeln!(f, "{}", &self.body)?;
    }

    if let Some(hint) = &self.hint {
      writeln!(f, "{} {}", "hint:".italic().cyan(), hint)?;
    }

    Ok(())
  }
}
impl From<&Diagnostic> for Message {
  fn from(diagnostic: &Diagnostic) -> Self {
    Self {
      title: diagnostic.title.clone(),
      body: diagnostic.message.clone(),
      hint: diagnostic.hint.clone(),
      severity: if diagnostic.is_warning() {
        Severity::Warning
      } else {
        Severity::Error
      },
    }
  }
}

pub struct CodeFrame<'a> {
  title: &'a str,
  source: &'a str,
  span: Span,

  lines: LineIndex,
}
impl<'a> CodeFrame<'a> {
  pub fn new(title: &'a str, source: &'a str, span: Span) -> Self {
    Self {
      title: if title == "-" { "STDIN" } else { title },
      source,
      span,
      lines: LineIndex::from_source(source),
    }
  }
}
impl fmt::Display for CodeFrame<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let start_line = self.lines.line(self.span).max(1);
    let end_line = self.lines.final_line(self.span).max(start_line);

    writeln!(
      f,
      "    {}{}{}{}{}",
      "╭─[".dimmed(),
      self.title,
      ":".dimmed(),
      start_line,
      "]".dimmed()
    )?;

    for line in start_line..=end_line {
      let line_text = self.lines.line_span(line).source_text(self.source);
      write!(f, "{line:>3} {}", "│".dimmed())?;
      if !line_text.is_empty() {
        write!(f, " ")?;
      }
      highlight_source(f, line_text)?;
      if !line_text.ends_with('\n') {
        writeln!(f)?;
      }
    }

    write!(f, "{}", "────╯".dimmed())
  }
}

pub fn highlight_source(output: &mut dyn fmt::Write, source: &str) -> fmt::Result {
  use banana_syntax::{TokenKind, tokenise};

  let mut last = 0;
  for token in tokenise(source) {
    // if there is a gap between tokens, add spaces for the gap
    if token.start != last {
      for _ in 0..(token.start - last) {
        write!(output, " ")?;
      }
    }

    let style = match token.kind {
      TokenKind::Number => Style::new().blue(),
      TokenKind::String | TokenKind::UnterminatedString => Style::new().green(),
      TokenKind::RightArrow => Style::new().cyan(),
      TokenKind::Comment => Style::new().dimmed(),
      TokenKind::Unknown => Style::new().red(),
      _ => Style::new(),
    };
    let token_text = Span::from(token).source_text(source);
    write!(output, "{}", token_text.style(style))?;

    last = token.start + token.length;
  }

  Ok(())
}

/// Where human readable diagnostics are written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
  Stdout,
  Stderr,
}

/// Prints each diagnostic as a message with a code frame, as soon as it is found
pub struct HumanEmitter<'a> {
  filename: &'a str,
  output: Output,
  pub errors: usize,
  pub warnings: usize,
}
impl<'a> HumanEmitter<'a> {
  pub fn new(filename: &'a str, output: Output) -> Self {
    Self {
      filename,
      output,
      errors: 0,
      warnings: 0,
    }
  }
}
impl Emitter for HumanEmitter<'_> {
  fn emit(&mut self, source: &str, diagnostic: Diagnostic) {
    if diagnostic.is_warning() {
      self.warnings += 1;
    } else {
      self.errors += 1;
    }

    let message = Message::from(&diagnostic);
    let frame = CodeFrame::new(self.filename, source, diagnostic.span);

    match self.output {
      Output::Stdout => {
        println!("{message}");
        println!("{frame}");
      }
      Output::Stderr => {
        eprintln!("{message}");
        eprintln!("{frame}");
      }
    }
  }
}

/// Reports diagnostics in the format chosen on the command line
pub enum Reporter<'a> {
  Human(HumanEmitter<'a>),
  Machine(MachineEmitter),
}
impl Reporter<'_> {
  pub fn has_warnings(&self) -> bool {
    match self {
      Self::Human(emitter) => emitter.warnings > 0,
      Self::Machine(emitter) => !emitter.warnings.is_empty(),
    }
  }

  /// The JSON report, if diagnostics are collected rather than printed
  pub fn json(&self) -> Option<serde_json::Value> {
    match self {
      Self::Human(_) => None,
      Self::Machine(emitter) => Some(emitter.to_json()),
    }
  }
}
impl Emitter for Reporter<'_> {
  fn emit(&mut self, source: &str, diagnostic: Diagnostic) {
    match self {
      Self::Human(emitter) => emitter.emit(source, diagnostic),
      Self::Machine(emitter) => emitter.emit(source, diagnostic),
    }
  }
}
