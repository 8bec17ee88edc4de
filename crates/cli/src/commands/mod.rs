use super::diagnostics::{HumanEmitter, Message, Output, Reporter};
use super::driver::StdoutDriver;
use super::{Format, Options};

use banana_components::Registry;
use banana_interpreter::{MachineEmitter, PassManager, RecordingDriver};
use banana_syntax::tokenise;

use anstream::{eprintln, print, println};
use owo_colors::OwoColorize;
use std::fs;

pub enum CommandStatus {
  /// Command was successful, no errors occurred
  Success,
  /// Command ran, but errors were found
  Failure,
}

fn read_file(filename: &str) -> Result<String, ()> {
  if filename == "-" {
    return read_stdin();
  }

  match fs::read_to_string(filename) {
    Ok(file) if file.is_empty() => {
      eprintln!("{}", Message::warning(format!("Empty file `{filename}`")));
      Err(())
    }
    Ok(file) if file.len() > u32::MAX as usize => {
      eprintln!("{}", Message::error("File too large - max size 4GB".into()));
      Err(())
    }
    Ok(file) => Ok(file),
    Err(_) => {
      eprintln!("{}", Message::error(format!("File not found `{filename}`")));
      Err(())
    }
  }
}

fn read_stdin() -> Result<String, ()> {
  use std::io::{self, Read};

  let mut buffer = String::new();
  let mut stdin = io::stdin().lock();

  match stdin.read_to_string(&mut buffer) {
    Ok(_) if buffer.len() > u32::MAX as usize => {
      eprintln!("{}", Message::error("File too large - max size 4GB".into()));
      Err(())
    }
    Ok(_) => Ok(buffer),
    Err(_) => {
      eprintln!("{}", Message::error("Problem Reading from STDIN".into()));
      Err(())
    }
  }
}

fn reporter(filename: &str, format: Format, output: Output) -> Reporter<'_> {
  match format {
    Format::Human => Reporter::Human(HumanEmitter::new(filename, output)),
    Format::Json => Reporter::Machine(MachineEmitter::new()),
  }
}

fn status(success: bool) -> CommandStatus {
  if success {
    CommandStatus::Success
  } else {
    CommandStatus::Failure
  }
}

pub fn run(filename: &str, options: Options) -> Result<CommandStatus, ()> {
  let source = read_file(filename)?;
  let registry = Registry::builtin();
  let manager = PassManager::new(&registry, options.config());

  let mut reporter = reporter(filename, options.format, Output::Stderr);
  let mut driver = StdoutDriver::new(options.format == Format::Json);
  let result = manager.execute(&source, &mut driver, &mut reporter);

  if let Some(mut report) = reporter.json() {
    if let Some(pipeline) = driver.pipeline() {
      report["pipeline"] = pipeline.to_json();
    }
    println!("{report}");
  }

  Ok(status(result.is_ok()))
}

pub fn typecheck(filename: &str, options: Options) -> Result<CommandStatus, ()> {
  let source = read_file(filename)?;
  let registry = Registry::builtin();
  let manager = PassManager::new(&registry, options.config());

  let mut reporter = reporter(filename, options.format, Output::Stdout);
  let result = manager.typecheck_only(&source, &mut reporter);

  if let Some(mut report) = reporter.json() {
    if let Ok(table) = &result {
      report["types"] = table.to_json();
    }
    println!("{report}");
  }

  let denied = options.deny_warnings && reporter.has_warnings();
  Ok(status(result.is_ok() && !denied))
}

pub fn components() -> CommandStatus {
  let registry = Registry::builtin();

  for class in registry.classes() {
    println!(
      "{} {}",
      class.name().bold(),
      format!("({})", class.kind()).dimmed()
    );

    for param in class.params() {
      println!(
        "  {}: {} {}",
        param.name,
        param.type_.italic(),
        format!("= {}", param.default).dimmed()
      );
    }
  }

  CommandStatus::Success
}

pub fn print_tokens(filename: &str) -> Result<CommandStatus, ()> {
  let source = read_file(filename)?;
  let filename = if filename == "-" { "STDIN" } else { filename };

  println!("    ╭─[Tokens: {filename}]");
  for token in tokenise(&source) {
    print!("{:>3} │ {}", token.start, token.kind);
    if !token.kind.has_fixed_length() {
      print!(" (length: {})", token.length);
    }
    println!();
  }
  println!("────╯");

  Ok(CommandStatus::Success)
}

pub fn print_ast(filename: &str) -> Result<CommandStatus, ()> {
  let source = read_file(filename)?;
  let ast = banana_syntax::parse(source);

  if !ast.is_valid() {
    let mut emitter = HumanEmitter::new(filename, Output::Stderr);
    for error in &ast.errors {
      banana_interpreter::Emitter::emit(&mut emitter, &ast.source, error.into());
    }
    println!();
  }

  let filename = if filename == "-" { "STDIN" } else { filename };
  println!("╭─[Abstract Syntax Tree: {filename}]");
  print!("{ast}");
  println!("╯");

  Ok(CommandStatus::Success)
}

pub fn print_config(filename: &str, options: Options) -> Result<CommandStatus, ()> {
  let source = read_file(filename)?;
  let registry = Registry::builtin();
  let manager = PassManager::new(&registry, options.config());

  let mut reporter = reporter(filename, options.format, Output::Stderr);
  let mut driver = RecordingDriver::default();
  let result = manager.execute(&source, &mut driver, &mut reporter);

  match (result, reporter.json()) {
    (Ok(context), None) => println!("{:#}", context.to_json()),
    (Ok(context), Some(mut report)) => {
      report["config"] = context.to_json();
      println!("{report}");
    }
    (Err(_), Some(report)) => println!("{report}"),
    (Err(_), None) => return Ok(CommandStatus::Failure),
  }

  Ok(status(driver.pipeline.is_some()))
}

mod repl;
pub use repl::repl;
