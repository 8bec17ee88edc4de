use super::{CommandStatus, reporter};
use crate::diagnostics::{Message, Output, highlight_source};
use crate::driver::StdoutDriver;
use crate::{Format, Options};

use banana_components::Registry;
use banana_interpreter::PassManager;

use anstream::{eprintln, println};
use owo_colors::OwoColorize;

const HELP: &str = "\
:run    compile the program and start its pipeline
:types  show the type of every variable
:show   show the program entered so far
:clear  forget the program entered so far
:help   show this message";

/// The statements entered so far, checked as each line is added
struct Session<'a> {
  manager: PassManager<'a>,
  format: Format,
  program: String,
}
impl Session<'_> {
  /// Add a line if the program still type checks with it
  fn add_line(&mut self, line: &str) {
    let mut candidate = self.program.clone();
    candidate.push_str(line);
    candidate.push('\n');

    let mut reporter = reporter("REPL", self.format, Output::Stderr);
    if self.manager.typecheck_only(&candidate, &mut reporter).is_ok() {
      self.program = candidate;
    } else if let Some(report) = reporter.json() {
      eprintln!("{report}");
    }
  }

  fn run(&self) {
    let mut reporter = reporter("REPL", self.format, Output::Stderr);
    let mut driver = StdoutDriver::new(false);

    if self
      .manager
      .execute(&self.program, &mut driver, &mut reporter)
      .is_err()
      && let Some(report) = reporter.json()
    {
      eprintln!("{report}");
    }
  }

  fn types(&self) {
    let mut reporter = reporter("REPL", self.format, Output::Stderr);

    if let Ok(table) = self.manager.typecheck_only(&self.program, &mut reporter) {
      for (name, type_) in table.final_types() {
        println!("{name}: {}", type_.italic());
      }
    }
  }

  fn show(&self) {
    let mut highlighted = String::new();
    if highlight_source(&mut highlighted, &self.program).is_ok() {
      println!("{highlighted}");
    }
  }
}

pub fn repl(options: Options) -> Result<CommandStatus, ()> {
  println!("{}", crate::coloured_header());
  println!("{}", "exit using ctrl+d, or ctrl+c. type :help for commands".dimmed());

  let registry = Registry::builtin();
  let mut session = Session {
    manager: PassManager::new(&registry, options.config()),
    format: options.format,
    program: String::new(),
  };

  let Ok(mut rl) = rustyline::DefaultEditor::new() else {
    eprintln!("{}", Message::error("Problem starting the REPL".into()));
    return Err(());
  };

  while let Ok(line) = rl.readline(">> ") {
    _ = rl.add_history_entry(line.as_str());

    match line.trim() {
      "" => {}
      ":run" => session.run(),
      ":types" => session.types(),
      ":show" => session.show(),
      ":clear" => session.program.clear(),
      ":help" => println!("{HELP}"),
      command if command.starts_with(':') => {
        eprintln!("{}", Message::error(format!("Unknown command `{command}`")));
      }
      _ => session.add_line(&line),
    }
  }

  Ok(CommandStatus::Success)
}
