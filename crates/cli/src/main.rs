//! # Monanas
//! Compiles Banana files into pipelines of anomaly detection components.
//!
//! Complete with a type checker, dead component removal, and an interactive REPL.

#![allow(clippy::print_stdout)]

mod commands;
mod diagnostics;
mod driver;

use banana_components::ConnectionRules;
use banana_interpreter::Config;
use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::CommandStatus;
use owo_colors::*;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const STYLES: Styles = Styles::styled()
  .usage(Style::new().italic())
  .header(AnsiColor::BrightYellow.on_default().bold());

fn coloured_header() -> String {
  format!(
    "{} {}",
    "Monanas".fg::<owo_colors::colors::css::Gold>().bold(),
    "(v0.4.0)".italic().dimmed()
  )
}

fn about() -> String {
  format!(
    "{}\nBuild anomaly detection pipelines from Banana files.",
    coloured_header()
  )
}

#[derive(Parser)]
#[clap(
  name = "monanas",
  version,
  about = about(),
  styles = STYLES,
  disable_help_subcommand = true,
)]
enum App {
  /// Compiles a Banana file and starts its pipeline
  Run {
    /// The file to run
    file: String,
    #[command(flatten)]
    options: Options,
  },

  /// Start an interactive Read-Eval-Print Loop (REPL)
  Repl {
    #[command(flatten)]
    options: Options,
  },

  /// Checks the file for type errors
  Typecheck {
    /// The file to typecheck
    file: String,
    #[command(flatten)]
    options: Options,
  },

  /// Lists the components which can be used
  Components,

  /// Prints debugging information
  Print {
    #[command(subcommand)]
    command: PrintCommand,
  },
}

#[derive(Args, Clone, Copy)]
struct Options {
  /// Which kinds of component may be connected to each other
  #[clap(long, value_enum, default_value_t = Rules::Legacy)]
  rules: Rules,
  /// How errors and warnings are reported
  #[clap(long, value_enum, default_value_t = Format::Human)]
  format: Format,
  /// Treat warnings as errors
  #[clap(long)]
  deny_warnings: bool,
}
impl Options {
  fn config(self) -> Config {
    Config {
      connection_rules: match self.rules {
        Rules::Legacy => ConnectionRules::legacy(),
        Rules::Strict => ConnectionRules::strict(),
      },
      deny_warnings: self.deny_warnings,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rules {
  /// An ingestor may feed a sink directly
  Legacy,
  /// An ingestor must feed a model
  Strict,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
  /// Messages with code frames
  Human,
  /// A JSON object, for editors and other tools
  Json,
}

#[derive(Subcommand)]
enum PrintCommand {
  /// Displays the tokens in the file
  Tokens {
    /// The file to print
    file: String,
  },
  /// Displays the Abstract Syntax Tree
  Ast {
    /// The file to print
    file: String,
  },
  /// Displays the configuration of every component
  Config {
    /// The file to print
    file: String,
    #[command(flatten)]
    options: Options,
  },
}

fn init_logging() {
  let filter = EnvFilter::try_from_env("MONANAS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
}

fn main() -> process::ExitCode {
  let args = App::parse();
  init_logging();

  let result = match args {
    App::Run { file, options } => commands::run(&file, options),
    App::Repl { options } => commands::repl(options),
    App::Typecheck { file, options } => commands::typecheck(&file, options),
    App::Components => Ok(commands::components()),
    App::Print { command } => match command {
      PrintCommand::Tokens { file } => commands::print_tokens(&file),
      PrintCommand::Ast { file } => commands::print_ast(&file),
      PrintCommand::Config { file, options } => commands::print_config(&file, options),
    },
  };

  match result {
    Ok(CommandStatus::Success) => process::ExitCode::from(0),
    Ok(CommandStatus::Failure) => process::ExitCode::from(1),
    Err(()) => process::ExitCode::from(2),
  }
}
