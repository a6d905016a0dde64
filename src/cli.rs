//! Command-line entry point and argument definitions.

use std::process;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::errors::{print_error, CalcError};
use crate::logging::FileLog;
use crate::observer::{AutoSaveObserver, LoggingObserver};
use crate::ops::Op;
use crate::persist::{CsvHistoryFile, HistorySink};
use crate::repl;
use crate::session::Session;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "An interactive command-line calculator with undo/redo and persisted history."
)]
pub struct TallyArgs {
    #[command(subcommand)]
    pub command: Option<ArgsCommand>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Start the interactive calculator (the default).
    Repl,
    /// Evaluate a single operation and exit.
    Eval {
        /// Operation name, e.g. `add`.
        operation: String,
        /// First operand.
        #[arg(allow_hyphen_values = true)]
        a: String,
        /// Second operand.
        #[arg(allow_hyphen_values = true)]
        b: String,
    },
    /// Print the persisted history table.
    History {
        /// Emit the history as JSON instead of a numbered listing.
        #[arg(long)]
        json: bool,
    },
    /// List all supported operations.
    Ops,
}

/// The main entry point for the CLI.
pub fn run() {
    let args = TallyArgs::parse();
    let config = Config::from_env().unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    });

    match args.command.unwrap_or(ArgsCommand::Repl) {
        ArgsCommand::Repl => {
            let mut session = build_session_or_exit(config);
            repl::run_repl(&mut session);
        }

        ArgsCommand::Eval { operation, a, b } => {
            let precision = config.precision;
            let mut session = build_session_or_exit(config);
            let outcome = repl::parse_operands(&[a.as_str(), b.as_str()])
                .and_then(|(a, b)| session.compute(&operation, a, b));
            match outcome {
                Ok(result) => repl::print_result(result, precision),
                Err(e) => {
                    print_error(e);
                    process::exit(1);
                }
            }
        }

        ArgsCommand::History { json } => {
            if let Err(e) = print_persisted_history(&config, json) {
                print_error(e);
                process::exit(1);
            }
        }

        ArgsCommand::Ops => {
            for op in Op::ALL {
                println!("  {}", op);
            }
        }
    }
}

/// Wires a session with the configured observers: logging always, auto-save
/// when enabled. Registration order fixes notification order.
fn build_session(config: Config) -> Result<Session, CalcError> {
    let sink = CsvHistoryFile::new(config.history_file())?;
    let log = FileLog::new(config.log_file())?;
    let auto_save = if config.auto_save {
        Some(CsvHistoryFile::new(config.history_file())?)
    } else {
        None
    };

    let mut session = Session::new(config, Box::new(sink));
    session.register_observer(Box::new(LoggingObserver::new(Box::new(log))));
    if let Some(sink) = auto_save {
        session.register_observer(Box::new(AutoSaveObserver::new(Box::new(sink))));
    }
    Ok(session)
}

fn build_session_or_exit(config: Config) -> Session {
    build_session(config).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    })
}

fn print_persisted_history(config: &Config, json: bool) -> Result<(), CalcError> {
    let mut sink = CsvHistoryFile::new(config.history_file())?;
    let Some(entries) = sink.load()? else {
        println!("No saved history found.");
        return Ok(());
    };

    if json {
        let encoded =
            serde_json::to_string_pretty(&entries).map_err(|e| CalcError::HistoryPersist {
                message: format!("failed to encode history as JSON: {}", e),
                source: None,
            })?;
        println!("{}", encoded);
    } else {
        repl::print_history(&entries, config.precision);
    }
    Ok(())
}
