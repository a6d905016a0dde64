//! The interactive read-eval-print loop.
//!
//! One command is fully processed before the next is read. Every error is
//! caught here at the loop boundary and rendered as a diagnostic; none
//! terminate the session.

use std::io::{self, Write};

use im::Vector;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::{print_error, CalcError};
use crate::history::HistoryEntry;
use crate::session::Session;

/// Main REPL entry point.
pub fn run_repl(session: &mut Session) {
    println!("tally v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.");
    println!();

    loop {
        print!("tally> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match dispatch_line(session, line) {
                    ReplCommand::Continue => continue,
                    ReplCommand::Quit => break,
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}

/// REPL command results.
enum ReplCommand {
    Continue,
    Quit,
}

fn dispatch_line(session: &mut Session, line: &str) -> ReplCommand {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, operands)) = words.split_first() else {
        return ReplCommand::Continue;
    };

    match command.to_ascii_lowercase().as_str() {
        "exit" | "quit" => {
            println!("Goodbye!");
            ReplCommand::Quit
        }
        "help" => {
            print_help();
            ReplCommand::Continue
        }
        "history" => {
            print_history(&session.history_view(), session.config().precision);
            ReplCommand::Continue
        }
        "undo" => {
            match session.undo() {
                Some(entries) => {
                    println!("Undid last operation.");
                    print_history(&entries, session.config().precision);
                }
                None => println!("Nothing to undo."),
            }
            ReplCommand::Continue
        }
        "redo" => {
            match session.redo() {
                Some(entries) => {
                    println!("Redid last undone operation.");
                    print_history(&entries, session.config().precision);
                }
                None => println!("Nothing to redo."),
            }
            ReplCommand::Continue
        }
        "save" => {
            match session.save_history() {
                Ok(()) => println!("History saved."),
                Err(e) => print_error(e),
            }
            ReplCommand::Continue
        }
        "load" => {
            match session.load_history() {
                Ok(true) => println!("History loaded."),
                Ok(false) => println!("No saved history found."),
                Err(e) => print_error(e),
            }
            ReplCommand::Continue
        }
        "clear" => {
            // Clear screen using ANSI escape codes, then reset the history.
            print!("\x1B[2J\x1B[1;1H");
            let _ = io::stdout().flush();
            session.clear_history();
            println!("History cleared.");
            ReplCommand::Continue
        }
        name => {
            run_operation(session, name, operands);
            ReplCommand::Continue
        }
    }
}

fn run_operation(session: &mut Session, name: &str, operands: &[&str]) {
    let outcome =
        parse_operands(operands).and_then(|(a, b)| session.compute(name, a, b));
    match outcome {
        Ok(result) => print_result(result, session.config().precision),
        Err(e) => print_error(e),
    }
}

/// Validates that exactly two numeric operands were supplied.
pub(crate) fn parse_operands(operands: &[&str]) -> Result<(f64, f64), CalcError> {
    let [a, b] = operands else {
        return Err(CalcError::validation(format!(
            "expected exactly two numeric operands, got {}",
            operands.len()
        )));
    };
    let a: f64 = a
        .parse()
        .map_err(|_| CalcError::validation(format!("operand '{}' is not numeric", a)))?;
    let b: f64 = b
        .parse()
        .map_err(|_| CalcError::validation(format!("operand '{}' is not numeric", b)))?;
    Ok((a, b))
}

/// Prints a computation result in the session's configured precision.
pub(crate) fn print_result(value: f64, precision: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    println!("Result: {:.*}", precision, value);
    let _ = stdout.reset();
}

/// Numbered history listing; presentation lives here, not in the store.
pub(crate) fn print_history(entries: &Vector<HistoryEntry>, precision: usize) {
    if entries.is_empty() {
        println!("(history is empty)");
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}. {}({}, {}) = {:.*}",
            index + 1,
            entry.operation,
            entry.a,
            entry.b,
            precision,
            entry.result
        );
    }
}

fn print_help() {
    println!("\nOperations (two numeric operands each):");
    println!("  add, subtract, multiply, division, modulus, power, root, int_divide, abs_diff");
    println!("\nCommands:");
    println!("  history   Show recorded computations");
    println!("  undo      Step back one operation");
    println!("  redo      Re-apply an undone operation");
    println!("  save      Persist the history to disk");
    println!("  load      Replace the history with the persisted table");
    println!("  clear     Clear the screen and empty the history");
    println!("  help      Show this help");
    println!("  exit      Quit\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_numeric_operands() {
        assert_eq!(parse_operands(&["1.5", "-2"]).unwrap(), (1.5, -2.0));
    }

    #[test]
    fn rejects_wrong_operand_count() {
        assert!(matches!(
            parse_operands(&["1"]),
            Err(CalcError::Validation { .. })
        ));
        assert!(matches!(
            parse_operands(&["1", "2", "3"]),
            Err(CalcError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_operands() {
        let err = parse_operands(&["one", "2"]).unwrap_err();
        assert!(matches!(err, CalcError::Validation { .. }));
        assert!(err.to_string().contains("one"));
    }
}
