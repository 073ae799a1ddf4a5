//! Terminal output with colors
//!
//! Charts and exports go to stdout, diagnostics to stderr.
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;

use colored::Colorize;
use itertools::Itertools;

use crate::application::Outcome;
use crate::domain::MoveRecord;

/// Red bold "error:" prefix, stderr.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// One line per scripted operation: green check when applied, red cross
/// with the rejection reason otherwise.
pub fn outcome(outcome: &Outcome) {
    match &outcome.result {
        Ok(record) => println!("{} {}  ({})", "✓".green(), outcome.operation, record),
        Err(e) => println!("{} {}  {}", "✗".red(), outcome.operation, e.to_string().yellow()),
    }
}

/// Pending records of one stack, oldest first.
pub fn records(label: &str, records: &[MoveRecord]) {
    let list = if records.is_empty() {
        "(empty)".dimmed().to_string()
    } else {
        records.iter().join(", ")
    };
    println!("  {:<5} {}", format!("{label}:"), list);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Indented detail, no color.
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Plain data output: trees, TOML.
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
