//! Colored status lines for the `headcount` commands.
//!
//! Reports and totals go to stdout uncolored so they stay pipeable; only the
//! status lines below are styled. `colored` honours NO_COLOR and CLICOLOR.

use std::fmt::Display;

use colored::Colorize;

/// Failure reported by `main` before exiting, on stderr.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Summary line of a successful `check`.
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// `label: msg`, e.g. the file written by `init` or a config location.
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Indented line below a summary, one per chart root in `check`.
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}
