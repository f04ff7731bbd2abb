//! Process exit codes, following BSD sysexits.h.
//!
//! `CliError::exit_code` picks one per error layer; see `cli/error.rs`.

pub const OK: i32 = 0;

/// Bad arguments, e.g. no chart file given and no `default_chart` configured
pub const USAGE: i32 = 64;

/// The chart parsed but violates a hierarchy rule (cycle, leaf parent, depth)
pub const DATAERR: i32 = 65;

/// The chart file does not exist
pub const NOINPUT: i32 = 66;

/// `init` refused to overwrite an existing chart
pub const CANTCREAT: i32 = 73;

/// Reading a chart or writing the report failed
pub const IOERR: i32 = 74;

/// A settings layer (file or HEADCOUNT_* variable) is malformed
pub const CONFIG: i32 = 78;
