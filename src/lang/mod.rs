/*!
# Rust Language Module

This Rust module holds the tokenized form of BASIC: the byte format,
a cursor with the scanning primitives statements are parsed with,
and an encoder from source text.

*/

/// A line number, or `None` for the direct line.
pub type LineNumber = Option<u16>;

/// Highest line number a program may use.
pub const MAX_LINE_NUMBER: u16 = 65529;

mod cursor;
mod error;
mod tokenise;

pub mod token;

pub use cursor::{range_check, range_check_err, TokenCursor};
pub use error::{Break, Error, ErrorCode, Location, Signal};
pub use tokenise::{detokenise_line, tokenise_line, UNLINKED};

#[cfg(test)]
mod tests;
