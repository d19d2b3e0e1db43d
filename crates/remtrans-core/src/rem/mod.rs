//! IrTrans `.rem` text format decoding.
//!
//! The format is decoded in layers:
//! - `layout`: section markers and token vocabulary (source of truth)
//! - `scan`: section scanner and bracket token reader
//! - `timing`: `[TIMING]` table builder
//! - `command`: `[COMMANDS]` line parser
//! - `signal`: materialization of parsed commands into `Command` values
//! - `remote`: one `[REMOTE]` block end to end
//! - `error`: explicit, line-numbered errors
//!
//! Command-level failures are recovered by skipping the line; anything
//! wrong with the section structure or the timing table discards the
//! enclosing remote block.

pub mod command;
pub mod error;
pub mod layout;
pub mod remote;
pub mod scan;
pub mod signal;
pub mod timing;

pub use error::{CommandError, FormatError};
pub use remote::parse_remote;
