use std::io::BufRead;

use log::warn;

use super::command::parse_command;
use super::error::FormatError;
use super::layout;
use super::scan::seek_marker;
use super::signal::materialize;
use super::timing::parse_timing_section;
use crate::source::LineCursor;
use crate::{ImportStats, Remote};

/// Parse one `[REMOTE]` block. `Ok(None)` means end of input.
///
/// Structural problems (missing markers, a bad timing table) propagate and
/// discard the whole block; command lines fail individually and are only
/// skipped. A `[COMMANDS]` marker cut off by end of input yields a remote
/// with no commands.
pub fn parse_remote<R: BufRead>(
    cursor: &mut LineCursor<R>,
    stats: &mut ImportStats,
) -> Result<Option<Remote>, FormatError> {
    let name = match parse_name(cursor)? {
        Some(name) => name,
        None => return Ok(None),
    };
    let timings = parse_timing_section(cursor)?;

    let mut remote = Remote::new(name);
    if seek_marker(cursor, layout::COMMANDS_MARKER, true)? {
        while let Some(line) = cursor.next_line()? {
            if line.trim().is_empty() {
                break;
            }
            match parse_command(&line).and_then(|parsed| materialize(parsed, &timings)) {
                Ok(command) => {
                    let name = command.name.clone();
                    if remote.insert_command(command) {
                        stats.command_collisions += 1;
                        warn!(
                            "{}: duplicate command '{}' (line {}) replaces the earlier definition",
                            remote.name,
                            name,
                            cursor.line_number()
                        );
                    }
                }
                Err(err) => {
                    stats.commands_skipped += 1;
                    warn!(
                        "{}: skipping command line {}: {} ({})",
                        remote.name,
                        cursor.line_number(),
                        err,
                        line.trim()
                    );
                }
            }
        }
    }
    Ok(Some(remote))
}

/// Seek the `[REMOTE]` marker and read the following `[NAME]value` line.
/// End of input before the marker means a clean end of document.
fn parse_name<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<String>, FormatError> {
    if !seek_marker(cursor, layout::REMOTE_MARKER, true)? {
        return Ok(None);
    }
    let line = cursor.next_line()?.ok_or(FormatError::NameNotFound {
        line: cursor.line_number(),
    })?;
    let name = line
        .trim()
        .strip_prefix(layout::NAME_PREFIX)
        .ok_or(FormatError::NameNotFound {
            line: cursor.line_number(),
        })?;
    Ok(Some(name.to_string()))
}
