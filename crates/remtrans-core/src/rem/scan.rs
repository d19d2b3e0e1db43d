use std::io::BufRead;
use std::str::FromStr;

use super::error::{CommandError, FormatError};
use crate::source::LineCursor;

/// Advance the cursor to `marker`, skipping blank lines.
///
/// Returns `Ok(true)` when the marker was found and consumed. End of input
/// always yields `Ok(false)`, even for required markers; the assembler uses
/// this to detect overall completion. A differing non-blank line yields a
/// `MissingMarker` error when required, otherwise the line is pushed back
/// and `Ok(false)` is returned.
pub fn seek_marker<R: BufRead>(
    cursor: &mut LineCursor<R>,
    marker: &'static str,
    required: bool,
) -> Result<bool, FormatError> {
    loop {
        let line = match cursor.next_line()? {
            Some(line) => line,
            None => return Ok(false),
        };
        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == marker {
            return Ok(true);
        }
        return if required {
            Err(FormatError::MissingMarker {
                marker,
                line: cursor.line_number(),
            })
        } else {
            cursor.push_back(line);
            Ok(false)
        };
    }
}

/// Split a line on brackets, dropping trailing empty tokens.
///
/// `[power][][RAW]` becomes `["", "power", "", "RAW"]`: the text before the
/// first bracket is kept (normally empty), text between `][` shows up as an
/// empty token, and everything after the final bracket pair is dropped when
/// empty.
pub fn bracket_tokens(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.trim().split(['[', ']']).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Sequential accessor over bracket tokens with typed reads.
pub struct TokenReader<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: bracket_tokens(line),
            pos: 0,
        }
    }

    pub fn next_token(&mut self) -> Result<&'a str, CommandError> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(CommandError::Truncated)?;
        self.pos += 1;
        Ok(token)
    }

    pub fn next_number<T: FromStr>(&mut self) -> Result<T, CommandError> {
        let token = self.next_token()?;
        token
            .parse()
            .map_err(|_| CommandError::InvalidNumber(token.to_string()))
    }

    pub fn expect(&mut self, literal: &'static str) -> Result<(), CommandError> {
        let token = self.next_token()?;
        if token == literal {
            Ok(())
        } else {
            Err(CommandError::UnexpectedToken {
                expected: literal,
                got: token.to_string(),
            })
        }
    }

    pub fn skip(&mut self) -> Result<(), CommandError> {
        self.next_token().map(|_| ())
    }

    /// Consume the reader, failing when tokens remain unconsumed.
    pub fn finish(self) -> Result<(), CommandError> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(CommandError::TrailingTokens)
        }
    }
}
