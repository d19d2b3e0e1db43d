use thiserror::Error;

/// Structural errors, fatal to the enclosing remote block.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{marker} not found (line {line})")]
    MissingMarker { marker: &'static str, line: u64 },
    #[error("[NAME] not found (line {line})")]
    NameNotFound { line: u64 },
    #[error("malformed timing entry (line {line}): {reason}")]
    MalformedTiming { line: u64, reason: String },
    #[error("unknown timing token '{token}' (line {line})")]
    UnknownTimingToken { token: String, line: u64 },
}

/// Line-local errors, recovered by skipping the offending command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("truncated command line")]
    Truncated,
    #[error("expected '{expected}', got '{got}'")]
    UnexpectedToken { expected: &'static str, got: String },
    #[error("unknown command type '{0}'")]
    UnknownType(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("declared {declared} durations, got {actual}")]
    DurationCount { declared: usize, actual: usize },
    #[error("truncated duration escape")]
    TruncatedEscape,
    #[error("trailing tokens after command")]
    TrailingTokens,
    #[error("unknown timing slot {index}")]
    UnknownTimingSlot { index: usize },
    #[error("undefined symbol '{symbol}'")]
    UndefinedSymbol { symbol: char },
}
