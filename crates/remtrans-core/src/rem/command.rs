use super::error::CommandError;
use super::layout;
use super::scan::TokenReader;

/// One parsed command definition, before materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Explicit durations, already escape-decoded and padded to even length.
    Raw {
        name: String,
        frequency_khz: u32,
        durations: Vec<u32>,
    },
    /// Opaque CCF passthrough.
    Ccf { name: String, ccf: String },
    /// Symbol string to be expanded against a timing slot.
    Indexed {
        name: String,
        timing: usize,
        data: String,
    },
}

/// Parse one `[COMMANDS]` line: `[name][][type][type-specific tokens...]`.
/// Every failure is line-local; the caller skips the line and continues.
pub fn parse_command(line: &str) -> Result<ParsedCommand, CommandError> {
    let mut tokens = TokenReader::new(line);
    tokens.skip()?; // text before the first bracket, normally empty
    let name = tokens.next_token()?.to_string();
    tokens.skip()?; // the empty `][]` slot
    let command = match tokens.next_token()? {
        layout::TYPE_RAW => {
            let declared: usize = tokens.next_number()?;
            tokens.expect(layout::TOKEN_FREQ)?;
            let frequency_khz = tokens.next_number()?;
            tokens.expect(layout::TOKEN_DATA)?;
            let durations = decode_raw_durations(declared, tokens.next_token()?)?;
            ParsedCommand::Raw {
                name,
                frequency_khz,
                durations,
            }
        }
        layout::TYPE_CCF => ParsedCommand::Ccf {
            name,
            ccf: tokens.next_token()?.to_string(),
        },
        layout::TYPE_TIMING => {
            let timing = tokens.next_number()?;
            tokens.expect(layout::TOKEN_DATA)?;
            ParsedCommand::Indexed {
                name,
                timing,
                data: tokens.next_token()?.to_string(),
            }
        }
        other => return Err(CommandError::UnknownType(other.to_string())),
    };
    tokens.finish()?;
    Ok(command)
}

/// Decode a RAW duration list. The token count must match the declaration;
/// a zero signals a three-token escape emitting one 256·hi+lo duration; an
/// odd result is padded with one synthetic trailing gap.
fn decode_raw_durations(declared: usize, data: &str) -> Result<Vec<u32>, CommandError> {
    let numbers = data
        .split(' ')
        .map(|n| {
            n.parse::<u32>()
                .map_err(|_| CommandError::InvalidNumber(n.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.len() != declared {
        return Err(CommandError::DurationCount {
            declared,
            actual: numbers.len(),
        });
    }

    let mut durations = Vec::with_capacity(declared + 1);
    let mut i = 0;
    while i < numbers.len() {
        if numbers[i] == 0 {
            let hi = *numbers.get(i + 1).ok_or(CommandError::TruncatedEscape)?;
            let lo = *numbers.get(i + 2).ok_or(CommandError::TruncatedEscape)?;
            durations.push(
                layout::ESCAPE_HIGH_MULTIPLIER
                    .saturating_mul(hi)
                    .saturating_add(lo),
            );
            i += 3;
        } else {
            durations.push(numbers[i]);
            i += 1;
        }
    }
    if durations.len() % 2 != 0 {
        durations.push(layout::DUMMY_ENDING_GAP);
    }
    Ok(durations)
}
