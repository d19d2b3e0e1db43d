use std::collections::HashMap;
use std::io::BufRead;

use super::error::FormatError;
use super::layout;
use super::scan::{bracket_tokens, seek_marker};
use crate::source::LineCursor;

/// How symbol strings referencing a timing slot are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    #[default]
    Generic,
    Rc5,
    Rc6,
}

/// One timing slot: a symbol alphabet of mark/space pairs plus per-slot
/// decode flags. Mutable while its `[TIMING]` line is parsed, frozen once
/// the section ends, scoped to a single remote block.
#[derive(Debug, Clone, Default)]
pub struct Timing {
    /// Mark/space duration pairs, indices 0..N-1, in µs.
    pub durations: Vec<(u32, u32)>,
    pub repetitions: Option<u32>,
    /// Pause after the frame; mutually exclusive with `framelength`.
    pub pause: Option<u32>,
    /// Total frame length; mutually exclusive with `pause`.
    pub framelength: Option<u32>,
    /// Carrier frequency as stored in the file (kHz).
    pub frequency_khz: Option<u32>,
    pub freq_meas: bool,
    /// Slot index 0 is a start-bit pair; data symbols shift up by one.
    pub start_bit: bool,
    pub repeat_start: bool,
    pub decode: DecodeMode,
    pub no_toggle: bool,
    pub rcmm_toggle: bool,
}

/// Parse the optional `[TIMING]` section into slots keyed by declared
/// index. An absent marker yields an empty table. Any unrecognized or
/// malformed token is fatal to the enclosing remote: the partial table is
/// discarded by the error propagating out.
pub fn parse_timing_section<R: BufRead>(
    cursor: &mut LineCursor<R>,
) -> Result<HashMap<usize, Timing>, FormatError> {
    let mut table = HashMap::new();
    if !seek_marker(cursor, layout::TIMING_MARKER, false)? {
        return Ok(table);
    }
    while let Some(line) = cursor.next_line()? {
        if line.trim().is_empty() {
            break;
        }
        let (index, timing) = parse_timing_line(&line, cursor.line_number())?;
        table.insert(index, timing);
    }
    Ok(table)
}

fn parse_timing_line(line: &str, line_no: u64) -> Result<(usize, Timing), FormatError> {
    let tokens = bracket_tokens(line);
    let index: usize = tokens
        .get(1)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| malformed(line_no, "missing or invalid slot index"))?;

    let mut timing = Timing::default();
    let mut pos = 2;
    while pos < tokens.len() {
        let token = tokens[pos];
        match token {
            "" => {}
            layout::TIMING_PAIR_COUNT => {
                let count = num_arg(&tokens, &mut pos, line_no)? as usize;
                timing.durations = vec![(0, 0); count];
            }
            layout::TIMING_REPETITIONS => {
                timing.repetitions = Some(num_arg(&tokens, &mut pos, line_no)?);
            }
            layout::TIMING_PAUSE => {
                timing.pause = Some(num_arg(&tokens, &mut pos, line_no)?);
                timing.framelength = None;
            }
            layout::TIMING_FRAME_LENGTH => {
                timing.framelength = Some(num_arg(&tokens, &mut pos, line_no)?);
                timing.pause = None;
            }
            layout::TOKEN_FREQ => {
                timing.frequency_khz = Some(num_arg(&tokens, &mut pos, line_no)?);
            }
            layout::TIMING_FREQ_MEASURED => timing.freq_meas = true,
            layout::TIMING_START_BIT => timing.start_bit = true,
            layout::TIMING_REPEAT_START => timing.repeat_start = true,
            layout::TIMING_RC5 => timing.decode = DecodeMode::Rc5,
            layout::TIMING_RC6 => timing.decode = DecodeMode::Rc6,
            layout::TIMING_NO_TOGGLE => timing.no_toggle = true,
            layout::TIMING_RCMM_TOGGLE => timing.rcmm_toggle = true,
            // Junk with one argument.
            layout::TIMING_RO => pos += 1,
            // Junk.
            layout::TIMING_IRDA | layout::TIMING_IRDA_RAW => {}
            other => {
                let pair_no: usize = other.parse().map_err(|_| FormatError::UnknownTimingToken {
                    token: other.to_string(),
                    line: line_no,
                })?;
                let value = arg(&tokens, &mut pos, line_no)?;
                set_duration_pair(&mut timing, pair_no, value, line_no)?;
            }
        }
        pos += 1;
    }
    Ok((index, timing))
}

/// Fill the 1-based pair `pair_no` from a `"mark space"` value token.
fn set_duration_pair(
    timing: &mut Timing,
    pair_no: usize,
    value: &str,
    line_no: u64,
) -> Result<(), FormatError> {
    let mut parts = value.split_whitespace();
    let mark = pair_part(parts.next(), line_no)?;
    let space = pair_part(parts.next(), line_no)?;
    let slot = pair_no
        .checked_sub(1)
        .and_then(|i| timing.durations.get_mut(i))
        .ok_or_else(|| {
            malformed(
                line_no,
                &format!("pair index {pair_no} outside the declared table"),
            )
        })?;
    *slot = (mark, space);
    Ok(())
}

fn pair_part(part: Option<&str>, line_no: u64) -> Result<u32, FormatError> {
    part.and_then(|p| p.parse().ok())
        .ok_or_else(|| malformed(line_no, "expected a mark/space duration pair"))
}

fn arg<'a>(tokens: &[&'a str], pos: &mut usize, line_no: u64) -> Result<&'a str, FormatError> {
    *pos += 1;
    tokens
        .get(*pos)
        .copied()
        .ok_or_else(|| malformed(line_no, "missing token argument"))
}

fn num_arg(tokens: &[&str], pos: &mut usize, line_no: u64) -> Result<u32, FormatError> {
    let value = arg(tokens, pos, line_no)?;
    value
        .parse()
        .map_err(|_| malformed(line_no, &format!("invalid number '{value}'")))
}

fn malformed(line_no: u64, reason: &str) -> FormatError {
    FormatError::MalformedTiming {
        line: line_no,
        reason: reason.to_string(),
    }
}
