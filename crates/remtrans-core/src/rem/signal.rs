use std::collections::{BTreeMap, HashMap};

use super::command::ParsedCommand;
use super::error::CommandError;
use super::layout;
use super::timing::{DecodeMode, Timing};
use crate::{Command, Signal};

/// Turn a parsed command plus its timing-table context into a `Command`.
/// Failures are line-local and skip only the command being materialized.
pub fn materialize(
    parsed: ParsedCommand,
    timings: &HashMap<usize, Timing>,
) -> Result<Command, CommandError> {
    match parsed {
        ParsedCommand::Raw {
            name,
            frequency_khz,
            durations,
        } => Ok(Command {
            name,
            signal: Signal::Raw {
                frequency_hz: frequency_khz.saturating_mul(layout::KHZ),
                durations,
            },
        }),
        ParsedCommand::Ccf { name, ccf } => Ok(Command {
            name,
            signal: Signal::Ccf { ccf },
        }),
        ParsedCommand::Indexed { name, timing, data } => {
            let slot = timings
                .get(&timing)
                .ok_or(CommandError::UnknownTimingSlot { index: timing })?;
            let signal = match slot.decode {
                DecodeMode::Rc5 => decode_rc5(&data)?,
                DecodeMode::Rc6 => decode_rc6(&data)?,
                DecodeMode::Generic => expand_generic(&data, slot)?,
            };
            Ok(Command { name, signal })
        }
    }
}

/// RC5 layout: T at bit 11, D at bits 6..10, F low bits 0..5 with its
/// seventh bit stored inverted at bit 12.
fn decode_rc5(data: &str) -> Result<Signal, CommandError> {
    let payload = parse_binary(data)?;
    let f6 = (!(payload >> 12)) & 1;
    let f = (f6 << 6) | (payload & 0x3f);
    let d = (payload >> 6) & 0x1f;
    let t = (payload >> 11) & 1;
    Ok(protocol_signal("RC5", &[("F", f), ("D", d), ("T", t)]))
}

/// RC6 layout: the first two symbols are header/toggle, then D and F as
/// eight bits each.
fn decode_rc6(data: &str) -> Result<Signal, CommandError> {
    let bits = data
        .get(2..)
        .ok_or_else(|| CommandError::InvalidNumber(data.to_string()))?;
    let payload = parse_binary(bits)?;
    let f = payload & 0xff;
    let d = (payload >> 8) & 0xff;
    Ok(protocol_signal("RC6", &[("F", f), ("D", d)]))
}

/// Expand a symbol string against a generic slot: each symbol selects one
/// mark/space pair, concatenated in string order.
fn expand_generic(data: &str, slot: &Timing) -> Result<Signal, CommandError> {
    let mut durations = Vec::with_capacity(2 * data.len());
    for symbol in data.chars() {
        let index = symbol_index(symbol, slot.start_bit)?;
        let (mark, space) = slot
            .durations
            .get(index)
            .copied()
            .ok_or(CommandError::UndefinedSymbol { symbol })?;
        durations.push(mark);
        durations.push(space);
    }
    Ok(Signal::Raw {
        frequency_hz: slot.frequency_khz.unwrap_or(0).saturating_mul(layout::KHZ),
        durations,
    })
}

/// The literal start marker always selects pair 0; digits are base-36 and
/// shift up by one when the slot declares a start bit.
fn symbol_index(symbol: char, start_bit: bool) -> Result<usize, CommandError> {
    if symbol == layout::START_SYMBOL {
        return Ok(0);
    }
    let digit = symbol
        .to_digit(36)
        .ok_or(CommandError::UndefinedSymbol { symbol })?;
    Ok(digit as usize + usize::from(start_bit))
}

fn parse_binary(bits: &str) -> Result<i64, CommandError> {
    i64::from_str_radix(bits, 2).map_err(|_| CommandError::InvalidNumber(bits.to_string()))
}

fn protocol_signal(protocol: &str, parameters: &[(&str, i64)]) -> Signal {
    Signal::Protocol {
        protocol: protocol.to_string(),
        parameters: parameters
            .iter()
            .map(|&(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::materialize;
    use crate::rem::command::ParsedCommand;
    use crate::rem::error::CommandError;
    use crate::rem::timing::{DecodeMode, Timing};
    use crate::Signal;

    fn indexed(data: &str) -> ParsedCommand {
        ParsedCommand::Indexed {
            name: "cmd".to_string(),
            timing: 1,
            data: data.to_string(),
        }
    }

    fn table(timing: Timing) -> HashMap<usize, Timing> {
        HashMap::from([(1, timing)])
    }

    fn parameters(signal: &Signal) -> (&str, Vec<(String, i64)>) {
        match signal {
            Signal::Protocol {
                protocol,
                parameters,
            } => (
                protocol,
                parameters.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            ),
            other => panic!("expected protocol signal, got {other:?}"),
        }
    }

    fn rc5_params(data: &str) -> Vec<(String, i64)> {
        let timings = table(Timing {
            decode: DecodeMode::Rc5,
            ..Timing::default()
        });
        let command = materialize(indexed(data), &timings).unwrap();
        let (protocol, params) = parameters(&command.signal);
        assert_eq!(protocol, "RC5");
        params
    }

    #[test]
    fn rc5_decodes_t0() {
        let params = rc5_params("000000000001");
        assert_eq!(
            params,
            vec![
                ("D".to_string(), 0),
                ("F".to_string(), 65),
                ("T".to_string(), 0)
            ]
        );
    }

    #[test]
    fn rc5_decodes_t1() {
        let params = rc5_params("100000000001");
        assert_eq!(
            params,
            vec![
                ("D".to_string(), 0),
                ("F".to_string(), 65),
                ("T".to_string(), 1)
            ]
        );
    }

    #[test]
    fn rc5_decodes_mixed_fields() {
        let params = rc5_params("010101010101");
        assert_eq!(
            params,
            vec![
                ("D".to_string(), 21),
                ("F".to_string(), 85),
                ("T".to_string(), 0)
            ]
        );
    }

    #[test]
    fn rc5_uninverted_bit_twelve_clears_f6() {
        let params = rc5_params("1110000000011");
        assert_eq!(
            params,
            vec![
                ("D".to_string(), 16),
                ("F".to_string(), 3),
                ("T".to_string(), 1)
            ]
        );
    }

    #[test]
    fn rc6_decodes_device_and_function() {
        let timings = table(Timing {
            decode: DecodeMode::Rc6,
            ..Timing::default()
        });
        let command = materialize(indexed("100000001100000101"), &timings).unwrap();
        let (protocol, params) = parameters(&command.signal);
        assert_eq!(protocol, "RC6");
        assert_eq!(
            params,
            vec![("D".to_string(), 3), ("F".to_string(), 5)]
        );
    }

    #[test]
    fn rc6_rejects_non_binary_payload() {
        let timings = table(Timing {
            decode: DecodeMode::Rc6,
            ..Timing::default()
        });
        let err = materialize(indexed("10"), &timings).unwrap_err();
        assert!(matches!(err, CommandError::InvalidNumber(_)));
    }

    #[test]
    fn generic_expands_in_table_then_string_order() {
        let timings = table(Timing {
            durations: vec![(10, 20), (30, 40), (50, 60), (70, 80)],
            frequency_khz: Some(38),
            ..Timing::default()
        });
        let command = materialize(indexed("0123"), &timings).unwrap();
        assert_eq!(
            command.signal,
            Signal::Raw {
                frequency_hz: 38_000,
                durations: vec![10, 20, 30, 40, 50, 60, 70, 80],
            }
        );
    }

    #[test]
    fn generic_start_marker_and_start_bit_offset() {
        let timings = table(Timing {
            durations: vec![(480, 4640), (480, 420), (480, 840)],
            frequency_khz: Some(38),
            start_bit: true,
            ..Timing::default()
        });
        let command = materialize(indexed("S01"), &timings).unwrap();
        assert_eq!(
            command.signal,
            Signal::Raw {
                frequency_hz: 38_000,
                durations: vec![480, 4640, 480, 420, 480, 840],
            }
        );
    }

    #[test]
    fn generic_rejects_out_of_range_symbol() {
        let timings = table(Timing {
            durations: vec![(10, 20)],
            ..Timing::default()
        });
        let err = materialize(indexed("02"), &timings).unwrap_err();
        assert_eq!(err, CommandError::UndefinedSymbol { symbol: '2' });
    }

    #[test]
    fn missing_timing_slot_fails_the_line() {
        let err = materialize(indexed("0"), &HashMap::new()).unwrap_err();
        assert_eq!(err, CommandError::UnknownTimingSlot { index: 1 });
    }

    #[test]
    fn raw_frequency_is_scaled_to_hz() {
        let command = materialize(
            ParsedCommand::Raw {
                name: "x".to_string(),
                frequency_khz: 36,
                durations: vec![880, 440],
            },
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(
            command.signal,
            Signal::Raw {
                frequency_hz: 36_000,
                durations: vec![880, 440],
            }
        );
    }
}
