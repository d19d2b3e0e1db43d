//! Section markers and token vocabulary of the IrTrans text format.

pub const REMOTE_MARKER: &str = "[REMOTE]";
pub const NAME_PREFIX: &str = "[NAME]";
pub const TIMING_MARKER: &str = "[TIMING]";
pub const COMMANDS_MARKER: &str = "[COMMANDS]";

/// Command type tokens.
pub const TYPE_RAW: &str = "RAW";
pub const TYPE_CCF: &str = "CCF";
pub const TYPE_TIMING: &str = "T";

/// Literal tokens inside RAW and T commands.
pub const TOKEN_FREQ: &str = "FREQ";
pub const TOKEN_DATA: &str = "D";

/// Timing-table flag tokens.
pub const TIMING_PAIR_COUNT: &str = "N";
pub const TIMING_REPETITIONS: &str = "RC";
pub const TIMING_PAUSE: &str = "RP";
pub const TIMING_FRAME_LENGTH: &str = "FL";
pub const TIMING_FREQ_MEASURED: &str = "FREQ-MEAS";
pub const TIMING_START_BIT: &str = "SB";
pub const TIMING_REPEAT_START: &str = "RS";
pub const TIMING_RC5: &str = "RC5";
pub const TIMING_RC6: &str = "RC6";
pub const TIMING_NO_TOGGLE: &str = "NOTOG";
pub const TIMING_RCMM_TOGGLE: &str = "RCMM-TOGGLE";
/// Ignored, but carries one argument.
pub const TIMING_RO: &str = "RO";
/// Ignored, argument-free.
pub const TIMING_IRDA: &str = "IRDA";
pub const TIMING_IRDA_RAW: &str = "IRDA-RAW";

/// Gap appended when a raw signal reports an odd duration count, in µs.
pub const DUMMY_ENDING_GAP: u32 = 50_000;
/// High-byte multiplier of the three-token duration escape in RAW data.
pub const ESCAPE_HIGH_MULTIPLIER: u32 = 256;
/// Start-marker character in generic symbol strings.
pub const START_SYMBOL: char = 'S';
/// The file stores carrier frequencies in kHz.
pub const KHZ: u32 = 1000;
