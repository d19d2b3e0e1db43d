//! remtrans core library for importing IrTrans remote databases.
//!
//! This crate implements the offline import pipeline used by the CLI: a
//! buffered line source feeds the section scanner, which drives the format
//! decoders (timing table, command lines, signal materialization) and
//! assembles the results into a deterministic remote set. Parsing is
//! line-oriented and side-effect free; all I/O is isolated in `source` and
//! the `import` entry points.
//!
//! Invariants:
//! - Remote and command order is insertion order; a duplicate name replaces
//!   the earlier definition in place (last write wins) and is counted.
//! - Command-level errors are recovered by skipping the offending line;
//!   structural errors discard the enclosing remote block only.
//! - End of input is never an error.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use remtrans_core::import_rem_file;
//!
//! let report = import_rem_file(Path::new("devices.rem"))?;
//! println!("remotes imported: {}", report.remote_set.remotes.len());
//! # Ok::<(), remtrans_core::ImportError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod import;
mod rem;
mod source;

pub use import::{ImportError, import_reader, import_rem_file};
pub use rem::{CommandError, FormatError};
pub use source::LineCursor;

/// Name of the text format this crate decodes.
pub const FORMAT_NAME: &str = "IrTrans";
/// Customary file extension of IrTrans database exports.
pub const FILE_EXTENSION: &str = "rem";
/// Default timestamp used before the importer stamps the real one.
pub const DEFAULT_CREATION_DATE: &str = "1970-01-01T00:00:00Z";

/// Tool identification metadata embedded in a remote set.
///
/// # Examples
/// ```
/// use remtrans_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "remtrans".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "remtrans");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "remtrans").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Payload of a materialized command; exactly one representation applies.
///
/// `Protocol` carries a protocol name plus a parameter mapping for an
/// external protocol-rendering engine; `Raw` carries an explicit mark/space
/// duration sequence in microseconds; `Ccf` is an opaque hexadecimal
/// passthrough.
///
/// # Examples
/// ```
/// use remtrans_core::Signal;
///
/// let signal = Signal::Raw {
///     frequency_hz: 38_000,
///     durations: vec![480, 4640],
/// };
/// assert!(matches!(signal, Signal::Raw { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Named protocol with its decoded parameters.
    Protocol {
        /// Protocol name understood by the rendering engine (e.g., "RC5").
        protocol: String,
        /// Parameter mapping in deterministic key order.
        parameters: BTreeMap<String, i64>,
    },
    /// Explicit signal as alternating mark/space durations.
    Raw {
        /// Carrier frequency in Hz during mark periods.
        frequency_hz: u32,
        /// Even-length duration sequence in microseconds.
        durations: Vec<u32>,
    },
    /// Opaque CCF hex string.
    Ccf {
        /// The unmodified CCF text.
        ccf: String,
    },
}

/// One named command of a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name, unique within its remote.
    pub name: String,
    /// The materialized signal payload.
    pub signal: Signal,
}

/// A remote with its insertion-ordered command mapping.
///
/// # Examples
/// ```
/// use remtrans_core::{Command, Remote, Signal};
///
/// let mut remote = Remote::new("tv");
/// let replaced = remote.insert_command(Command {
///     name: "power".to_string(),
///     signal: Signal::Ccf { ccf: "0000".to_string() },
/// });
/// assert!(!replaced);
/// assert!(remote.command("power").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Remote name, unique within a remote set.
    pub name: String,
    /// Commands in insertion order.
    pub commands: Vec<Command>,
}

impl Remote {
    /// Create an empty remote.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Insert a command, replacing an existing one with the same name in
    /// place. Returns true when a command was replaced.
    pub fn insert_command(&mut self, command: Command) -> bool {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => {
                *existing = command;
                true
            }
            None => {
                self.commands.push(command);
                false
            }
        }
    }

    /// Look up a command by name.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }
}

/// Imported database: creator identity, origin, timestamp, tool metadata
/// and the insertion-ordered remote mapping.
///
/// # Examples
/// ```
/// use remtrans_core::make_remote_set;
///
/// let set = make_remote_set("devices.rem", None);
/// assert!(set.remotes.is_empty());
/// assert_eq!(set.tool.name, "remtrans");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSet {
    /// Identity of the importing user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creating_user: Option<String>,
    /// Where the document came from (usually a file path).
    pub origin: String,
    /// RFC3339 timestamp of the import.
    pub creation_date: String,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Remotes in insertion order.
    pub remotes: Vec<Remote>,
}

impl RemoteSet {
    /// Insert a remote, replacing an existing one with the same name in
    /// place. Returns true when a remote was replaced.
    pub fn insert_remote(&mut self, remote: Remote) -> bool {
        match self.remotes.iter_mut().find(|r| r.name == remote.name) {
            Some(existing) => {
                *existing = remote;
                true
            }
            None => {
                self.remotes.push(remote);
                false
            }
        }
    }

    /// Look up a remote by name.
    pub fn remote(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|r| r.name == name)
    }
}

/// Counters describing what the importer recovered from.
///
/// Last write wins on name collisions; these counters let strict callers
/// detect that it happened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    /// Remote blocks parsed successfully (including later-overwritten ones).
    pub remotes_imported: u64,
    /// Remote blocks discarded after a structural error.
    pub remotes_failed: u64,
    /// Remote names that overwrote an earlier remote.
    pub remote_collisions: u64,
    /// Command names that overwrote an earlier command.
    pub command_collisions: u64,
    /// Command lines skipped after a line-local error.
    pub commands_skipped: u64,
    /// One rendered structural error per discarded remote block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl ImportStats {
    /// True when nothing was skipped, discarded or overwritten.
    pub fn is_clean(&self) -> bool {
        self.remotes_failed == 0
            && self.remote_collisions == 0
            && self.command_collisions == 0
            && self.commands_skipped == 0
    }
}

/// Result of one import run: the assembled model plus recovery counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// The assembled remote set.
    pub remote_set: RemoteSet,
    /// What the importer recovered from along the way.
    pub stats: ImportStats,
}

/// Build an empty remote set with tool metadata filled and the default
/// creation date; the importer stamps the real timestamp.
///
/// # Examples
/// ```
/// use remtrans_core::{DEFAULT_CREATION_DATE, make_remote_set};
///
/// let set = make_remote_set("devices.rem", Some("alex"));
/// assert_eq!(set.creation_date, DEFAULT_CREATION_DATE);
/// assert_eq!(set.creating_user.as_deref(), Some("alex"));
/// ```
pub fn make_remote_set(origin: &str, creating_user: Option<&str>) -> RemoteSet {
    RemoteSet {
        creating_user: creating_user.map(str::to_string),
        origin: origin.to_string(),
        creation_date: DEFAULT_CREATION_DATE.to_string(),
        tool: ToolInfo {
            name: "remtrans".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        remotes: Vec::new(),
    }
}
