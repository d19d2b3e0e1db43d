//! Import pipeline: assemble `[REMOTE]` blocks into a `RemoteSet`.
//!
//! Structural failures do not abort the document: the failed block is
//! recorded and the importer resynchronizes at the next `[REMOTE]` marker,
//! consistent with the line-level recovery inside command blocks. Only I/O
//! errors end the whole import.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::rem::{self, FormatError};
use crate::source::LineCursor;
use crate::{DEFAULT_CREATION_DATE, ImportReport, ImportStats, make_remote_set};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Import an IrTrans database file, using its path as the origin.
pub fn import_rem_file(path: &Path) -> Result<ImportReport, ImportError> {
    let file = File::open(path)?;
    import_reader(
        BufReader::new(file),
        &path.display().to_string(),
        None,
    )
}

/// Import an IrTrans document from any buffered line source.
pub fn import_reader<R: BufRead>(
    reader: R,
    origin: &str,
    creating_user: Option<&str>,
) -> Result<ImportReport, ImportError> {
    let mut cursor = LineCursor::new(reader);
    let mut stats = ImportStats::default();
    let mut remote_set = make_remote_set(origin, creating_user);
    remote_set.creation_date = creation_date();

    loop {
        match rem::parse_remote(&mut cursor, &mut stats) {
            Ok(Some(remote)) => {
                stats.remotes_imported += 1;
                let name = remote.name.clone();
                if remote_set.insert_remote(remote) {
                    stats.remote_collisions += 1;
                    warn!("duplicate remote '{name}' replaces the earlier definition");
                }
            }
            Ok(None) => break,
            Err(FormatError::Io(err)) => return Err(ImportError::Io(err)),
            Err(err) => {
                stats.remotes_failed += 1;
                warn!("remote block discarded: {err}");
                stats.failures.push(err.to_string());
                resync(&mut cursor)?;
            }
        }
    }

    Ok(ImportReport { remote_set, stats })
}

/// Skip forward to the next `[REMOTE]` marker after a structural failure,
/// leaving the marker itself for the next `parse_remote` call.
fn resync<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<(), std::io::Error> {
    while let Some(line) = cursor.next_line()? {
        if line.trim() == rem::layout::REMOTE_MARKER {
            cursor.push_back(line);
            break;
        }
    }
    Ok(())
}

fn creation_date() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_CREATION_DATE.to_string())
}
