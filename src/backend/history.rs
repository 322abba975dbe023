use std::{fs, path::{Path, PathBuf}};

use log::info;

use crate::backend::codec::{self, Record};
use crate::backend::dump_dir::{DUMP_EXTENSION, RECORD_SEPARATOR};
use crate::backend::interface::{BackendError, Result};
use crate::core::Payment;

/// Writes `payments` into `dir`, at most `records` per file.
///
/// Everything goes to `payments.dump` when it fits in one file,
/// otherwise into `payments1.dump`, `payments2.dump`, ...
/// Returns the paths written, in order; nothing is written for no payments.
pub fn history_to_files(payments: &[Payment], dir: impl AsRef<Path>, records: usize) -> Result<Vec<PathBuf>> {
    if records < 1 {
        return Err(BackendError::MinRecordsRequired);
    }
    if payments.is_empty() {
        return Ok(Vec::new());
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let paths: Vec<PathBuf> = if payments.len() <= records {
        vec![dir.join(format!("{}.{}", Payment::KIND, DUMP_EXTENSION))]
    } else {
        (1..=payments.len().div_ceil(records))
            .map(|page| dir.join(format!("{}{}.{}", Payment::KIND, page, DUMP_EXTENSION)))
            .collect()
    };

    for (path, page) in paths.iter().zip(payments.chunks(records)) {
        fs::write(path, codec::encode_all(page, RECORD_SEPARATOR))?;
    }
    info!("wrote {} payments into {} file(s) in {}", payments.len(), paths.len(), dir.display());
    return Ok(paths);
}
