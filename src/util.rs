//! File helpers shared by the lesson loader and the progress log reader.

use std::fs;
use std::path::Path;

use crate::error::{Result, WrifeError};

/// Maximum size of a lesson file (1 MB).
///
/// A lesson holds a handful of formulas and activities; anything larger is
/// almost certainly the wrong file.
pub const MAX_LESSON_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum size of the progress log that is read back for reporting (10 MB).
pub const MAX_PROGRESS_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Read a file into a string, refusing files larger than `max_size` bytes.
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read (doesn't exist, permission denied, etc.)
/// * The file exceeds `max_size`
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| WrifeError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(WrifeError::invalid_input(format!(
            "file {} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            max_size
        )));
    }

    fs::read_to_string(path).map_err(|e| WrifeError::storage(path, e))
}
