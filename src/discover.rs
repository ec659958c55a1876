use std::path::{Path, PathBuf};

use crate::error::Result;

/// Search `start` and its ancestors for a file named `file_name`.
///
/// The walk stops after checking `ceiling` when one is given (and `start` is
/// inside it), otherwise after the filesystem root.
///
/// # Returns
/// * `Ok(Some(path))` - The closest matching file
/// * `Ok(None)` - No directory on the way up contains the file
/// * `Err` - If a candidate path could not be inspected
pub fn find_upward(start: &Path, file_name: &str, ceiling: Option<&Path>) -> Result<Option<PathBuf>> {
    for dir in start.ancestors() {
        let candidate = dir.join(file_name);
        if candidate.try_exists()? && candidate.is_file() {
            return Ok(Some(candidate));
        }
        if ceiling.is_some_and(|ceiling| dir == ceiling) {
            break;
        }
    }

    Ok(None)
}
