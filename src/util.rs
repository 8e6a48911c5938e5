//! File system helpers shared by the comparator and the test loop

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Delete a previous output file if there is one.
///
/// A missing file is fine. Any other failure is logged and ignored, so a
/// stale file may survive and be compared; the run goes on regardless.
pub fn remove_stale(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("removed {}", path.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => log::warn!("could not remove {}: {}", path.display(), err),
    }
}
