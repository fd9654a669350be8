//! Atomic artifact writes.
//!
//! Content goes to `<path>.launchpad.tmp` first and is renamed over the final
//! path, so a reader never sees a half-written file.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ProcessError};

/// Write `content` to `path` atomically, with a trailing newline. Bytes are
/// otherwise written unchanged.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), ProcessError> {
    let tmp = PathBuf::from(format!("{}.launchpad.tmp", path.display()));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let mut body = content.to_owned();
    if !body.ends_with('\n') {
        body.push('\n');
    }
    std::fs::write(&tmp, body).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(())
}
