//! File status helpers: type checks and timestamp/permission copying.
//!
//! Decompressed outputs inherit their input's modification time and
//! permission bits, the same way `gzip -d` leaves them.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Copy modification/access times and permission bits from `src` to `dst`.
///
/// Returns `Err` if either path is not a regular file.
pub fn copy_file_times(src: &Path, dst: &Path) -> io::Result<()> {
    if !is_reg_file(src) || !is_reg_file(dst) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "copy_file_times: not a regular file",
        ));
    }
    let meta = fs::metadata(src)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dst, atime, mtime)?;
    fs::set_permissions(dst, meta.permissions())?;
    Ok(())
}

/// Returns `true` if `path` refers to a regular file.
///
/// Returns `false` for directories, special files, and paths that do not exist.
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// Returns `true` if `path` refers to a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
