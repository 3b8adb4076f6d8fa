//! File list construction with recursive directory expansion.
//!
//! Given a mixed list of file and directory paths, [`create_file_list`] returns
//! a flat `Vec<PathBuf>`.  Files named directly are kept whatever their name;
//! directories are walked with [`walkdir`] and contribute only regular files
//! ending in `.deflate`.
//!
//! Symlinks are never followed during traversal (`walkdir`'s default), so a
//! cyclic link cannot loop the walk and linked files are skipped.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::DEFLATE_EXTENSION;

fn has_deflate_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.len() > DEFLATE_EXTENSION.len() && n.ends_with(DEFLATE_EXTENSION))
}

/// Expand a mixed list of file and directory paths into a flat list of inputs.
///
/// Entries come out in walk order, sorted by file name within each directory,
/// so repeated runs see the same sequence.  The first unreadable directory
/// entry aborts the walk with an `io::Error`.
pub fn create_file_list<P: AsRef<Path>>(inputs: &[P]) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            result.push(input.to_path_buf());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                e.io_error()
                    .map(|io| io::Error::new(io.kind(), io.to_string()))
                    .unwrap_or_else(|| io::Error::other(e.to_string()))
            })?;
            if entry.file_type().is_file() && has_deflate_extension(entry.path()) {
                result.push(entry.into_path());
            }
        }
    }
    Ok(result)
}
