// Directory scanning helpers shared by the dataset builders.
//
// `list_files` behaves like a single-level glob: a directory that does not
// exist simply yields nothing, and callers decide whether an empty result is
// fatal. Like a shell glob it skips dot files, which keeps macOS `._*`
// sidecars out of the frame lists. Results are always sorted so pairing by
// position is deterministic.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DataResult, DatasetError};

/// Sorted regular, non-hidden files in `dir` whose file name ends with `suffix`.
pub(crate) fn list_files(dir: &Path, suffix: &str) -> DataResult<Vec<PathBuf>> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DatasetError::io(dir, e)),
    };

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| !n.starts_with('.') && n.ends_with(suffix));
        if matches {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Sorted `(name, path)` of the immediate subdirectories of `dir`.
///
/// Names are kept as `OsString`, so directories that are not valid UTF-8
/// are listed too.
pub(crate) fn list_subdirs(dir: &Path) -> DataResult<Vec<(OsString, PathBuf)>> {
    if !dir.is_dir() {
        return Err(DatasetError::missing(dir, "directory not found"));
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))? {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name() {
            out.push((name.to_os_string(), path));
        }
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}
