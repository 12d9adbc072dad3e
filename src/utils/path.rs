//! Path helpers.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first. When the path does not exist yet it is kept
/// as-is if absolute, otherwise joined onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Turn a problem title into something usable as a file name.
///
/// Path separators become `_`. Surrounding whitespace and leading dots are
/// dropped so the result is never a hidden file. May be empty.
pub fn sanitize_file_name(name: &str) -> String {
    name.replace('\0', "")
        .trim()
        .trim_start_matches('.')
        .trim_start()
        .replace(['/', '\\'], "_")
}

/// Whether `path` lies under `dir` (both taken as given, no canonicalization).
pub fn is_within(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}
