//! Shared utility functions for cmdfacts crates

use std::path::{Path, PathBuf};

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_path(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
