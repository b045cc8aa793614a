use std::path::{Path, PathBuf};

/// List all regular files under `dir`, recursively.
///
/// Returns an empty list if `dir` does not exist or is not a directory.
pub fn files_recursively(dir: &Path) -> Vec<PathBuf> {
    let mut result = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return result,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            result.extend(files_recursively(&path));
        } else {
            result.push(path);
        }
    }
    result
}

/// True if `path` does not exist, or is a directory containing no files
/// at any depth.
pub fn is_missing_or_empty_dir(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    path.is_dir() && files_recursively(path).is_empty()
}
