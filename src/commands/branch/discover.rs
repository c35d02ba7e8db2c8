use std::io;
use std::path::{Path, PathBuf};

/// Immediate entries of `root`, hidden ones excluded, sorted by name.
///
/// Files are returned too; the engine reports them as skipped.
pub fn discover(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}
