//! Locating `.ifo` files below dictionary directories.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

/// Every `.ifo` file below `dir`, skipping hidden files and directories.
///
/// Files are returned in path order. Unreadable entries are skipped.
pub fn find_ifo_files(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(".ifo") {
            found.push(entry.into_path());
        }
    }
    found
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
