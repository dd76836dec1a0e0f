//! Persisted page-offset table for [`PagedIndex`](super::paged::PagedIndex).
//!
//! Computing page boundaries requires a scan of the whole index, so the
//! result is stored next to the index (or in a cache directory) and reused
//! while it is not older than the index file.
//!
//! # File Structure
//! ```text
//! [30 bytes] "StarDict's Cache, Version: 0.2"
//! [4 bytes]  Magic number 0x51a4d1c1 (little-endian u32)
//! [4*N bytes] Page start offsets, then the end offset (little-endian u32)
//! ```
//!
//! Offsets are always written little-endian so a cache file is portable
//! between hosts.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::stardict::types::error::Result;

pub const CACHE_MAGIC: &str = "StarDict's Cache, Version: 0.2";
pub const CACHE_MAGIC_NUMBER: u32 = 0x51a4_d1c1;
const CACHE_SUFFIX: &str = ".oft";

/// Cache file locations in the order they are tried.
///
/// The sibling `<index>.oft` always comes first; the cache-directory variant
/// is only offered when that directory exists or can be created.
pub fn candidates(idx_path: &Path, cache_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut sibling = idx_path.as_os_str().to_owned();
    sibling.push(CACHE_SUFFIX);
    let mut paths = vec![PathBuf::from(sibling)];

    let (Some(dir), Some(name)) = (cache_dir, idx_path.file_name()) else {
        return paths;
    };
    if !dir.is_dir() && create_private_dir(dir).is_err() {
        debug!("Offset cache directory {} is unavailable", dir.display());
        return paths;
    }
    let mut file_name = name.to_owned();
    file_name.push(CACHE_SUFFIX);
    paths.push(dir.join(file_name));
    paths
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

/// Loads `offset_count` page offsets from the first valid cache file.
///
/// Missing, stale or malformed files are skipped; `None` means a cache miss.
pub fn load(idx_path: &Path, offset_count: usize, cache_dir: Option<&Path>) -> Option<Vec<u32>> {
    let idx_mtime = fs::metadata(idx_path).and_then(|m| m.modified()).ok()?;

    for path in candidates(idx_path, cache_dir) {
        let Ok(cache_mtime) = fs::metadata(&path).and_then(|m| m.modified()) else {
            continue;
        };
        if cache_mtime < idx_mtime {
            trace!("Offset cache {} is older than its index", path.display());
            continue;
        }
        let Ok(bytes) = fs::read(&path) else {
            continue;
        };
        match decode(&bytes, offset_count) {
            Some(offsets) => {
                debug!("Loaded offset cache {}", path.display());
                return Some(offsets);
            }
            None => trace!("Offset cache {} has a bad header or size", path.display()),
        }
    }
    None
}

/// Writes `offsets` to the first writable cache location and returns it.
pub fn save(idx_path: &Path, offsets: &[u32], cache_dir: Option<&Path>) -> Option<PathBuf> {
    let bytes = encode(offsets);
    for path in candidates(idx_path, cache_dir) {
        match write_file(&path, &bytes) {
            Ok(()) => {
                debug!("Saved offset cache {}", path.display());
                return Some(path);
            }
            Err(e) => trace!("Cannot write offset cache {}: {}", path.display(), e),
        }
    }
    None
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Serializes offsets with the cache header.
pub fn encode(offsets: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CACHE_MAGIC.len() + 4 * (offsets.len() + 1));
    out.extend_from_slice(CACHE_MAGIC.as_bytes());
    out.extend_from_slice(&CACHE_MAGIC_NUMBER.to_le_bytes());
    for &offset in offsets {
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out
}

/// Parses a cache file, requiring exactly `offset_count` offsets.
pub fn decode(bytes: &[u8], offset_count: usize) -> Option<Vec<u32>> {
    let rest = bytes.strip_prefix(CACHE_MAGIC.as_bytes())?;
    if rest.len() < 4 || LittleEndian::read_u32(&rest[..4]) != CACHE_MAGIC_NUMBER {
        return None;
    }
    let body = &rest[4..];
    if body.len() != offset_count * 4 {
        return None;
    }
    Some(body.chunks_exact(4).map(LittleEndian::read_u32).collect())
}
