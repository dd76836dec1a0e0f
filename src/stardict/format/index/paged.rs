//! Page-cached reader for plain `.idx` index files.
//!
//! The index is split into pages of [`ENTRIES_PER_PAGE`] entries. Only the
//! page start offsets are kept in memory (see [`offset_cache`]); a lookup
//! first binary-searches the first headword of each page, then decodes the
//! one page that can contain the query.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::common::{self, ENTRY_TRAILER_LEN};
use super::{offset_cache, IndexFile};
use crate::stardict::types::error::{Result, StardictError};
use crate::stardict::types::models::{IndexEntry, ENTRIES_PER_PAGE, INVALID_INDEX};
use crate::stardict::utils::{self, KeyCmp};

/// Headwords are shorter than 256 bytes, so this many bytes always cover a
/// page's first record.
const MAX_HEAD_READ: usize = 256 + ENTRY_TRAILER_LEN;

/// First headword of a page, memoized to save disk reads during the page search.
#[derive(Debug)]
struct PageHead {
    page: usize,
    key: String,
}

/// The single decoded page kept resident.
#[derive(Debug, Default)]
struct Page {
    index: Option<usize>,
    entries: Vec<IndexEntry>,
    data: Vec<u8>,
}

#[derive(Debug)]
pub struct PagedIndex {
    path: PathBuf,
    file: File,
    word_count: usize,
    /// Start offset of every page followed by the end offset of the last one.
    offsets: Vec<u32>,
    first: PageHead,
    middle: PageHead,
    last: PageHead,
    real_last: String,
    page: Page,
    head_buf: Vec<u8>,
}

impl PagedIndex {
    /// Opens `path`, using or rebuilding the persisted page offsets.
    pub fn load(
        path: &Path,
        word_count: u32,
        file_size: u32,
        cache_dir: Option<&Path>,
    ) -> Result<Self> {
        let word_count = word_count as usize;
        if word_count == 0 {
            return Err(StardictError::InvalidFormat("Index has no entries".to_string()));
        }
        let offset_count = (word_count - 1) / ENTRIES_PER_PAGE + 2;

        let offsets = match offset_cache::load(path, offset_count, cache_dir) {
            Some(offsets) => offsets,
            None => {
                let offsets = scan_page_offsets(path, word_count, file_size)?;
                if offset_cache::save(path, &offsets, cache_dir).is_none() {
                    warn!("Offset cache update failed for {}", path.display());
                }
                offsets
            }
        };

        let mut file = File::open(path)?;
        let mut head_buf = Vec::with_capacity(MAX_HEAD_READ);
        let last_page = offset_count - 2;
        let middle_page = last_page / 2;
        let mut head = |page: usize| -> Result<PageHead> {
            let key = read_page_head(&mut file, &offsets, page, &mut head_buf)?;
            Ok(PageHead { page, key })
        };
        let first = head(0)?;
        let last = head(last_page)?;
        let middle = head(middle_page)?;

        let mut index = Self {
            path: path.to_path_buf(),
            file,
            word_count,
            offsets,
            first,
            middle,
            last,
            real_last: String::new(),
            page: Page::default(),
            head_buf,
        };
        index.real_last = index.key(word_count - 1)?.to_string();

        info!(
            "Loaded index {}: {} entries in {} pages",
            index.path.display(),
            word_count,
            index.page_count()
        );
        Ok(index)
    }

    fn page_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of entries stored on `page`; only the last page may be short.
    fn entries_on_page(&self, page: usize) -> usize {
        if page == self.page_count() - 1 {
            match self.word_count % ENTRIES_PER_PAGE {
                0 => ENTRIES_PER_PAGE,
                rest => rest,
            }
        } else {
            ENTRIES_PER_PAGE
        }
    }

    /// Makes `page` the resident page and returns its entry count.
    fn load_page(&mut self, page: usize) -> Result<usize> {
        let count = self.entries_on_page(page);
        if self.page.index == Some(page) {
            return Ok(count);
        }

        let start = self.offsets[page] as u64;
        let len = page_len(&self.offsets, page)?;
        self.page.data.resize(len, 0);
        self.file.seek(SeekFrom::Start(start))?;
        read_exact_or_corrupt(&mut self.file, &mut self.page.data, "index page")?;

        let mut reader = self.page.data.as_slice();
        let entries = (0..count)
            .map(|_| common::parse_entry(&mut reader))
            .collect::<Result<Vec<_>>>()?;
        self.page.entries = entries;
        self.page.index = Some(page);
        Ok(count)
    }

    /// Compares `query` with the first headword of `page`, preferring memoized keys.
    fn cmp_page_head(&mut self, query: &str, page: usize, cmp: KeyCmp) -> Result<Ordering> {
        let memoized = match page.cmp(&self.middle.page) {
            Ordering::Less if page == self.first.page => Some(&self.first.key),
            Ordering::Greater if page == self.last.page => Some(&self.last.key),
            Ordering::Equal => Some(&self.middle.key),
            _ => None,
        };
        if let Some(key) = memoized {
            return Ok(cmp(query, key));
        }
        let key = read_page_head(&mut self.file, &self.offsets, page, &mut self.head_buf)?;
        Ok(cmp(query, &key))
    }
}

impl IndexFile for PagedIndex {
    fn len(&self) -> usize {
        self.word_count
    }

    fn entry(&mut self, idx: usize) -> Result<&IndexEntry> {
        if idx >= self.word_count {
            return Err(StardictError::IndexOutOfRange { index: idx, len: self.word_count });
        }
        self.load_page(idx / ENTRIES_PER_PAGE)?;
        Ok(&self.page.entries[idx % ENTRIES_PER_PAGE])
    }

    fn lookup(&mut self, query: &str, cmp: KeyCmp) -> Result<(bool, i64)> {
        if cmp(query, &self.first.key) == Ordering::Less {
            return Ok((false, 0));
        }
        if cmp(query, &self.real_last) == Ordering::Greater {
            return Ok((false, INVALID_INDEX));
        }

        // Locate the page whose first headword is the greatest one <= query.
        let mut from: i64 = 0;
        let mut to: i64 = self.page_count() as i64 - 1;
        while from <= to {
            let middle = (from + to) / 2;
            match self.cmp_page_head(query, middle as usize, cmp)? {
                Ordering::Greater => from = middle + 1,
                Ordering::Less => to = middle - 1,
                Ordering::Equal => return Ok((true, middle * ENTRIES_PER_PAGE as i64)),
            }
        }
        let page = to as usize;

        // Slot 0 was already compared during the page search.
        let count = self.load_page(page)?;
        let mut from: i64 = 1;
        let mut to: i64 = count as i64 - 1;
        let base = (page * ENTRIES_PER_PAGE) as i64;
        while from <= to {
            let middle = (from + to) / 2;
            match cmp(query, &self.page.entries[middle as usize].key) {
                Ordering::Greater => from = middle + 1,
                Ordering::Less => to = middle - 1,
                Ordering::Equal => return Ok((true, base + middle)),
            }
        }
        Ok((false, base + from))
    }
}

/// Walks the whole index once and records where every page starts.
fn scan_page_offsets(path: &Path, word_count: usize, file_size: u32) -> Result<Vec<u32>> {
    let data = fs::read(path)?;
    let file_size = file_size as usize;
    if data.len() < file_size {
        return Err(StardictError::SizeMismatch {
            context: format!("index file {}", path.display()),
            expected: file_size as u64,
            found: data.len() as u64,
        });
    }
    let data = &data[..file_size];

    let mut offsets = Vec::with_capacity((word_count - 1) / ENTRIES_PER_PAGE + 2);
    let mut pos = 0usize;
    for i in 0..word_count {
        if i % ENTRIES_PER_PAGE == 0 {
            offsets.push(pos as u32);
        }
        pos += common::entry_len(&data[pos..]).ok_or_else(|| {
            StardictError::Corrupt(format!("Index entry {} is truncated in {}", i, path.display()))
        })?;
    }
    offsets.push(pos as u32);
    Ok(offsets)
}

fn page_len(offsets: &[u32], page: usize) -> Result<usize> {
    offsets[page + 1]
        .checked_sub(offsets[page])
        .map(|len| len as usize)
        .ok_or_else(|| StardictError::Corrupt(format!("Page {} has a negative length", page)))
}

/// Reads the first headword of `page` straight from disk.
fn read_page_head(
    file: &mut File,
    offsets: &[u32],
    page: usize,
    buf: &mut Vec<u8>,
) -> Result<String> {
    let len = page_len(offsets, page)?.min(MAX_HEAD_READ);
    buf.resize(len, 0);
    file.seek(SeekFrom::Start(offsets[page] as u64))?;
    read_exact_or_corrupt(file, buf, "page head")?;
    let mut reader = buf.as_slice();
    let key = utils::read_cstr(&mut reader)?;
    Ok(utils::decode_text(key))
}

/// Fills `buf` completely; a short read means the file disagrees with its offsets.
fn read_exact_or_corrupt(file: &mut File, buf: &mut [u8], context: &str) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => {
                return Err(StardictError::SizeMismatch {
                    context: context.to_string(),
                    expected: buf.len() as u64,
                    found: filled as u64,
                })
            }
            n => filled += n,
        }
    }
    Ok(())
}
