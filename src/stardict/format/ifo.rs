//! `.ifo` description file parsing.
//!
//! # File Structure
//! ```text
//! [optional UTF-8 BOM]
//! StarDict's dict ifo file
//! version=2.4.2
//! wordcount=1234
//! idxfilesize=56789
//! bookname=Some Dictionary
//! sametypesequence=m
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::stardict::types::error::{Result, StardictError};
use crate::stardict::types::models::DictInfo;

const DICT_MAGIC: &str = "StarDict's dict ifo file";
const UTF8_BOM: &str = "\u{feff}";

/// Splits the body of an `.ifo` file into its `key=value` pairs.
///
/// Lines without `=` are ignored; the value is everything after the first `=`.
pub fn parse_pairs(content: &str) -> Result<HashMap<String, String>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let body = content
        .strip_prefix(DICT_MAGIC)
        .ok_or_else(|| StardictError::InvalidFormat("Missing ifo magic line".to_string()))?;

    let pairs = body
        .split(['\r', '\n'])
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    Ok(pairs)
}

/// Reads and validates a dictionary's `.ifo` file.
pub fn load(path: &Path) -> Result<DictInfo> {
    debug!("Parsing ifo file: {}", path.display());
    let content = fs::read_to_string(path)?;
    let pairs = parse_pairs(&content)?;
    build_info(path, &pairs)
}

fn build_info(path: &Path, pairs: &HashMap<String, String>) -> Result<DictInfo> {
    let required = |key: &'static str| pairs.get(key).ok_or(StardictError::MissingKey(key));
    let optional = |key: &str| pairs.get(key).cloned();

    let word_count = parse_number("wordcount", required("wordcount")?)?;
    if word_count == 0 {
        return Err(StardictError::InvalidFormat("wordcount is zero".to_string()));
    }
    let index_file_size = parse_number("idxfilesize", required("idxfilesize")?)?;
    let bookname = required("bookname")?.clone();
    let syn_word_count = match pairs.get("synwordcount") {
        Some(value) => parse_number("synwordcount", value)?,
        None => 0,
    };

    if let Some(bits) = pairs.get("idxoffsetbits") {
        if bits.trim() != "32" {
            return Err(StardictError::UnsupportedFormat(format!("idxoffsetbits={}", bits)));
        }
    }

    let same_type_sequence = optional("sametypesequence").filter(|seq| !seq.is_empty());
    trace!(
        "ifo '{}': wordcount={}, idxfilesize={}, synwordcount={}, sametypesequence={:?}",
        bookname, word_count, index_file_size, syn_word_count, same_type_sequence
    );

    Ok(DictInfo {
        ifo_path: path.to_path_buf(),
        bookname,
        word_count,
        syn_word_count,
        index_file_size,
        same_type_sequence,
        version: optional("version"),
        author: optional("author"),
        email: optional("email"),
        website: optional("website"),
        date: optional("date"),
        description: optional("description"),
    })
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            StardictError::InvalidFormat(format!("Invalid number for {}: {:?}", key, value))
        })
}
