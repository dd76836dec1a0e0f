//! Low-level byte reading utilities and headword comparators.

use std::cmp::Ordering;

use byteorder::{BigEndian, ByteOrder};

use super::types::error::{Result, StardictError};

/// Comparator used for binary search over headwords.
pub type KeyCmp = fn(&str, &str) -> Ordering;

/// ASCII case-insensitive byte comparison (`strcasecmp`).
pub fn ascii_casecmp(a: &str, b: &str) -> Ordering {
    let lhs = a.bytes().map(|c| c.to_ascii_lowercase());
    let rhs = b.bytes().map(|c| c.to_ascii_lowercase());
    lhs.cmp(rhs)
}

/// The ordering every StarDict index is sorted by.
///
/// Case-insensitive comparison first, exact byte comparison as the tie-break.
pub fn stardict_strcmp(a: &str, b: &str) -> Ordering {
    match ascii_casecmp(a, b) {
        Ordering::Equal => a.as_bytes().cmp(b.as_bytes()),
        other => other,
    }
}

/// Splits a NUL-terminated byte string off the front of `reader`.
///
/// Returns the bytes before the terminator and advances past it.
pub fn read_cstr<'a>(reader: &mut &'a [u8]) -> Result<&'a [u8]> {
    let end = reader
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| StardictError::Corrupt("Missing null terminator in string".to_string()))?;
    let text = &reader[..end];
    *reader = &reader[end + 1..];
    Ok(text)
}

/// Reads a 4-byte big-endian number and advances the slice.
pub fn read_be_u32(reader: &mut &[u8]) -> Result<u32> {
    if reader.len() < 4 {
        return Err(StardictError::Corrupt(format!(
            "Expected 4 bytes for a number, found {}",
            reader.len()
        )));
    }
    let value = BigEndian::read_u32(&reader[..4]);
    *reader = &reader[4..];
    Ok(value)
}

/// Decodes headword bytes, replacing invalid UTF-8 sequences with U+FFFD.
///
/// Invalid bytes and the replacement's lead byte are both at least 0x80, so a
/// replaced headword keeps its position relative to ASCII headwords. Among
/// non-ASCII headwords the replaced text may sort differently from the raw
/// bytes; such keys are returned replaced and are only found by their
/// replaced spelling.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
