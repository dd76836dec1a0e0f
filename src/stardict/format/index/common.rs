//! Entry parsing shared by both index readers.

use crate::stardict::types::error::Result;
use crate::stardict::types::models::IndexEntry;
use crate::stardict::utils;

/// Bytes following each headword: a big-endian offset and size.
pub const ENTRY_TRAILER_LEN: usize = 2 * std::mem::size_of::<u32>();

/// Parses one `headword\0 offset size` record and advances the reader.
pub fn parse_entry(reader: &mut &[u8]) -> Result<IndexEntry> {
    let key = utils::read_cstr(reader)?;
    let key = utils::decode_text(key);
    let offset = utils::read_be_u32(reader)?;
    let size = utils::read_be_u32(reader)?;
    Ok(IndexEntry { key, offset, size })
}

/// Returns the on-disk length of the record at the front of `data` without decoding it.
pub fn entry_len(data: &[u8]) -> Option<usize> {
    let nul = data.iter().position(|&b| b == 0)?;
    let len = nul + 1 + ENTRY_TRAILER_LEN;
    (len <= data.len()).then_some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_consecutive_entries() {
        let data = b"ab\0\x00\x00\x00\x01\x00\x00\x00\x02c\0\x00\x00\x01\x00\x00\x00\x00\x10";
        let mut reader: &[u8] = data;
        assert_eq!(entry_len(reader), Some(11));
        let first = parse_entry(&mut reader).unwrap();
        assert_eq!((first.key.as_str(), first.offset, first.size), ("ab", 1, 2));
        let second = parse_entry(&mut reader).unwrap();
        assert_eq!((second.key.as_str(), second.offset, second.size), ("c", 256, 16));
        assert!(reader.is_empty());
    }

    #[test]
    fn truncated_entry_is_rejected() {
        let data = b"ab\0\x00\x00";
        assert_eq!(entry_len(data), None);
        let mut reader: &[u8] = data;
        assert!(parse_entry(&mut reader).is_err());
    }
}
