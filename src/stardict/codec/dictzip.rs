//! Random-access reader for dictzip (`.dict.dz`) article files.
//!
//! # File Structure
//! ```text
//! [10 bytes] gzip header: 1f 8b 08 FLG MTIME(4) XFL OS
//! [2 bytes]  XLEN (little-endian), present because FLG.FEXTRA is set
//! [XLEN]     extra subfields; the 'R' 'A' subfield holds:
//!              VER(2) CHLEN(2) CHCNT(2) then CHCNT compressed chunk sizes (2 each)
//! [...]      optional FNAME / FCOMMENT (NUL-terminated), FHCRC (2 bytes)
//! [...]      CHCNT raw deflate chunks, each inflating to at most CHLEN bytes
//! ```
//!
//! Every chunk is flushed independently, so any byte range can be served by
//! inflating only the chunks that cover it.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use log::{debug, trace};

use super::compression;
use crate::stardict::types::error::{Result, StardictError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const DEFLATE_METHOD: u8 = 8;
const FLAG_HCRC: u8 = 0x02;
const FLAG_EXTRA: u8 = 0x04;
const FLAG_NAME: u8 = 0x08;
const FLAG_COMMENT: u8 = 0x10;

#[derive(Debug)]
pub struct DictZip {
    file: File,
    /// Uncompressed size of every chunk but possibly the last.
    chunk_len: usize,
    /// File offset of each chunk, followed by the end of the last chunk.
    chunk_offsets: Vec<u64>,
    cached_chunk: Option<usize>,
    cached_data: Vec<u8>,
    compressed: Vec<u8>,
}

impl DictZip {
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let (chunk_len, chunk_sizes, data_start) = parse_header(&mut reader)?;

        let mut chunk_offsets = Vec::with_capacity(chunk_sizes.len() + 1);
        let mut offset = data_start;
        for size in &chunk_sizes {
            chunk_offsets.push(offset);
            offset += *size as u64;
        }
        chunk_offsets.push(offset);

        debug!(
            "Opened dictzip {}: {} chunks of {} bytes",
            path.display(),
            chunk_sizes.len(),
            chunk_len
        );
        Ok(Self {
            file: reader.into_inner(),
            chunk_len,
            chunk_offsets,
            cached_chunk: None,
            cached_data: Vec::new(),
            compressed: Vec::new(),
        })
    }

    fn chunk_count(&self) -> usize {
        self.chunk_offsets.len() - 1
    }

    /// Reads `size` uncompressed bytes starting at `offset`.
    pub fn read(&mut self, offset: u32, size: u32) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(size as usize);
        let mut pos = offset as usize;
        let end = pos + size as usize;

        while pos < end {
            let chunk = pos / self.chunk_len;
            if chunk >= self.chunk_count() {
                return Err(StardictError::Corrupt(format!(
                    "Offset {} lies past the last dictzip chunk",
                    pos
                )));
            }
            self.load_chunk(chunk)?;

            let start_in_chunk = pos - chunk * self.chunk_len;
            let available = self.cached_data.len().saturating_sub(start_in_chunk);
            if available == 0 {
                return Err(StardictError::SizeMismatch {
                    context: format!("dictzip chunk {}", chunk),
                    expected: (start_in_chunk + 1) as u64,
                    found: self.cached_data.len() as u64,
                });
            }
            let take = available.min(end - pos);
            out.extend_from_slice(&self.cached_data[start_in_chunk..start_in_chunk + take]);
            pos += take;
        }
        Ok(out)
    }

    fn load_chunk(&mut self, chunk: usize) -> Result<()> {
        if self.cached_chunk == Some(chunk) {
            return Ok(());
        }
        let start = self.chunk_offsets[chunk];
        let len = (self.chunk_offsets[chunk + 1] - start) as usize;
        self.compressed.resize(len, 0);
        self.file.seek(SeekFrom::Start(start))?;
        self.file.read_exact(&mut self.compressed).map_err(|_| StardictError::SizeMismatch {
            context: format!("compressed dictzip chunk {}", chunk),
            expected: len as u64,
            found: 0,
        })?;

        trace!("Inflating dictzip chunk {} ({} bytes)", chunk, len);
        self.cached_chunk = None;
        compression::inflate_chunk_into(&mut self.cached_data, &self.compressed, self.chunk_len)?;
        self.cached_chunk = Some(chunk);
        Ok(())
    }
}

/// Parses the gzip header and returns `(chunk_len, chunk_sizes, data_start)`.
fn parse_header<R: Read>(reader: &mut R) -> Result<(usize, Vec<u16>, u64)> {
    let mut fixed = [0u8; 10];
    reader.read_exact(&mut fixed)?;
    if fixed[..2] != GZIP_MAGIC || fixed[2] != DEFLATE_METHOD {
        return Err(StardictError::InvalidFormat("Not a gzip file".to_string()));
    }
    let flags = fixed[3];
    if flags & FLAG_EXTRA == 0 {
        return Err(StardictError::InvalidFormat(
            "gzip file has no extra field; not a dictzip file".to_string(),
        ));
    }
    let mut pos = fixed.len() as u64;

    let extra_len = reader.read_u16::<LittleEndian>()? as usize;
    let mut extra = vec![0u8; extra_len];
    reader.read_exact(&mut extra)?;
    pos += 2 + extra_len as u64;
    let (chunk_len, chunk_sizes) = find_random_access_field(&extra)?;

    if flags & FLAG_NAME != 0 {
        pos += skip_cstr(reader)?;
    }
    if flags & FLAG_COMMENT != 0 {
        pos += skip_cstr(reader)?;
    }
    if flags & FLAG_HCRC != 0 {
        reader.read_u16::<LittleEndian>()?;
        pos += 2;
    }
    Ok((chunk_len, chunk_sizes, pos))
}

/// Locates the `RA` subfield among the gzip extra subfields.
fn find_random_access_field(mut extra: &[u8]) -> Result<(usize, Vec<u16>)> {
    while extra.len() >= 4 {
        let id = [extra[0], extra[1]];
        let len = LittleEndian::read_u16(&extra[2..4]) as usize;
        let body = extra.get(4..4 + len).ok_or_else(|| {
            StardictError::InvalidFormat("Truncated gzip extra subfield".to_string())
        })?;
        if &id == b"RA" {
            return parse_random_access(body);
        }
        extra = &extra[4 + len..];
    }
    Err(StardictError::InvalidFormat("Missing dictzip RA subfield".to_string()))
}

fn parse_random_access(mut body: &[u8]) -> Result<(usize, Vec<u16>)> {
    let _version = body.read_u16::<LittleEndian>()?;
    let chunk_len = body.read_u16::<LittleEndian>()? as usize;
    let chunk_count = body.read_u16::<LittleEndian>()? as usize;
    if chunk_len == 0 {
        return Err(StardictError::InvalidFormat("dictzip chunk length is zero".to_string()));
    }
    let sizes = (0..chunk_count)
        .map(|_| body.read_u16::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;
    Ok((chunk_len, sizes))
}

fn skip_cstr<R: Read>(reader: &mut R) -> Result<u64> {
    let mut skipped = 0u64;
    loop {
        skipped += 1;
        if reader.read_u8()? == 0 {
            return Ok(skipped);
        }
    }
}
