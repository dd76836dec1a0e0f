//! Whole-file and raw-deflate decompression helpers.
//!
//! - `.idx.gz` index files are ordinary gzip files read fully into memory.
//! - `.dict.dz` chunks are raw deflate streams ending in a sync flush, so
//!   they are inflated with the low-level [`Decompress`] API instead of a
//!   reader that expects a final block.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use log::trace;

use crate::stardict::types::error::{Result, StardictError};

/// Decompresses a gzip file, requiring exactly `expected_size` bytes of output.
pub fn gunzip_file(path: &Path, expected_size: u64) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut output = Vec::with_capacity(expected_size as usize);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| StardictError::DecompressionError(format!("gzip {}: {}", path.display(), e)))?;

    trace!("Decompressed {}: {} bytes", path.display(), output.len());
    if output.len() as u64 != expected_size {
        return Err(StardictError::SizeMismatch {
            context: format!("decompressed {}", path.display()),
            expected: expected_size,
            found: output.len() as u64,
        });
    }
    Ok(output)
}

/// Inflates one raw deflate chunk into `output`.
///
/// `max_size` bounds the output; the chunk may decompress to less (the last
/// chunk of a dictzip file usually does).
pub fn inflate_chunk_into(output: &mut Vec<u8>, payload: &[u8], max_size: usize) -> Result<()> {
    output.clear();
    output.reserve(max_size);
    let mut inflater = Decompress::new(false);

    loop {
        let consumed = inflater.total_in() as usize;
        let before_out = inflater.total_out();
        let status = inflater
            .decompress_vec(&payload[consumed..], output, FlushDecompress::Sync)
            .map_err(|e| StardictError::DecompressionError(format!("deflate chunk: {}", e)))?;

        let done = inflater.total_in() as usize >= payload.len() || output.len() >= max_size;
        let stalled =
            inflater.total_out() == before_out && inflater.total_in() as usize == consumed;
        if status == Status::StreamEnd || done {
            break;
        }
        if stalled {
            return Err(StardictError::DecompressionError(
                "deflate chunk made no progress".to_string(),
            ));
        }
        if output.len() == output.capacity() {
            output.reserve(max_size.saturating_sub(output.len()).max(1));
        }
    }

    if output.len() > max_size {
        return Err(StardictError::SizeMismatch {
            context: "inflated dictzip chunk".to_string(),
            expected: max_size as u64,
            found: output.len() as u64,
        });
    }
    Ok(())
}
