use std::io::{Read, Write};

use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

use crate::errors::{BySquareError, Result};

/// Legacy LZMA-alone header: 1 properties byte, 4 bytes dictionary size,
/// 8 bytes uncompressed size, all little-endian.
pub const HEADER_LEN: usize = 13;

/// Properties byte for lc=3, lp=0, pb=2: (pb * 5 + lp) * 9 + lc = 0x5D.
const PROPERTIES: u8 = 0x5D;

/// Dictionary size fixed by the format at 2^17 bytes.
pub const DICTIONARY_SIZE: u32 = 131_072;

fn compression_error(err: impl ToString) -> BySquareError {
    BySquareError::Compression(err.to_string())
}

fn decompression_error(err: impl ToString) -> BySquareError {
    BySquareError::Decompression(err.to_string())
}

fn encoder_options() -> Result<LzmaOptions> {
    let mut options = LzmaOptions::new_preset(6).map_err(compression_error)?;
    options
        .dict_size(DICTIONARY_SIZE)
        .literal_context_bits(3)
        .literal_position_bits(0)
        .position_bits(2);
    Ok(options)
}

/// Compresses `data` with LZMA1, returning the complete legacy stream
/// including its 13-byte header. The frame codec strips the header before
/// transmission; everything in it is constant apart from the uncompressed
/// size, which travels in the outer length field instead.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let options = encoder_options()?;
    let stream = Stream::new_lzma_encoder(&options).map_err(compression_error)?;

    let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
    encoder.write_all(data).map_err(compression_error)?;
    let compressed = encoder.finish().map_err(compression_error)?;

    if compressed.len() < HEADER_LEN {
        return Err(compression_error("stream shorter than its header"));
    }

    Ok(compressed)
}

/// Rebuilds the 13-byte header stripped by the frame codec. The size field
/// is the framed uncompressed length as 4 little-endian bytes followed by
/// four zero bytes.
fn synthesize_header(uncompressed_len: u16) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[0] = PROPERTIES;
    header[1..5].copy_from_slice(&DICTIONARY_SIZE.to_le_bytes());
    header[5..9].copy_from_slice(&u32::from(uncompressed_len).to_le_bytes());
    // header[9..13] stays zero
    header
}

/// Decompresses a headerless LZMA1 body into exactly `uncompressed_len`
/// bytes.
pub fn decompress(body: &[u8], uncompressed_len: u16) -> Result<Vec<u8>> {
    let header = synthesize_header(uncompressed_len);
    let stream = Stream::new_lzma_decoder(u64::MAX).map_err(decompression_error)?;

    let mut decoder = XzDecoder::new_stream(header.as_slice().chain(body), stream);
    let mut decompressed = Vec::with_capacity(usize::from(uncompressed_len));
    decoder
        .read_to_end(&mut decompressed)
        .map_err(decompression_error)?;

    if decompressed.len() != usize::from(uncompressed_len) {
        return Err(decompression_error(format!(
            "expected {} bytes, got {}",
            uncompressed_len,
            decompressed.len()
        )));
    }

    Ok(decompressed)
}
