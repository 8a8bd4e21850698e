use crate::errors::{BySquareError, Result};
use crate::models::Version;

/// Upper bound on the checksum+payload buffer, fixed by the format at the
/// LZMA dictionary size (2^17 bytes).
pub const MAX_UNCOMPRESSED_SIZE: usize = 131_072;

/// Parsed 2-byte BySquare header: four 4-bit fields, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub bysquare_type: u8,
    pub version: u8,
    pub document_type: u8,
    pub reserved: u8,
}

/// The PAY document type: `bysquare_type`, `document_type` and `reserved`
/// are all zero; only the version nibble varies.
fn header_bytes(version: Version) -> [u8; 2] {
    [version.as_u8() & 0x0F, 0x00]
}

/// Assembles the frame transmitted inside the QR code:
/// `header(2) || uncompressed_length(2, LE) || lzma_body`.
pub fn assemble(version: Version, uncompressed_len: usize, lzma_body: &[u8]) -> Result<Vec<u8>> {
    if uncompressed_len >= MAX_UNCOMPRESSED_SIZE {
        return Err(BySquareError::Serialization(format!(
            "payload length {uncompressed_len} exceeds maximum {MAX_UNCOMPRESSED_SIZE}"
        )));
    }
    let length = u16::try_from(uncompressed_len).map_err(|_| {
        BySquareError::Serialization(format!(
            "payload length {uncompressed_len} does not fit the 16-bit length field"
        ))
    })?;

    let mut frame = Vec::with_capacity(4 + lzma_body.len());
    frame.extend_from_slice(&header_bytes(version));
    frame.extend_from_slice(&length.to_le_bytes());
    frame.extend_from_slice(lzma_body);
    Ok(frame)
}

/// Splits a decoded frame into its header, uncompressed length and LZMA body.
pub fn parse(bytes: &[u8]) -> Result<(Header, u16, &[u8])> {
    if bytes.len() < 4 {
        return Err(BySquareError::InvalidHeader("frame shorter than 4 bytes"));
    }

    let header = Header {
        bysquare_type: (bytes[0] >> 4) & 0x0F,
        version: bytes[0] & 0x0F,
        document_type: (bytes[1] >> 4) & 0x0F,
        reserved: bytes[1] & 0x0F,
    };
    let uncompressed_len = u16::from_le_bytes([bytes[2], bytes[3]]);

    Ok((header, uncompressed_len, &bytes[4..]))
}
