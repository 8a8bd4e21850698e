use crate::errors::{BySquareError, Result};

/// CRC32 (IEEE 802.3 polynomial) over the UTF-8 bytes of the payload.
pub fn checksum(payload: &str) -> u32 {
    crc32fast::hash(payload.as_bytes())
}

/// Prepends the CRC32 of `payload` as 4 little-endian bytes.
pub fn prepend_checksum(payload: &str) -> Vec<u8> {
    let crc = checksum(payload);

    let mut checked = Vec::with_capacity(4 + payload.len());
    checked.extend_from_slice(&crc.to_le_bytes());
    checked.extend_from_slice(payload.as_bytes());
    checked
}

/// Splits a decompressed buffer into its CRC32 prefix and payload, verifying
/// the checksum and that the payload is valid UTF-8.
pub fn verify_checksum(checked: &[u8]) -> Result<&str> {
    if checked.len() < 4 {
        return Err(BySquareError::Deserialization(
            "decompressed payload too short".to_string(),
        ));
    }

    let expected = u32::from_le_bytes([checked[0], checked[1], checked[2], checked[3]]);
    let payload = std::str::from_utf8(&checked[4..])
        .map_err(|_| BySquareError::Deserialization("payload is not valid UTF-8".to_string()))?;

    if checksum(payload) != expected {
        return Err(BySquareError::ChecksumMismatch);
    }

    Ok(payload)
}
