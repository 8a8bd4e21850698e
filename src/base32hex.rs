use crate::errors::{BySquareError, Result};

/// RFC 4648 extended-hex alphabet. Chosen by the format because it keeps
/// the encoded text within the QR alphanumeric character set.
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

const BITS_PER_SYMBOL: u32 = 5;
const SYMBOL_MASK: u32 = 0b11111;

/// Encodes bytes to base32hex by repacking 8-bit bytes into 5-bit symbols.
///
/// Trailing bits that do not fill a whole symbol are left-shifted to the
/// symbol's high bits. With `pad` the output is extended with `=` to a
/// multiple of 8 symbols; the QR payload itself is emitted unpadded.
pub fn encode(input: &[u8], pad: bool) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut output = String::with_capacity(input.len().div_ceil(5) * 8);
    let mut buffer = 0u32;
    let mut bits_left = 0u32;

    for &byte in input {
        buffer = (buffer << 8) | u32::from(byte);
        bits_left += 8;

        while bits_left >= BITS_PER_SYMBOL {
            bits_left -= BITS_PER_SYMBOL;
            let index = (buffer >> bits_left) & SYMBOL_MASK;
            output.push(ALPHABET[index as usize] as char);
        }
    }

    if bits_left > 0 {
        let index = (buffer << (BITS_PER_SYMBOL - bits_left)) & SYMBOL_MASK;
        output.push(ALPHABET[index as usize] as char);
    }

    if pad {
        let padded_len = output.len().div_ceil(8) * 8;
        for _ in output.len()..padded_len {
            output.push('=');
        }
    }

    output
}

fn symbol_value(symbol: u8) -> Result<u32> {
    match symbol {
        b'0'..=b'9' => Ok(u32::from(symbol - b'0')),
        b'A'..=b'V' => Ok(u32::from(symbol - b'A') + 10),
        _ => Err(BySquareError::InvalidBase32Hex),
    }
}

/// Decodes a base32hex string back to bytes.
///
/// In `loose` mode the input is uppercased and `=`-padded to a multiple of
/// 8 symbols first; scanner output routinely arrives lowercased with the
/// trailing padding dropped. Trailing bits short of a whole byte are the
/// encoder's pad bits and are discarded.
pub fn decode(input: &str, loose: bool) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let normalized;
    let input = if loose {
        normalized = input.to_ascii_uppercase();
        normalized.as_str()
    } else {
        input
    };

    let symbols = input.trim_end_matches('=').as_bytes();

    let mut output = Vec::with_capacity(symbols.len() * 5 / 8);
    let mut buffer = 0u32;
    let mut bits_left = 0u32;

    for &symbol in symbols {
        buffer = (buffer << BITS_PER_SYMBOL) | symbol_value(symbol)?;
        bits_left += BITS_PER_SYMBOL;

        if bits_left >= 8 {
            bits_left -= 8;
            output.push(((buffer >> bits_left) & 0xFF) as u8);
        }
    }

    Ok(output)
}
