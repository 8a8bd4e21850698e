use tracing::debug;

use crate::errors::{BySquareError, Result};
use crate::models::{DataModel, Version};
use crate::{base32hex, checksum, frame, lzma, serializer};

/// Decodes a BySquare QR string back into the payment document.
///
/// The base32hex step runs in loose mode: lowercase input and missing `=`
/// padding are accepted, since both are routinely produced by QR scanners.
pub fn decode(qr: &str) -> Result<DataModel> {
    let bytes = base32hex::decode(qr, true)?;

    let (header, uncompressed_len, body) = frame::parse(&bytes)?;
    let version = Version::try_from(header.version)
        .map_err(BySquareError::UnsupportedVersion)?;
    debug!(?version, uncompressed_len, "frame parsed");

    let decompressed = lzma::decompress(body, uncompressed_len)?;
    let payload = checksum::verify_checksum(&decompressed)?;

    serializer::deserialize(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, EncodeOptions};
    use crate::models::{BankAccount, Beneficiary, SimplePayment};

    fn sample_model() -> DataModel {
        DataModel {
            invoice_id: Some("random-id".to_string()),
            payments: vec![SimplePayment {
                amount: Some(100.0),
                currency_code: Some("EUR".to_string()),
                variable_symbol: Some("123".to_string()),
                bank_accounts: vec![BankAccount {
                    iban: "SK9611000000002918599669".to_string(),
                    bic: None,
                }],
                beneficiary: Some(Beneficiary {
                    name: "J".to_string(),
                    street: None,
                    city: None,
                }),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn accepts_lowercase_scanner_output() {
        let model = sample_model();
        let qr = encode(&model, EncodeOptions::default()).unwrap();

        assert_eq!(decode(&qr.to_ascii_lowercase()).unwrap(), model);
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        assert!(matches!(
            decode("not base32hex!"),
            Err(BySquareError::InvalidBase32Hex)
        ));
    }

    #[test]
    fn rejects_truncated_frames() {
        // Two bytes of frame only.
        let qr = base32hex::encode(&[0x02, 0x00], false);
        assert!(matches!(
            decode(&qr),
            Err(BySquareError::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_unsupported_versions() {
        // Version nibble 3 does not exist.
        let qr = base32hex::encode(&[0x03, 0x00, 0x00, 0x00], false);
        assert!(matches!(
            decode(&qr),
            Err(BySquareError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn rejects_corrupted_compressed_body() {
        let framed = frame::assemble(Version::V1_2_0, 16, &[0xFF; 24]).unwrap();
        let qr = base32hex::encode(&framed, false);

        assert!(matches!(
            decode(&qr),
            Err(BySquareError::Decompression(_))
        ));
    }

    #[test]
    fn rejects_checksum_mismatch() {
        // Frame a payload whose CRC32 prefix is deliberately wrong.
        let payload = "\t1\t1\t\t\t\t\t\t\t\t\t1\tSK9611000000002918599669\t\t0\t0\t\t\t";
        let mut checked = (crate::checksum::checksum(payload) ^ 0xDEAD_BEEF)
            .to_le_bytes()
            .to_vec();
        checked.extend_from_slice(payload.as_bytes());

        let compressed = lzma::compress(&checked).unwrap();
        let framed = frame::assemble(
            Version::V1_2_0,
            checked.len(),
            &compressed[lzma::HEADER_LEN..],
        )
        .unwrap();
        let qr = base32hex::encode(&framed, false);

        assert!(matches!(decode(&qr), Err(BySquareError::ChecksumMismatch)));
    }

    #[test]
    fn surfaces_deserialization_errors_from_valid_frames() {
        // Valid frame and checksum around a structurally short payload.
        let payload = "only-invoice";
        let checked = checksum::prepend_checksum(payload);

        let compressed = lzma::compress(&checked).unwrap();
        let framed = frame::assemble(
            Version::V1_2_0,
            checked.len(),
            &compressed[lzma::HEADER_LEN..],
        )
        .unwrap();
        let qr = base32hex::encode(&framed, false);

        assert!(matches!(
            decode(&qr),
            Err(BySquareError::Deserialization(_))
        ));
    }
}
