use std::borrow::Cow;

use tracing::debug;

use crate::errors::Result;
use crate::models::{DataModel, Version};
use crate::{base32hex, checksum, deburr, frame, lzma, serializer, validation};

/// Options for [`encode`].
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Fold diacritics in the note and beneficiary fields.
    pub deburr: bool,
    /// Validate the model before serializing.
    pub validate: bool,
    /// Format version stamped into the frame header.
    pub version: Version,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            deburr: true,
            validate: true,
            version: Version::default(),
        }
    }
}

/// Encodes a payment document into the BySquare QR string.
///
/// Pipeline: deburr, validate, tab-serialize, prepend CRC32, LZMA-compress,
/// strip the 13-byte LZMA header, frame, base32hex without padding. The
/// input model is never mutated; deburring works on an internal copy.
pub fn encode(model: &DataModel, options: EncodeOptions) -> Result<String> {
    let model: Cow<'_, DataModel> = if options.deburr {
        let mut folded = model.clone();
        deburr::deburr_model(&mut folded);
        Cow::Owned(folded)
    } else {
        Cow::Borrowed(model)
    };

    if options.validate {
        validation::validate(&model, options.version)?;
    }

    let payload = serializer::serialize(&model)?;
    let checked = checksum::prepend_checksum(&payload);
    debug!(payload_len = payload.len(), "payload serialized");

    let compressed = lzma::compress(&checked)?;
    let body = &compressed[lzma::HEADER_LEN..];
    debug!(body_len = body.len(), "payload compressed");

    let framed = frame::assemble(options.version, checked.len(), body)?;

    Ok(base32hex::encode(&framed, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::errors::BySquareError;
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
    fn encode_produces_base32hex_without_padding() {
        let qr = encode(&sample_model(), EncodeOptions::default()).unwrap();

        assert!(!qr.is_empty());
        assert!(!qr.contains('='));
        assert!(qr
            .chars()
            .all(|c| "0123456789ABCDEFGHIJKLMNOPQRSTUV".contains(c)));
    }

    #[test]
    fn encode_is_deterministic() {
        let first = encode(&sample_model(), EncodeOptions::default()).unwrap();
        let second = encode(&sample_model(), EncodeOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_restores_the_model() {
        let model = sample_model();
        let qr = encode(&model, EncodeOptions::default()).unwrap();
        assert_eq!(decode(&qr).unwrap(), model);
    }

    #[test]
    fn round_trip_folds_diacritics_when_deburring() {
        let mut model = sample_model();
        model.payments[0].payment_note = Some("úhrada za Žilinu".to_string());
        model.payments[0].beneficiary = Some(Beneficiary {
            name: "Ján Kováč".to_string(),
            street: None,
            city: Some("Košice".to_string()),
        });

        let qr = encode(&model, EncodeOptions::default()).unwrap();
        let decoded = decode(&qr).unwrap();

        let payment = &decoded.payments[0];
        assert_eq!(payment.payment_note.as_deref(), Some("uhrada za Zilinu"));
        let beneficiary = payment.beneficiary.as_ref().unwrap();
        assert_eq!(beneficiary.name, "Jan Kovac");
        assert_eq!(beneficiary.city.as_deref(), Some("Kosice"));
    }

    #[test]
    fn round_trip_preserves_diacritics_without_deburr() {
        let mut model = sample_model();
        model.payments[0].payment_note = Some("úhrada".to_string());

        let options = EncodeOptions {
            deburr: false,
            ..Default::default()
        };
        let qr = encode(&model, options).unwrap();

        assert_eq!(decode(&qr).unwrap(), model);
    }

    #[test]
    fn encode_does_not_mutate_the_input() {
        let mut model = sample_model();
        model.payments[0].payment_note = Some("úhrada".to_string());
        let before = model.clone();

        encode(&model, EncodeOptions::default()).unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn validation_failures_surface() {
        let mut model = sample_model();
        model.payments[0].bank_accounts[0].iban = "INVALID".to_string();

        assert!(matches!(
            encode(&model, EncodeOptions::default()),
            Err(BySquareError::InvalidIban { .. })
        ));
    }

    #[test]
    fn validation_can_be_skipped() {
        let mut model = sample_model();
        model.payments[0].bank_accounts[0].iban = "XX0000".to_string();

        let options = EncodeOptions {
            validate: false,
            ..Default::default()
        };
        let qr = encode(&model, options).unwrap();
        assert_eq!(decode(&qr).unwrap(), model);
    }

    #[test]
    fn older_versions_do_not_require_a_beneficiary() {
        let mut model = sample_model();
        model.payments[0].beneficiary = None;

        assert!(matches!(
            encode(&model, EncodeOptions::default()),
            Err(BySquareError::MissingBeneficiaryName { .. })
        ));

        let options = EncodeOptions {
            version: Version::V1_0_0,
            ..Default::default()
        };
        let qr = encode(&model, options).unwrap();
        assert_eq!(decode(&qr).unwrap(), model);
    }
}
