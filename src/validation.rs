use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{BySquareError, Result};
use crate::models::{
    BankAccount, DataModel, PaymentType, SimplePayment, StandingOrder, Version, ALL_MONTHS_MASK,
};

static IBAN_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}$").unwrap());

static BIC_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$").unwrap());

static CURRENCY_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Validates the model before encoding, stopping at the first problem.
/// Errors carry a dotted path such as `payments[0].bankAccounts[0].iban`.
///
/// The beneficiary-name requirement entered the format with v1.2.0 and is
/// only enforced when encoding at that version.
pub fn validate(model: &DataModel, version: Version) -> Result<()> {
    if model.payments.is_empty() {
        return Err(BySquareError::Validation {
            path: "payments".to_string(),
            message: "at least one payment required".to_string(),
        });
    }

    for (index, payment) in model.payments.iter().enumerate() {
        validate_payment(payment, &format!("payments[{index}]"), version)?;
    }

    Ok(())
}

fn validate_payment(payment: &SimplePayment, path: &str, version: Version) -> Result<()> {
    if payment.bank_accounts.is_empty() {
        return Err(BySquareError::Validation {
            path: format!("{path}.bankAccounts"),
            message: "at least one bank account required".to_string(),
        });
    }

    for (index, account) in payment.bank_accounts.iter().enumerate() {
        validate_bank_account(account, &format!("{path}.bankAccounts[{index}]"))?;
    }

    if let Some(amount) = payment.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(BySquareError::Validation {
                path: format!("{path}.amount"),
                message: "amount must be a non-negative number".to_string(),
            });
        }
    }

    if let Some(currency) = &payment.currency_code {
        if !CURRENCY_SHAPE.is_match(currency) {
            return Err(BySquareError::InvalidCurrency {
                path: format!("{path}.currencyCode"),
            });
        }
    }

    if payment.standing_order_ext.is_some() && payment.payment_type != PaymentType::StandingOrder {
        return Err(BySquareError::Validation {
            path: format!("{path}.standingOrderExt"),
            message: "standing order extension requires a standing order payment".to_string(),
        });
    }

    if payment.direct_debit_ext.is_some() && payment.payment_type != PaymentType::DirectDebit {
        return Err(BySquareError::Validation {
            path: format!("{path}.directDebitExt"),
            message: "direct debit extension requires a direct debit payment".to_string(),
        });
    }

    if let Some(ext) = &payment.standing_order_ext {
        validate_standing_order(ext, &format!("{path}.standingOrderExt"))?;
    }

    if version == Version::V1_2_0 {
        let name = payment.beneficiary.as_ref().map(|b| b.name.as_str());
        if name.map_or(true, str::is_empty) {
            return Err(BySquareError::MissingBeneficiaryName {
                path: format!("{path}.beneficiary.name"),
            });
        }
    }

    Ok(())
}

fn validate_bank_account(account: &BankAccount, path: &str) -> Result<()> {
    if !is_valid_iban(&account.iban) {
        return Err(BySquareError::InvalidIban {
            path: format!("{path}.iban"),
        });
    }

    if let Some(bic) = &account.bic {
        if !is_valid_bic(bic) {
            return Err(BySquareError::InvalidBic {
                path: format!("{path}.bic"),
            });
        }
    }

    Ok(())
}

fn validate_standing_order(ext: &StandingOrder, path: &str) -> Result<()> {
    if ext.day < 1 || ext.day > 31 {
        return Err(BySquareError::Validation {
            path: format!("{path}.day"),
            message: "day must be between 1 and 31".to_string(),
        });
    }

    if ext.month & !ALL_MONTHS_MASK != 0 {
        return Err(BySquareError::Validation {
            path: format!("{path}.month"),
            message: "month flags outside January-December".to_string(),
        });
    }

    Ok(())
}

/// ISO 13616 MOD-97 check. Spaces are stripped and the input uppercased
/// before the shape check; the remainder is reduced digit by digit rather
/// than through a big-integer intermediate.
fn is_valid_iban(iban: &str) -> bool {
    let normalized: String = iban
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if !IBAN_SHAPE.is_match(&normalized) {
        return false;
    }

    let bytes = normalized.as_bytes();
    let rotated = bytes[4..].iter().chain(&bytes[..4]);

    let mut remainder: u32 = 0;
    for &byte in rotated {
        match byte {
            b'0'..=b'9' => {
                remainder = (remainder * 10 + u32::from(byte - b'0')) % 97;
            }
            b'A'..=b'Z' => {
                // Letters map to two digits: A=10 .. Z=35.
                remainder = (remainder * 100 + u32::from(byte - b'A') + 10) % 97;
            }
            _ => return false,
        }
    }

    remainder == 1
}

/// ISO 9362 shape check: 8 or 11 characters, uppercased first.
fn is_valid_bic(bic: &str) -> bool {
    BIC_SHAPE.is_match(&bic.to_ascii_uppercase())
}
