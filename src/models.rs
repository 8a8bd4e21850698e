use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// BySquare format version, carried in the second nibble of the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Version {
    /// v1.0.0 - original by square specification. Released 2013-02-22.
    V1_0_0 = 0x00,

    /// v1.1.0 - added beneficiary name and address fields. Released 2015-06-24.
    V1_1_0 = 0x01,

    /// v1.2.0 - beneficiary name became a required field. Released 2025-04-01.
    #[default]
    V1_2_0 = 0x02,
}

impl Version {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Version {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Version::V1_0_0),
            0x01 => Ok(Version::V1_1_0),
            0x02 => Ok(Version::V1_2_0),
            other => Err(other),
        }
    }
}

/// Type of payment carried by a [`SimplePayment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentType {
    #[default]
    PaymentOrder = 1,
    StandingOrder = 2,
    DirectDebit = 3,
}

impl From<PaymentType> for u8 {
    fn from(value: PaymentType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for PaymentType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PaymentType::PaymentOrder),
            2 => Ok(PaymentType::StandingOrder),
            3 => Ok(PaymentType::DirectDebit),
            other => Err(format!("invalid payment type: {other}")),
        }
    }
}

/// Standing order execution frequency, a single-letter code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    #[serde(rename = "d")]
    Daily,
    #[serde(rename = "w")]
    Weekly,
    #[serde(rename = "b")]
    Biweekly,
    #[serde(rename = "m")]
    Monthly,
    #[serde(rename = "B")]
    Bimonthly,
    #[serde(rename = "q")]
    Quarterly,
    #[serde(rename = "s")]
    Semiannually,
    #[serde(rename = "a")]
    Annually,
}

impl Periodicity {
    pub fn as_letter(self) -> &'static str {
        match self {
            Periodicity::Daily => "d",
            Periodicity::Weekly => "w",
            Periodicity::Biweekly => "b",
            Periodicity::Monthly => "m",
            Periodicity::Bimonthly => "B",
            Periodicity::Quarterly => "q",
            Periodicity::Semiannually => "s",
            Periodicity::Annually => "a",
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "d" => Some(Periodicity::Daily),
            "w" => Some(Periodicity::Weekly),
            "b" => Some(Periodicity::Biweekly),
            "m" => Some(Periodicity::Monthly),
            "B" => Some(Periodicity::Bimonthly),
            "q" => Some(Periodicity::Quarterly),
            "s" => Some(Periodicity::Semiannually),
            "a" => Some(Periodicity::Annually),
            _ => None,
        }
    }
}

/// Calendar months as bit flags, as used by the standing order `month` field.
///
/// A set of months is carried on the wire as the sum of its flags, e.g.
/// January + July + October = 1 + 64 + 512 = 577.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Month {
    January = 1 << 0,
    February = 1 << 1,
    March = 1 << 2,
    April = 1 << 3,
    May = 1 << 4,
    June = 1 << 5,
    July = 1 << 6,
    August = 1 << 7,
    September = 1 << 8,
    October = 1 << 9,
    November = 1 << 10,
    December = 1 << 11,
}

/// Mask covering all twelve month bits.
pub const ALL_MONTHS_MASK: u16 = (1 << 12) - 1;

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn bit(self) -> u16 {
        self as u16
    }

    /// Combines a set of months into its wire value.
    pub fn encode_set(months: &[Month]) -> u16 {
        months.iter().fold(0, |acc, m| acc | m.bit())
    }

    /// Splits a wire value back into the ordered set of months it contains.
    pub fn decode_set(encoded: u16) -> Vec<Month> {
        Month::ALL
            .iter()
            .copied()
            .filter(|m| encoded & m.bit() == m.bit())
            .collect()
    }
}

/// A bank account with IBAN and optional BIC.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankAccount {
    pub iban: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
}

/// Payment beneficiary. The name is required when encoding at v1.2.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Beneficiary {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Standing order extension, present only on standing order payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingOrder {
    /// Day of the month, 1-31.
    pub day: u8,

    /// Bit-flag set of execution months, see [`Month`].
    #[serde(default, skip_serializing_if = "month_mask_is_empty")]
    pub month: u16,

    pub periodicity: Periodicity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
}

fn month_mask_is_empty(mask: &u16) -> bool {
    *mask == 0
}

/// Direct debit extension, present only on direct debit payments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectDebit {
    pub direct_debit_scheme: u8,

    pub direct_debit_type: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub originators_reference_information: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandate_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,

    /// Ceiling for a single debited amount. A free-form decimal string,
    /// carried through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_till_date: Option<NaiveDate>,
}

/// Base payment fields shared by all payment types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimplePayment {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,

    /// Payment amount. `None` (or zero) means the payer fills it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// ISO 4217 currency code, three uppercase letters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant_symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_symbol: Option<String>,

    /// SEPA end-to-end reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originators_reference_information: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_note: Option<String>,

    pub bank_accounts: Vec<BankAccount>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Beneficiary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing_order_ext: Option<StandingOrder>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_debit_ext: Option<DirectDebit>,
}

/// The complete payment document encoded into a single QR code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,

    pub payments: Vec<SimplePayment>,
}

/// Common Central European currency codes, for convenience. Any ISO 4217
/// code passes validation.
pub mod currency {
    pub const EUR: &str = "EUR";
    pub const CZK: &str = "CZK";
    pub const PLN: &str = "PLN";
    pub const HUF: &str = "HUF";
}
