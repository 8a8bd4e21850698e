use thiserror::Error;

#[derive(Debug, Error)]
pub enum BySquareError {
    #[error("invalid base32hex input")]
    InvalidBase32Hex,

    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("LZMA compression failed: {0}")]
    Compression(String),

    #[error("LZMA decompression failed: {0}")]
    Decompression(String),

    #[error("CRC32 checksum mismatch")]
    ChecksumMismatch,

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("at least one bank account required")]
    MissingBankAccount,

    #[error("beneficiary name is required (path: {path})")]
    MissingBeneficiaryName { path: String },

    #[error("invalid IBAN (ISO 13616) (path: {path})")]
    InvalidIban { path: String },

    #[error("invalid BIC (ISO 9362) (path: {path})")]
    InvalidBic { path: String },

    #[error("invalid currency code (ISO 4217) (path: {path})")]
    InvalidCurrency { path: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("{message} (path: {path})")]
    Validation { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, BySquareError>;
