//! Codec for the Slovak "PAY by square" QR payment standard.
//!
//! Encoding turns a [`DataModel`] into the compact text payload rendered
//! into payment QR codes by Slovak banking apps; decoding is the exact
//! inverse, tolerant of scanner artefacts such as lowercased output and
//! dropped base32hex padding.
//!
//! ```
//! use bysquare::{decode, encode, BankAccount, Beneficiary, DataModel, EncodeOptions,
//!     SimplePayment};
//!
//! let model = DataModel {
//!     invoice_id: None,
//!     payments: vec![SimplePayment {
//!         amount: Some(25.30),
//!         currency_code: Some("EUR".to_string()),
//!         bank_accounts: vec![BankAccount {
//!             iban: "SK9611000000002918599669".to_string(),
//!             bic: None,
//!         }],
//!         beneficiary: Some(Beneficiary {
//!             name: "John Doe".to_string(),
//!             street: None,
//!             city: None,
//!         }),
//!         ..Default::default()
//!     }],
//! };
//!
//! let qr = encode(&model, EncodeOptions::default())?;
//! assert_eq!(decode(&qr)?, model);
//! # Ok::<(), bysquare::BySquareError>(())
//! ```

pub mod base32hex;
pub mod checksum;
pub mod deburr;
mod decode;
mod encode;
pub mod errors;
pub mod frame;
pub mod lzma;
pub mod models;
pub mod serializer;
pub mod validation;

pub use decode::decode;
pub use deburr::deburr;
pub use encode::{encode, EncodeOptions};
pub use errors::{BySquareError, Result};
pub use models::{
    BankAccount, Beneficiary, DataModel, DirectDebit, Month, PaymentType, Periodicity,
    SimplePayment, StandingOrder, Version,
};
pub use validation::validate;
