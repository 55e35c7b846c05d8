//! Croatian personal identification number (OIB) validation.
//!
//! An OIB is eleven ASCII digits. The final digit is a check digit computed
//! over the first ten with the ISO 7064 MOD 11,10 hybrid scheme. This crate
//! exposes the raw predicate ([`is_valid`]), the check-digit construction
//! ([`check_digit`]) and a validated [`Oib`] newtype for typed APIs.
//!
//! # Example
//!
//! ```
//! use oib::{Oib, OibError, is_valid};
//!
//! assert!(is_valid("12345678903"));
//! assert!(!is_valid("12345678901"));
//!
//! let oib = Oib::parse("12345678903").expect("valid identifier");
//! assert_eq!(oib.as_str(), "12345678903");
//!
//! assert_eq!(
//!     Oib::parse("1234"),
//!     Err(OibError::WrongLength { actual: 4 })
//! );
//! ```

mod checksum;
mod error;
mod identifier;

pub use checksum::{BODY_LENGTH, OIB_LENGTH, check_digit, is_valid};
pub use error::OibError;
pub use identifier::Oib;
