//! Validated identifier newtype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::checksum::{BODY_LENGTH, check_digit, verify};
use crate::error::OibError;

/// Number of trailing digits kept visible by [`Oib::masked`].
const VISIBLE_SUFFIX: usize = 4;

/// An identifier that passed length, digit and checksum validation.
///
/// # Examples
///
/// ```
/// use oib::Oib;
///
/// let oib: Oib = "12345678903".parse().expect("valid identifier");
/// assert_eq!(oib.to_string(), "12345678903");
/// assert_eq!(oib.masked(), "*******8903");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oib(String);

impl Oib {
    /// Validate `raw` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`OibError`] describing the first rule the input breaks.
    pub fn parse(raw: &str) -> Result<Self, OibError> {
        verify(raw)?;
        Ok(Self(raw.to_owned()))
    }

    /// Build an identifier from a ten-digit body by appending its check
    /// digit. Returns `None` when the body contains values above nine.
    ///
    /// ```
    /// use oib::Oib;
    ///
    /// let oib = Oib::from_body(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0]).expect("digits");
    /// assert_eq!(oib.as_str(), "12345678903");
    /// ```
    #[must_use]
    pub fn from_body(body: &[u8; BODY_LENGTH]) -> Option<Self> {
        let check = check_digit(body)?;
        let raw = body
            .iter()
            .chain(std::iter::once(&check))
            .map(|digit| char::from(b'0' + digit))
            .collect();
        Some(Self(raw))
    }

    /// Borrow the identifier digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Render the identifier with all but the last four digits hidden, for
    /// log lines that must not carry the full value.
    #[must_use]
    pub fn masked(&self) -> String {
        let hidden = self.0.len().saturating_sub(VISIBLE_SUFFIX);
        "*".repeat(hidden) + &self.0.chars().skip(hidden).collect::<String>()
    }
}

impl fmt::Display for Oib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Oib {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Oib {
    type Err = OibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Oib {
    type Error = OibError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        verify(&value)?;
        Ok(Self(value))
    }
}

impl From<Oib> for String {
    fn from(value: Oib) -> Self {
        value.0
    }
}
