//! ISO 7064 MOD 11,10 check-digit arithmetic.

use crate::error::OibError;

/// Number of characters in a complete identifier.
pub const OIB_LENGTH: usize = 11;

/// Number of leading digits covered by the check digit.
pub const BODY_LENGTH: usize = OIB_LENGTH - 1;

/// Returns `true` when `identifier` is eleven ASCII digits whose last digit
/// matches the check digit of the first ten.
///
/// Never panics; any input that is not exactly eleven digits is rejected.
///
/// # Examples
///
/// ```
/// use oib::is_valid;
///
/// assert!(is_valid("12345678903"));
/// assert!(!is_valid("1234567890"));   // too short
/// assert!(!is_valid("1234567890a"));  // non-digit
/// assert!(!is_valid("12345678904"));  // wrong check digit
/// ```
#[must_use]
pub fn is_valid(identifier: &str) -> bool {
    verify(identifier).is_ok()
}

/// Computes the check digit for a ten-digit body.
///
/// Returns `None` when any element is not a decimal digit (`0..=9`).
///
/// # Examples
///
/// ```
/// use oib::check_digit;
///
/// assert_eq!(check_digit(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0]), Some(3));
/// assert_eq!(check_digit(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]), None);
/// ```
#[must_use]
pub fn check_digit(body: &[u8; BODY_LENGTH]) -> Option<u8> {
    if body.iter().any(|digit| *digit > 9) {
        return None;
    }
    Some(checksum(body))
}

/// Splits `identifier` into digits and verifies its check digit.
pub(crate) fn verify(identifier: &str) -> Result<[u8; OIB_LENGTH], OibError> {
    let digits = to_digits(identifier)?;
    let [body @ .., actual] = &digits;
    let expected = checksum(body);
    if expected == *actual {
        Ok(digits)
    } else {
        Err(OibError::ChecksumMismatch {
            expected,
            actual: *actual,
        })
    }
}

/// Callers guarantee every element is within `0..=9`.
fn checksum(body: &[u8; BODY_LENGTH]) -> u8 {
    let remainder = body.iter().fold(10_u8, |carry, digit| {
        let sum = match (carry + digit).rem_euclid(10) {
            0 => 10,
            other => other,
        };
        (sum * 2).rem_euclid(11)
    });
    // `remainder` is always within 1..=10, so the subtraction cannot wrap.
    match 11 - remainder {
        10 => 0,
        check => check,
    }
}

fn to_digits(identifier: &str) -> Result<[u8; OIB_LENGTH], OibError> {
    let actual = identifier.chars().count();
    if actual != OIB_LENGTH {
        return Err(OibError::WrongLength { actual });
    }

    let mut digits = [0_u8; OIB_LENGTH];
    for (position, (slot, ch)) in digits.iter_mut().zip(identifier.chars()).enumerate() {
        *slot = u8::try_from(ch)
            .ok()
            .filter(u8::is_ascii_digit)
            .map(|byte| byte - b'0')
            .ok_or(OibError::NonDigit { position })?;
    }
    Ok(digits)
}
