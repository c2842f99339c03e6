//! HHMMSS duration entry.
//!
//! Models the digit keypad used to configure a timer: digits are appended on
//! the right, the entry is left-padded with zeros to six digits and read as
//! hours, minutes and seconds. Groups are not normalised, so `"0090"` is
//! ninety seconds.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum number of digits in an entry.
pub const MAX_DIGITS: usize = 6;

/// Convert an HHMMSS string (up to six digits, left-padded) into milliseconds.
///
/// # Errors
/// Returns an error if the entry contains a non-digit or is longer than six
/// characters.
pub fn parse_hhmmss(input: &str) -> Result<u64, ValidationError> {
    let input = input.trim();
    if input.len() > MAX_DIGITS {
        return Err(ValidationError::TooLong {
            input: input.to_string(),
            max: MAX_DIGITS,
        });
    }
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NonDigit {
            input: input.to_string(),
        });
    }
    Ok(digits_to_millis(input))
}

fn digits_to_millis(digits: &str) -> u64 {
    let padded = format!("{digits:0>width$}", width = MAX_DIGITS);
    let group = |i: usize| -> u64 {
        padded[i * 2..i * 2 + 2]
            .bytes()
            .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
    };
    group(0) * 3_600_000 + group(1) * 60_000 + group(2) * 1_000
}

/// Keypad state while the user types a duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationInput {
    digits: String,
}

impl DurationInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit. Returns `false` when it was ignored: not a digit,
    /// entry full, or a leading zero.
    pub fn push(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || self.digits.len() >= MAX_DIGITS {
            return false;
        }
        if self.digits.is_empty() && digit == '0' {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// Remove the last digit (backspace).
    pub fn pop(&mut self) -> Option<char> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The zero-padded `HHMMSS` form of the entry.
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.digits, width = MAX_DIGITS)
    }

    /// `"01h 30m 00s"` style rendering of the keypad display.
    pub fn display(&self) -> String {
        let padded = self.padded();
        format!("{}h {}m {}s", &padded[0..2], &padded[2..4], &padded[4..6])
    }

    pub fn to_millis(&self) -> u64 {
        digits_to_millis(&self.digits)
    }
}
