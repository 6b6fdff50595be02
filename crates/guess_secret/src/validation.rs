//! # Guess Validation
//!
//! Pure checks run before any network call. The number field must be one or
//! two ASCII digits no larger than [`MAX_GUESS_NUMBER`]; the name must be
//! between [`MIN_NAME_LEN`] and [`MAX_NAME_LEN`] characters.

use guess_shared::{MAX_GUESS_DIGITS, MAX_GUESS_NUMBER, MAX_NAME_LEN, MIN_NAME_LEN};

use crate::error::ValidationError;

/// Raw form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuessInput {
    /// Display name field.
    pub name: String,
    /// Number field, still text.
    pub number: String,
}

impl GuessInput {
    /// Input with both fields filled.
    #[must_use]
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Empties both fields.
    pub fn clear(&mut self) {
        self.name.clear();
        self.number.clear();
    }

    /// True when both fields are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.number.is_empty()
    }
}

/// A guess that passed validation and can be sent as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidGuess {
    /// Display name, 1-90 characters.
    pub name: String,
    /// Number in `0..=90`.
    pub number: u8,
}

/// Validates the number field, then the name field.
pub fn validate_guess(input: &GuessInput) -> Result<ValidGuess, ValidationError> {
    let number = parse_number(&input.number)?;
    let name = check_name(&input.name)?;
    Ok(ValidGuess {
        name: name.to_string(),
        number,
    })
}

fn parse_number(text: &str) -> Result<u8, ValidationError> {
    if text.is_empty()
        || text.len() > MAX_GUESS_DIGITS
        || !text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ValidationError::NumberFormat);
    }

    // At most two ASCII digits, so this cannot overflow.
    let number = text
        .bytes()
        .fold(0u8, |acc, digit| acc * 10 + (digit - b'0'));

    if number > MAX_GUESS_NUMBER {
        return Err(ValidationError::NumberOutOfRange(number));
    }
    Ok(number)
}

fn check_name(name: &str) -> Result<&str, ValidationError> {
    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(ValidationError::EmptyName);
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong(len));
    }
    Ok(name)
}
