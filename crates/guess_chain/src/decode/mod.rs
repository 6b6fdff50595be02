//! # Output Decoding
//!
//! Turns a [`RawQueryResult`] into domain types.
//!
//! Two failure sources are checked: the contract's own success flag, and the
//! ABI decode of the payload. Both end up as `is_error` with a readable
//! message, so callers treat them the same way.

use alloy_sol_types::SolCall;
use guess_shared::{Guess, WinnerState};

use crate::client::RawQueryResult;
use crate::contracts::{IGuessSecret, QueryMethod};

/// Decoded query output: a value, or an error message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedOutput<T> {
    /// Decoded value when the call succeeded.
    pub value: Option<T>,
    /// True when the contract failed or the payload did not decode.
    pub is_error: bool,
    /// Human-readable reason when `is_error` is set.
    pub error_message: Option<String>,
}

impl<T> DecodedOutput<T> {
    fn value(value: T) -> Self {
        Self {
            value: Some(value),
            is_error: false,
            error_message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            value: None,
            is_error: true,
            error_message: Some(message),
        }
    }

    /// Collapses the output into a `Result` with the reason as error.
    pub fn into_result(self) -> Result<T, String> {
        match (self.is_error, self.value) {
            (false, Some(value)) => Ok(value),
            _ => Err(self
                .error_message
                .unwrap_or_else(|| "query returned no output".to_string())),
        }
    }
}

/// Decoder for the guess-secret query outputs.
///
/// Stateless; every call allocates only the decoded value.
pub struct OutputDecoder;

impl OutputDecoder {
    /// Decodes the output of `guesses()`.
    #[must_use]
    pub fn decode_guesses(raw: &RawQueryResult) -> DecodedOutput<Vec<Guess>> {
        Self::decode_call::<IGuessSecret::guessesCall, _>(raw, QueryMethod::Guesses, |ret| {
            ret.entries.into_iter().map(Guess::from).collect()
        })
    }

    /// Decodes the output of `winner()`.
    #[must_use]
    pub fn decode_winner(raw: &RawQueryResult) -> DecodedOutput<WinnerState> {
        Self::decode_call::<IGuessSecret::winnerCall, _>(raw, QueryMethod::Winner, |ret| {
            WinnerState::from_chain(ret.revealed, ret.name)
        })
    }

    fn decode_call<C: SolCall, T>(
        raw: &RawQueryResult,
        method: QueryMethod,
        map: impl FnOnce(C::Return) -> T,
    ) -> DecodedOutput<T> {
        if !raw.success {
            return DecodedOutput::error(Self::revert_message(raw, method));
        }

        match C::abi_decode_returns(&raw.data, true) {
            Ok(ret) => DecodedOutput::value(map(ret)),
            Err(e) => DecodedOutput::error(format!("failed to decode {method} output: {e}")),
        }
    }

    fn revert_message(raw: &RawQueryResult, method: QueryMethod) -> String {
        if raw.data.is_empty() {
            format!("{method} call failed")
        } else {
            String::from_utf8_lossy(&raw.data).into_owned()
        }
    }
}
