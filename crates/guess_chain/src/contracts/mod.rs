//! # Contract Definitions
//!
//! ABI of the guess-secret contract and the call payloads built from it.

// The sol! macro generates code that we can't document, so allow missing_docs
#![allow(missing_docs)]

use std::fmt;

use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};
use guess_shared::Guess;

sol! {
    /// One entry of the public guess list.
    #[derive(Debug, PartialEq, Eq)]
    struct GuessRecord {
        bytes32 submitter;
        string name;
        uint8 number;
    }

    /// The guess-secret game contract.
    ///
    /// The owner commits to a secret at deploy time; every account may guess
    /// once until a winner is selected.
    #[derive(Debug)]
    interface IGuessSecret {
        /// All guesses, in submission order.
        function guesses() external view returns (GuessRecord[] memory entries);

        /// Winner name, `revealed` is false while nobody won.
        function winner() external view returns (bool revealed, string memory name);

        /// Records a guess for the caller. Reverts after a winner exists or
        /// when the caller already guessed.
        function guess(string calldata name, uint8 number) external;

        /// Reveals the secret and selects the winner.
        function selectWinner(uint8 secret, string calldata salt) external;
    }
}

impl From<GuessRecord> for Guess {
    fn from(record: GuessRecord) -> Self {
        Self {
            submitter: record.submitter,
            name: record.name,
            number: record.number,
        }
    }
}

impl From<&Guess> for GuessRecord {
    fn from(guess: &Guess) -> Self {
        Self {
            submitter: guess.submitter,
            name: guess.name.clone(),
            number: guess.number,
        }
    }
}

/// Read-only contract messages the workflow tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryMethod {
    /// `guesses()`
    Guesses,
    /// `winner()`
    Winner,
}

impl QueryMethod {
    /// Message name as exposed by the contract metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guesses => "guesses",
            Self::Winner => "winner",
        }
    }

    /// ABI-encoded call data for this query.
    #[must_use]
    pub fn encode(self) -> Bytes {
        match self {
            Self::Guesses => IGuessSecret::guessesCall {}.abi_encode().into(),
            Self::Winner => IGuessSecret::winnerCall {}.abi_encode().into(),
        }
    }
}

impl fmt::Display for QueryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state-changing call: message name plus ABI-encoded arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    method: &'static str,
    data: Bytes,
}

impl ContractCall {
    /// Encodes any contract call.
    #[must_use]
    pub fn new<C: SolCall>(call: &C) -> Self {
        let method = C::SIGNATURE
            .split_once('(')
            .map_or(C::SIGNATURE, |(name, _)| name);
        Self {
            method,
            data: call.abi_encode().into(),
        }
    }

    /// `guess(name, number)`.
    #[must_use]
    pub fn guess(name: &str, number: u8) -> Self {
        Self::new(&IGuessSecret::guessCall {
            name: name.to_string(),
            number,
        })
    }

    /// `selectWinner(secret, salt)`.
    #[must_use]
    pub fn select_winner(secret: u8, salt: &str) -> Self {
        Self::new(&IGuessSecret::selectWinnerCall {
            secret,
            salt: salt.to_string(),
        })
    }

    /// Message name, e.g. `guess`.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// ABI-encoded payload including the selector.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::FixedBytes;

    #[test]
    fn test_guess_call_carries_method_and_args() {
        let call = ContractCall::guess("Ada", 42);
        assert_eq!(call.method(), "guess");

        let decoded = IGuessSecret::guessCall::abi_decode(call.data(), true).unwrap();
        assert_eq!(decoded.name, "Ada");
        assert_eq!(decoded.number, 42);
    }

    #[test]
    fn test_select_winner_method_name() {
        let call = ContractCall::select_winner(7, "salt");
        assert_eq!(call.method(), "selectWinner");
    }

    #[test]
    fn test_query_selectors_differ() {
        assert_ne!(QueryMethod::Guesses.encode(), QueryMethod::Winner.encode());
        assert_eq!(QueryMethod::Guesses.encode().len(), 4);
    }

    #[test]
    fn test_record_conversion() {
        let guess = Guess {
            submitter: FixedBytes::repeat_byte(1),
            name: "Bob".to_string(),
            number: 90,
        };
        let record = GuessRecord::from(&guess);
        assert_eq!(Guess::from(record), guess);
    }
}
