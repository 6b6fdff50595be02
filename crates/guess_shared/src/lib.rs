//! # Guess Shared
//!
//! Common types used by the chain bridge and the game workflow.
//!
//! ## Rule
//!
//! This crate must never depend on a runtime or a transport. Everything here
//! is plain data that can be built in a test without a chain.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod game;

pub use constants::{
    DEFAULT_CHAIN, DEFAULT_DEPLOYMENTS_DIR, GUESS_SECRET_COMMITMENT, HASH_SIZE, MAX_GUESS_DIGITS,
    MAX_GUESS_NUMBER, MAX_NAME_LEN, MIN_NAME_LEN,
};
pub use game::{
    AccountId, CommitmentHash, ContractHandle, ContractId, Guess, NetworkId, WinnerState,
};
