//! # Game Types
//!
//! Plain data describing the deployed contract and what it stores.

use std::fmt;

use alloy_primitives::FixedBytes;
use serde::{Deserialize, Serialize};

use crate::constants::HASH_SIZE;

/// 32-byte account identifier (players, deployers, contract addresses).
pub type AccountId = FixedBytes<32>;

/// Commitment to the secret number fixed at deploy time.
pub type CommitmentHash = FixedBytes<HASH_SIZE>;

/// Identifier of a chain network, e.g. `development` or `alephzero-testnet`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    /// Creates a network id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NetworkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Logical contract names known to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractId {
    /// The guess-the-number game contract.
    GuessSecret,
}

impl ContractId {
    /// Every known contract.
    pub const ALL: [Self; 1] = [Self::GuessSecret];

    /// Name used for artifact and deployment directories.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GuessSecret => "guess_secret",
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one deployed contract instance.
///
/// Owned by the registry and only valid while the matching network is active.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContractHandle {
    network: NetworkId,
    contract: ContractId,
    address: AccountId,
}

impl ContractHandle {
    /// Creates a handle.
    #[must_use]
    pub const fn new(network: NetworkId, contract: ContractId, address: AccountId) -> Self {
        Self {
            network,
            contract,
            address,
        }
    }

    /// Network the contract lives on.
    #[inline]
    #[must_use]
    pub const fn network(&self) -> &NetworkId {
        &self.network
    }

    /// Logical contract name.
    #[inline]
    #[must_use]
    pub const fn contract(&self) -> ContractId {
        self.contract
    }

    /// Deployed address.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> &AccountId {
        &self.address
    }
}

impl fmt::Display for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.contract, self.network, self.address)
    }
}

/// One guess as stored on chain, in chain-assigned order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guess {
    /// Account that submitted the guess.
    pub submitter: AccountId,
    /// Display name chosen by the player.
    pub name: String,
    /// Guessed number.
    pub number: u8,
}

/// Whether the contract owner has revealed a winner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WinnerState {
    /// No winner selected yet.
    #[default]
    Unrevealed,
    /// The winner's display name.
    Revealed(String),
}

impl WinnerState {
    /// Builds the state from the contract's `(revealed, name)` pair.
    #[must_use]
    pub fn from_chain(revealed: bool, name: String) -> Self {
        if revealed {
            Self::Revealed(name)
        } else {
            Self::Unrevealed
        }
    }

    /// Returns true once a winner exists.
    #[inline]
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// The winner's name, if revealed.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Revealed(name) => Some(name),
            Self::Unrevealed => None,
        }
    }
}
