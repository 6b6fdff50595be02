//! # Game & Deployment Constants
//!
//! Limits enforced by the guess form and the values baked into deployment.
//!
//! **CRITICAL:** the guess limits mirror what the contract accepts. Changing
//! them without redeploying lets the client submit guesses the chain rejects.

// =============================================================================
// GUESS LIMITS
// =============================================================================

/// Highest number a player may guess (inclusive). The lowest is 0.
pub const MAX_GUESS_NUMBER: u8 = 90;

/// Maximum decimal digits accepted in the number field.
pub const MAX_GUESS_DIGITS: usize = 2;

/// Minimum player name length, in characters.
pub const MIN_NAME_LEN: usize = 1;

/// Maximum player name length, in characters.
pub const MAX_NAME_LEN: usize = 90;

// =============================================================================
// DEPLOYMENT
// =============================================================================

/// Size of the commitment hash stored by the contract, in bytes.
pub const HASH_SIZE: usize = 16;

/// Chain used when `CHAIN` is not set.
pub const DEFAULT_CHAIN: &str = "development";

/// Directory holding deployment records when `DIR` is not set.
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "./deployments";

/// Commitment to the secret number, passed to the contract constructor.
///
/// Computed offline; the secret and salt never touch this repository.
pub const GUESS_SECRET_COMMITMENT: [u8; HASH_SIZE] = [
    125, 35, 83, 141, 58, 133, 29, 59, 19, 170, 208, 144, 101, 131, 177, 177,
];
