//! # Chain Collaborators
//!
//! Interfaces the workflow consumes but never implements itself: the chain
//! client executing queries and transactions, and the wallet signer.
//!
//! ```text
//! ┌──────────────┐  query / submit_tx  ┌──────────────┐
//! │  Workflow    │ ──────────────────▶ │ ChainClient  │ ──▶ node
//! │  (core)      │                     │ (transport)  │
//! └──────────────┘                     └──────┬───────┘
//!                                             │ sign
//!                                      ┌──────▼───────┐
//!                                      │ Transaction  │
//!                                      │ Signer       │
//!                                      └──────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use alloy_primitives::Bytes;
use guess_shared::{AccountId, ContractHandle};
use serde::Deserialize;
use thiserror::Error;

use crate::contracts::{ContractCall, QueryMethod};

// =============================================================================
// RESULTS
// =============================================================================

/// Raw outcome of a read-only contract call.
///
/// `success` is the contract's own discriminant: a query can reach the node
/// fine and still fail inside the contract. On failure `data` holds the
/// revert message bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawQueryResult {
    /// Whether the contract returned normally.
    pub success: bool,
    /// ABI-encoded return data, or the revert message.
    pub data: Bytes,
}

impl RawQueryResult {
    /// A successful result carrying encoded return data.
    #[must_use]
    pub fn ok(data: impl Into<Bytes>) -> Self {
        Self {
            success: true,
            data: data.into(),
        }
    }

    /// A contract-level failure with a message.
    #[must_use]
    pub fn reverted(message: &str) -> Self {
        Self {
            success: false,
            data: Bytes::copy_from_slice(message.as_bytes()),
        }
    }
}

/// Confirmation that a transaction was included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Block the transaction landed in.
    pub block_number: u64,
}

/// Per-transaction knobs forwarded to the chain client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TxOptions {
    /// Gas limit, `None` lets the client estimate.
    pub gas_limit: Option<u64>,
    /// Storage deposit limit, `None` for unlimited.
    pub storage_deposit_limit: Option<u64>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// The query never produced a contract result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Node unreachable or connection dropped.
    #[error("chain unreachable: {0}")]
    Unreachable(String),

    /// The handle belongs to a different network than the client.
    #[error("contract handle is for network {handle}, client is on {client}")]
    WrongNetwork {
        /// Network named by the handle.
        handle: String,
        /// Network the client talks to.
        client: String,
    },
}

/// The wallet refused to sign.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("signer rejected: {0}")]
pub struct SignerError(pub String);

/// A transaction did not make it into a block, or reverted there.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    /// The user or wallet declined to sign.
    #[error(transparent)]
    SignerRejected(#[from] SignerError),

    /// Included but reverted by the contract.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// Could not reach the chain.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// =============================================================================
// SIGNER
// =============================================================================

/// Wallet-side signer. Key management lives behind this trait.
pub trait TransactionSigner: Send + Sync {
    /// Signs an encoded call payload.
    fn sign(&self, payload: &[u8]) -> Result<Bytes, SignerError>;
}

/// Active account together with its signer.
#[derive(Clone)]
pub struct SignerContext {
    account: AccountId,
    signer: Arc<dyn TransactionSigner>,
}

impl SignerContext {
    /// Pairs an account with the signer that controls it.
    #[must_use]
    pub fn new(account: AccountId, signer: Arc<dyn TransactionSigner>) -> Self {
        Self { account, signer }
    }

    /// The active account.
    #[inline]
    #[must_use]
    pub const fn account(&self) -> &AccountId {
        &self.account
    }

    /// Signs `payload` with the active account.
    pub fn sign(&self, payload: &[u8]) -> Result<Bytes, SignerError> {
        self.signer.sign(payload)
    }
}

impl fmt::Debug for SignerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerContext")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CHAIN CLIENT
// =============================================================================

/// Executes contract calls against one network.
///
/// Implementations own the transport. Both methods are suspension points;
/// the workflow never holds a lock across them.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Runs a read-only message. `caller` may be empty.
    async fn query(
        &self,
        caller: Option<&AccountId>,
        contract: &ContractHandle,
        method: QueryMethod,
    ) -> Result<RawQueryResult, TransportError>;

    /// Signs and submits a state-changing call, resolving once the
    /// transaction is finalized or has failed.
    async fn submit_tx(
        &self,
        signer: &SignerContext,
        contract: &ContractHandle,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<TxReceipt, TxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refuse;

    impl TransactionSigner for Refuse {
        fn sign(&self, _payload: &[u8]) -> Result<Bytes, SignerError> {
            Err(SignerError("user closed the wallet popup".to_string()))
        }
    }

    #[test]
    fn test_reverted_result_carries_message() {
        let raw = RawQueryResult::reverted("not revealed");
        assert!(!raw.success);
        assert_eq!(&raw.data[..], b"not revealed");
    }

    #[test]
    fn test_signer_error_converts_to_tx_error() {
        let ctx = SignerContext::new(AccountId::repeat_byte(7), Arc::new(Refuse));
        let err: TxError = ctx.sign(b"payload").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "signer rejected: user closed the wallet popup"
        );
    }

    #[test]
    fn test_tx_options_from_partial_toml() {
        let options: TxOptions = toml::from_str("gas_limit = 500000").unwrap();
        assert_eq!(options.gas_limit, Some(500_000));
        assert_eq!(options.storage_deposit_limit, None);
    }
}
