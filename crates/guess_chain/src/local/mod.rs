//! # Local Development Chain
//!
//! In-memory chain running the guess-secret contract, for development,
//! demos and tests. It speaks the same ABI as a real node and goes through
//! the same [`ChainClient`] interface, so the workflow cannot tell them apart.
//!
//! ## Contract rules
//!
//! - every account may guess once
//! - no guesses once a winner exists
//! - `selectWinner(secret, salt)` picks the guess whose commitment matches
//!   the one fixed at deploy time
//! - a reverted transaction leaves state untouched

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{keccak256, Bytes};
use alloy_sol_types::{SolCall, SolInterface};
use blake2::digest::consts::U16;
use blake2::{Blake2b, Digest};
use guess_shared::{AccountId, CommitmentHash, ContractHandle, ContractId, NetworkId};
use parking_lot::Mutex;

use crate::client::{
    ChainClient, RawQueryResult, SignerContext, SignerError, TransactionSigner, TransportError,
    TxError, TxOptions, TxReceipt,
};
use crate::contracts::{ContractCall, GuessRecord, IGuessSecret, QueryMethod};
use crate::deploy::Deployer;

type Blake2b128 = Blake2b<U16>;

/// Commitment to `number` under `salt`: `blake2b-128(number_le || salt)`,
/// the same hash the deployed contract checks in `selectWinner`.
#[must_use]
pub fn commit(number: u8, salt: &str) -> CommitmentHash {
    let mut hasher = Blake2b128::new();
    hasher.update(number.to_le_bytes());
    hasher.update(salt.as_bytes());
    CommitmentHash::from_slice(&hasher.finalize())
}

/// Deterministic development account derived from a name (`alice`, `bob`, ...).
#[must_use]
pub fn dev_account(name: &str) -> AccountId {
    keccak256(name.as_bytes())
}

/// Signer that approves everything. Development only.
#[derive(Clone, Copy, Debug)]
pub struct DevSigner {
    account: AccountId,
}

impl DevSigner {
    /// Signer for `account`.
    #[must_use]
    pub const fn new(account: AccountId) -> Self {
        Self { account }
    }

    /// Signer context for a named development account.
    #[must_use]
    pub fn context(name: &str) -> SignerContext {
        let account = dev_account(name);
        SignerContext::new(account, Arc::new(Self::new(account)))
    }
}

impl TransactionSigner for DevSigner {
    fn sign(&self, payload: &[u8]) -> Result<Bytes, SignerError> {
        let mut bytes = self.account.to_vec();
        bytes.extend_from_slice(payload);
        Ok(Bytes::copy_from_slice(keccak256(&bytes).as_slice()))
    }
}

// =============================================================================
// CONTRACT STATE
// =============================================================================

/// Storage of one guess-secret instance.
#[derive(Debug)]
struct GuessSecretStorage {
    secret_hash: CommitmentHash,
    guesses: Vec<GuessRecord>,
    winner: Option<String>,
    participants: Vec<AccountId>,
}

impl GuessSecretStorage {
    const fn new(secret_hash: CommitmentHash) -> Self {
        Self {
            secret_hash,
            guesses: Vec::new(),
            winner: None,
            participants: Vec::new(),
        }
    }

    fn guess(&mut self, caller: AccountId, name: String, number: u8) -> Result<(), String> {
        if self.winner.is_some() {
            return Err("we have already a winner".to_string());
        }
        if self.participants.contains(&caller) {
            return Err("you cannot play twice".to_string());
        }
        self.participants.push(caller);
        self.guesses.push(GuessRecord {
            submitter: caller,
            name,
            number,
        });
        Ok(())
    }

    fn select_winner(&mut self, secret: u8, salt: &str) {
        if commit(secret, salt) != self.secret_hash {
            return;
        }
        for record in &self.guesses {
            if commit(record.number, salt) == self.secret_hash {
                self.winner = Some(record.name.clone());
            }
        }
    }

    fn answer(&self, method: QueryMethod) -> Vec<u8> {
        match method {
            QueryMethod::Guesses => {
                IGuessSecret::guessesCall::abi_encode_returns(&(self.guesses.clone(),))
            }
            QueryMethod::Winner => IGuessSecret::winnerCall::abi_encode_returns(&(
                self.winner.is_some(),
                self.winner.clone().unwrap_or_default(),
            )),
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    contracts: HashMap<AccountId, GuessSecretStorage>,
    block_number: u64,
    nonce: u64,
}

// =============================================================================
// CHAIN
// =============================================================================

/// In-memory chain for one network.
#[derive(Debug)]
pub struct LocalChain {
    network: NetworkId,
    ledger: Mutex<Ledger>,
}

impl LocalChain {
    /// Empty chain for `network`.
    #[must_use]
    pub fn new(network: NetworkId) -> Self {
        Self {
            network,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// Empty chain named after the default development network.
    #[must_use]
    pub fn development() -> Self {
        Self::new(NetworkId::from(guess_shared::DEFAULT_CHAIN))
    }

    /// Network served by this chain.
    #[inline]
    #[must_use]
    pub const fn network(&self) -> &NetworkId {
        &self.network
    }

    /// Number of blocks produced so far (one per transaction).
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.ledger.lock().block_number
    }

    /// Instantiates a guess-secret contract and returns its handle.
    pub fn instantiate(&self, deployer: &AccountId, secret_hash: CommitmentHash) -> ContractHandle {
        let mut ledger = self.ledger.lock();
        ledger.nonce += 1;

        let mut seed = deployer.to_vec();
        seed.extend_from_slice(&ledger.nonce.to_le_bytes());
        let address = keccak256(&seed);

        ledger
            .contracts
            .insert(address, GuessSecretStorage::new(secret_hash));
        ledger.block_number += 1;

        tracing::info!("Instantiated guess_secret at {} on {}", address, self.network);
        ContractHandle::new(self.network.clone(), ContractId::GuessSecret, address)
    }

    fn check_network(&self, contract: &ContractHandle) -> Result<(), TransportError> {
        if contract.network() == &self.network {
            Ok(())
        } else {
            Err(TransportError::WrongNetwork {
                handle: contract.network().to_string(),
                client: self.network.to_string(),
            })
        }
    }

    fn execute(
        &self,
        caller: AccountId,
        contract: &ContractHandle,
        call: &ContractCall,
    ) -> Result<TxReceipt, TxError> {
        let decoded = IGuessSecret::IGuessSecretCalls::abi_decode(call.data(), true)
            .map_err(|e| TxError::Reverted(format!("invalid call data: {e}")))?;

        let mut ledger = self.ledger.lock();
        ledger.block_number += 1;
        let block_number = ledger.block_number;

        let storage = ledger
            .contracts
            .get_mut(contract.address())
            .ok_or_else(|| TxError::Reverted("contract not found".to_string()))?;

        match decoded {
            IGuessSecret::IGuessSecretCalls::guess(args) => {
                storage
                    .guess(caller, args.name, args.number)
                    .map_err(TxError::Reverted)?;
            }
            IGuessSecret::IGuessSecretCalls::selectWinner(args) => {
                storage.select_winner(args.secret, &args.salt);
            }
            IGuessSecret::IGuessSecretCalls::guesses(_) | IGuessSecret::IGuessSecretCalls::winner(_) => {
                // Queries sent as transactions change nothing.
            }
        }

        Ok(TxReceipt { block_number })
    }
}

impl ChainClient for LocalChain {
    async fn query(
        &self,
        _caller: Option<&AccountId>,
        contract: &ContractHandle,
        method: QueryMethod,
    ) -> Result<RawQueryResult, TransportError> {
        tokio::task::yield_now().await;
        self.check_network(contract)?;

        let ledger = self.ledger.lock();
        Ok(match ledger.contracts.get(contract.address()) {
            Some(storage) => RawQueryResult::ok(storage.answer(method)),
            None => RawQueryResult::reverted("contract not found"),
        })
    }

    async fn submit_tx(
        &self,
        signer: &SignerContext,
        contract: &ContractHandle,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<TxReceipt, TxError> {
        tokio::task::yield_now().await;
        self.check_network(contract)?;
        signer.sign(call.data())?;

        tracing::debug!(
            "Executing {} for {} (gas limit: {:?})",
            call.method(),
            signer.account(),
            options.gas_limit
        );

        let result = self.execute(*signer.account(), contract, call);
        match &result {
            Ok(receipt) => tracing::info!("{} included in block {}", call.method(), receipt.block_number),
            Err(e) => tracing::warn!("{} failed: {}", call.method(), e),
        }
        result
    }
}

impl Deployer for LocalChain {
    async fn deploy(
        &self,
        deployer: &SignerContext,
        contract: ContractId,
        commitment: CommitmentHash,
    ) -> Result<ContractHandle, TxError> {
        tokio::task::yield_now().await;
        match contract {
            ContractId::GuessSecret => {
                deployer.sign(commitment.as_slice())?;
                Ok(self.instantiate(deployer.account(), commitment))
            }
        }
    }
}
