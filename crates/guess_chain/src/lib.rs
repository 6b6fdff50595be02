//! # Guess Chain Bridge
//!
//! Everything between the game workflow and the chain: the contract ABI,
//! the collaborator interfaces, output decoding, the contract registry and
//! deployment.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   query / tx    ┌─────────────────┐
//! │  Workflow       │ ─────────────▶  │  ChainClient    │
//! │  (guess_secret) │                 │  (LocalChain or │
//! └────────┬────────┘                 │   a transport)  │
//!          │ decode                   └─────────────────┘
//!          ▼
//! ┌─────────────────┐   lookup        ┌─────────────────┐
//! │  OutputDecoder  │                 │ ContractRegistry│ ◀── deployments/
//! └─────────────────┘                 └─────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod client;
pub mod contracts;
pub mod decode;
pub mod deploy;
pub mod local;
pub mod registry;

pub use client::{
    ChainClient, RawQueryResult, SignerContext, SignerError, TransactionSigner, TransportError,
    TxError, TxOptions, TxReceipt,
};
pub use contracts::{ContractCall, QueryMethod};
pub use decode::{DecodedOutput, OutputDecoder};
pub use deploy::{deploy_guess_secret, write_contract_addresses, DeployConfig, DeployError, Deployer};
pub use local::{commit, dev_account, DevSigner, LocalChain};
pub use registry::{ContractLookup, ContractRegistry, DeploymentRecord, RegistryError};
