//! # Deployment
//!
//! Instantiates the guess-secret contract with its commitment and persists
//! the resulting address where the [`ContractRegistry`] finds it.
//!
//! ## Parameters
//!
//! - `CHAIN`: target network (default `development`)
//! - `DIR`: directory for deployment records (default `./deployments`)
//!
//! [`ContractRegistry`]: crate::registry::ContractRegistry

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use guess_shared::{
    CommitmentHash, ContractHandle, ContractId, NetworkId, DEFAULT_CHAIN,
    DEFAULT_DEPLOYMENTS_DIR, GUESS_SECRET_COMMITMENT,
};
use thiserror::Error;

use crate::client::{SignerContext, TxError};
use crate::registry::DeploymentRecord;

/// Where to deploy and where to write the records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployConfig {
    /// Target network.
    pub chain: NetworkId,
    /// Directory for deployment records.
    pub dir: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            chain: NetworkId::from(DEFAULT_CHAIN),
            dir: PathBuf::from(DEFAULT_DEPLOYMENTS_DIR),
        }
    }
}

impl DeployConfig {
    /// Reads `CHAIN` and `DIR` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::var("CHAIN").ok(), std::env::var("DIR").ok())
    }

    /// Builds the config from optional values; empty values count as unset.
    #[must_use]
    pub fn from_vars(chain: Option<String>, dir: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            chain: chain
                .filter(|c| !c.is_empty())
                .map_or(defaults.chain, NetworkId::new),
            dir: dir.filter(|d| !d.is_empty()).map_or(defaults.dir, PathBuf::from),
        }
    }
}

/// Errors of the deploy program.
#[derive(Error, Debug)]
pub enum DeployError {
    /// No deployer is available for the requested chain.
    #[error("no deployer for chain {0}")]
    UnsupportedChain(NetworkId),

    /// The instantiation transaction failed.
    #[error("deployment failed: {0}")]
    Tx(#[from] TxError),

    /// Writing a record failed.
    #[error("cannot write {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A record could not be serialized.
    #[error("cannot serialize deployment record: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Something able to instantiate contracts on a chain.
#[allow(async_fn_in_trait)]
pub trait Deployer {
    /// Instantiates `contract` with `commitment` as constructor argument.
    async fn deploy(
        &self,
        deployer: &SignerContext,
        contract: ContractId,
        commitment: CommitmentHash,
    ) -> Result<ContractHandle, TxError>;
}

/// Writes one record per deployed contract to `{dir}/{contract}/{network}.toml`.
///
/// Returns the written paths in input order.
pub fn write_contract_addresses(
    dir: &Path,
    deployments: &[ContractHandle],
) -> Result<Vec<PathBuf>, DeployError> {
    let mut written = Vec::with_capacity(deployments.len());

    for handle in deployments {
        let record =
            DeploymentRecord::new(handle.network().clone(), handle.contract(), handle.address());
        let path = record.path_in(dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DeployError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, toml::to_string(&record)?).map_err(|source| DeployError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Wrote {} address to {}", handle.contract(), path.display());
        written.push(path);
    }

    Ok(written)
}

/// Deploys guess-secret with the fixed commitment and records its address.
pub async fn deploy_guess_secret<D: Deployer>(
    deployer: &D,
    signer: &SignerContext,
    config: &DeployConfig,
) -> Result<ContractHandle, DeployError> {
    let handle = deployer
        .deploy(
            signer,
            ContractId::GuessSecret,
            CommitmentHash::from(GUESS_SECRET_COMMITMENT),
        )
        .await?;
    write_contract_addresses(&config.dir, std::slice::from_ref(&handle))?;
    Ok(handle)
}
