//! # Contract Registry
//!
//! Maps a logical contract name to its deployed address on the active network.
//!
//! Deployment records live on disk as `{dir}/{contract}/{network}.toml`:
//!
//! ```toml
//! network = "development"
//! contract = "guess_secret"
//! address = "0x…"
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use guess_shared::{AccountId, ContractHandle, ContractId, NetworkId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One deployed contract, as persisted by the deploy program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Network the contract was deployed to.
    pub network: NetworkId,
    /// Logical contract name.
    pub contract: ContractId,
    /// 0x-prefixed hex address.
    pub address: String,
}

impl DeploymentRecord {
    /// Builds a record for a fresh deployment.
    #[must_use]
    pub fn new(network: NetworkId, contract: ContractId, address: &AccountId) -> Self {
        Self {
            network,
            contract,
            address: alloy_primitives::hex::encode_prefixed(address),
        }
    }

    /// Path of this record below `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.contract.as_str())
            .join(format!("{}.toml", self.network))
    }
}

/// Errors while loading deployment records.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Reading a record or listing a directory failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A record is not valid TOML for [`DeploymentRecord`].
    #[error("invalid deployment record {path}: {source}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// The address field is not a 32-byte hex string.
    #[error("invalid address {address:?} in {path}")]
    InvalidAddress {
        /// Offending file.
        path: PathBuf,
        /// The value found.
        address: String,
    },

    /// A record sits in another contract's directory.
    #[error("{path} describes {found}, expected {expected}")]
    ContractMismatch {
        /// Offending file.
        path: PathBuf,
        /// Contract named by the directory.
        expected: ContractId,
        /// Contract named inside the record.
        found: ContractId,
    },
}

/// Resolves contract handles for the currently active network.
pub trait ContractLookup {
    /// Handle for `contract` on the active network, if deployed there.
    fn lookup(&self, contract: ContractId) -> Option<ContractHandle>;
}

/// In-memory registry of known deployments plus the active network.
///
/// The active network changes when the wallet switches chains; lookups
/// follow it immediately.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    deployments: HashMap<(NetworkId, ContractId), AccountId>,
    active: RwLock<Option<NetworkId>>,
}

impl ContractRegistry {
    /// Creates an empty registry with no active network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every deployment record below `dir`.
    ///
    /// A missing directory yields an empty registry: nothing was deployed yet.
    pub fn load_dir(dir: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        for contract in ContractId::ALL {
            let contract_dir = dir.join(contract.as_str());
            if !contract_dir.is_dir() {
                continue;
            }

            let entries = fs::read_dir(&contract_dir).map_err(|source| RegistryError::Io {
                path: contract_dir.clone(),
                source,
            })?;

            for entry in entries {
                let path = entry
                    .map_err(|source| RegistryError::Io {
                        path: contract_dir.clone(),
                        source,
                    })?
                    .path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                    continue;
                }
                let record = Self::read_record(&path)?;
                if record.contract != contract {
                    return Err(RegistryError::ContractMismatch {
                        path,
                        expected: contract,
                        found: record.contract,
                    });
                }
                let address = record.address.parse::<AccountId>().map_err(|_| {
                    RegistryError::InvalidAddress {
                        path: path.clone(),
                        address: record.address.clone(),
                    }
                })?;
                tracing::debug!("Loaded {} on {} from {}", contract, record.network, path.display());
                registry.register(record.network, contract, address);
            }
        }

        Ok(registry)
    }

    fn read_record(path: &Path) -> Result<DeploymentRecord, RegistryError> {
        let text = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Records a deployment, replacing any previous address.
    pub fn register(&mut self, network: NetworkId, contract: ContractId, address: AccountId) {
        self.deployments.insert((network, contract), address);
    }

    /// Switches the active network; `None` means disconnected.
    pub fn set_network(&self, network: Option<NetworkId>) {
        tracing::info!(
            "Active network: {}",
            network.as_ref().map_or("<none>", NetworkId::as_str)
        );
        *self.active.write() = network;
    }

    /// Number of known deployments across all networks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deployments.len()
    }

    /// True when no deployment is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
    }
}

impl ContractLookup for ContractRegistry {
    fn lookup(&self, contract: ContractId) -> Option<ContractHandle> {
        let network = self.active.read().clone()?;
        let address = *self.deployments.get(&(network.clone(), contract))?;
        Some(ContractHandle::new(network, contract, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("guess_registry_{tag}_{id}"))
    }

    #[test]
    fn test_lookup_follows_active_network() {
        let mut registry = ContractRegistry::new();
        let dev = NetworkId::from("development");
        let address = AccountId::repeat_byte(9);
        registry.register(dev.clone(), ContractId::GuessSecret, address);

        assert_eq!(registry.lookup(ContractId::GuessSecret), None);

        registry.set_network(Some(dev.clone()));
        let handle = registry.lookup(ContractId::GuessSecret).unwrap();
        assert_eq!(handle.network(), &dev);
        assert_eq!(handle.address(), &address);

        registry.set_network(Some(NetworkId::from("alephzero-testnet")));
        assert_eq!(registry.lookup(ContractId::GuessSecret), None);

        registry.set_network(None);
        assert_eq!(registry.lookup(ContractId::GuessSecret), None);
    }

    #[test]
    fn test_load_dir_reads_records() {
        let dir = temp_dir("load");
        let address = AccountId::repeat_byte(0x42);
        let record = DeploymentRecord::new(
            NetworkId::from("development"),
            ContractId::GuessSecret,
            &address,
        );
        let path = record.path_in(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, toml::to_string(&record).unwrap()).unwrap();

        let registry = ContractRegistry::load_dir(&dir).unwrap();
        assert_eq!(registry.len(), 1);
        registry.set_network(Some(NetworkId::from("development")));
        assert_eq!(
            registry.lookup(ContractId::GuessSecret).unwrap().address(),
            &address
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let registry = ContractRegistry::load_dir(&temp_dir("missing")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bad_address_is_rejected() {
        let dir = temp_dir("bad");
        let contract_dir = dir.join("guess_secret");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::write(
            contract_dir.join("development.toml"),
            "network = \"development\"\ncontract = \"guess_secret\"\naddress = \"0x1234\"\n",
        )
        .unwrap();

        let err = ContractRegistry::load_dir(&dir).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { .. }));

        fs::remove_dir_all(&dir).ok();
    }
}
