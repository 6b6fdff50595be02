//! # Deploy Guess Secret
//!
//! One-shot deployment of the guess-secret contract.
//!
//! ```text
//! CHAIN=development DIR=./deployments cargo run --bin deploy_guess_secret
//! ```
//!
//! Only the local development chain is reachable from here; other chains
//! need an RPC transport and fail with exit code 1.

use std::process;

use guess_secret::chain::{
    deploy_guess_secret, DeployConfig, DeployError, DevSigner, LocalChain,
};
use guess_secret::shared::{ContractHandle, DEFAULT_CHAIN};

async fn run(config: &DeployConfig) -> Result<ContractHandle, DeployError> {
    if config.chain.as_str() != DEFAULT_CHAIN {
        return Err(DeployError::UnsupportedChain(config.chain.clone()));
    }

    let chain = LocalChain::new(config.chain.clone());
    deploy_guess_secret(&chain, &DevSigner::context("alice"), config).await
}

fn main() {
    tracing_subscriber::fmt::init();

    let config = DeployConfig::from_env();
    tracing::info!(
        "Deploying guess_secret to {} (records in {})",
        config.chain,
        config.dir.display()
    );

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("Cannot start runtime: {}", err);
            process::exit(1);
        }
    };

    match runtime.block_on(run(&config)) {
        Ok(handle) => {
            println!("guess_secret deployed at {}", handle.address());
            process::exit(0);
        }
        Err(err) => {
            tracing::error!("{}", err);
            process::exit(1);
        }
    }
}
