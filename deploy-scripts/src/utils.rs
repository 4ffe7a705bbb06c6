//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::Address;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::ResolvedNetwork,
    constants::{DEFAULT_LOG_FILTER, LOG_FILTER_ENV_VAR},
    errors::ScriptError,
};

/// A connected provider along with the account it signs for
pub struct DeployClient {
    /// The provider, with the deployer's wallet attached
    pub provider: DynProvider,
    /// The deployer's address
    pub deployer: Address,
    /// The chain ID reported by the RPC endpoint
    pub chain_id: u64,
}

/// Sets up the provider with which to deploy contracts, signing with the
/// network's private key
pub async fn setup_client(network: &ResolvedNetwork) -> Result<DeployClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(network.private_key.trim())
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid private key: {}", e)))?;
    let deployer = signer.address();

    let url = Url::parse(&network.rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid RPC URL: {}", e)))?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!("Connected to {} (chain id {})", network.name, chain_id);

    Ok(DeployClient {
        provider,
        deployer,
        chain_id,
    })
}

/// Install the global `tracing` subscriber, filtering with `RUST_LOG` if set
pub fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
