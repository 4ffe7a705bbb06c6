//! Sending contract creation transactions

use std::{future::Future, time::Duration};

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use alloy_primitives::{Address, Bytes, TxHash};
use tracing::debug;

use crate::{
    constants::{RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL_MS},
    errors::ScriptError,
    utils::DeployClient,
};

/// Something that can deploy contracts on behalf of a single account
pub trait ContractDeployer {
    /// The address of the account signing and paying for deployments
    fn deployer_address(&self) -> Address;

    /// Deploy a contract with the given init code (creation bytecode followed
    /// by the encoded constructor arguments), resolving to the address of the
    /// deployed contract once the deployment is confirmed
    fn deploy(&self, init_code: Bytes) -> impl Future<Output = Result<Address, ScriptError>>;
}

/// A [`ContractDeployer`] sending transactions through a JSON-RPC provider
/// with the deployer's wallet attached
pub struct RpcDeployer {
    /// The provider, which signs with the deployer's key
    provider: DynProvider,
    /// The deployer's address
    deployer: Address,
    /// The chain deployed to
    chain_id: u64,
    /// The number of times to query for a deployment's receipt
    receipt_attempts: usize,
    /// The delay between receipt queries
    receipt_interval: Duration,
}

impl RpcDeployer {
    /// Create a deployer from a connected client
    pub fn new(client: DeployClient) -> Self {
        let DeployClient {
            provider,
            deployer,
            chain_id,
        } = client;

        Self {
            provider,
            deployer,
            chain_id,
            receipt_attempts: RECEIPT_POLL_ATTEMPTS,
            receipt_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
        }
    }

    /// Set how many times, and how often, to query for a deployment's receipt
    pub fn with_receipt_polling(mut self, attempts: usize, interval: Duration) -> Self {
        self.receipt_attempts = attempts;
        self.receipt_interval = interval;
        self
    }

    /// The chain ID of the network deployed to
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Poll for the receipt of the given transaction.
    ///
    /// The pending transaction watcher in this version of alloy can miss
    /// inclusion, so the receipt is fetched directly with a bounded number of
    /// attempts.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, ScriptError> {
        for _ in 0..self.receipt_attempts {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

            match receipt {
                Some(receipt) => return Ok(receipt),
                None => tokio::time::sleep(self.receipt_interval).await,
            }
        }

        Err(ScriptError::ContractDeployment(format!(
            "no receipt for deployment transaction {:#x} after {} attempts",
            tx_hash, self.receipt_attempts
        )))
    }
}

impl ContractDeployer for RpcDeployer {
    fn deployer_address(&self) -> Address {
        self.deployer
    }

    async fn deploy(&self, init_code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(init_code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        let tx_hash = *pending_tx.tx_hash();
        debug!("deployment transaction sent: {:#x}", tx_hash);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        deployed_address(&receipt)
    }
}

/// The address of the contract created by a deployment, failing if the
/// deployment reverted or created no contract
pub fn deployed_address(receipt: &TransactionReceipt) -> Result<Address, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt for {:#x}",
            receipt.transaction_hash
        ))
    })
}
