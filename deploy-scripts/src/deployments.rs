//! Recording deployed contract addresses in a `deployments.json` file.
//!
//! The file maps network names to the deployment last made on that network:
//!
//! ```json
//! {
//!     "sepolia": {
//!         "chain_id": 11155111,
//!         "deployer": "0x...",
//!         "contracts": { "Vault": "0x...", "MainProject": "0x...", "GovernanceToken": "0x..." }
//!     }
//! }
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{commands::DeployedContract, errors::ScriptError};

/// The contents of a deployments file, keyed by network name
pub type DeploymentsFile = BTreeMap<String, DeploymentRecord>;

/// The addresses produced by a single deployment run on one network
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The chain the contracts were deployed to
    pub chain_id: u64,
    /// The account that deployed the contracts
    pub deployer: Address,
    /// The deployed addresses, keyed by contract name
    pub contracts: BTreeMap<String, Address>,
}

impl DeploymentRecord {
    /// Build a record from the contracts deployed in a run
    pub fn new(chain_id: u64, deployer: Address, deployed: &[DeployedContract]) -> Self {
        let contracts = deployed
            .iter()
            .map(|d| (d.target.contract_name().to_string(), d.address))
            .collect();

        Self {
            chain_id,
            deployer,
            contracts,
        }
    }
}

/// Read a deployments file, treating a missing file as empty
pub fn read_deployments(path: &Path) -> Result<DeploymentsFile, ScriptError> {
    if !path.exists() {
        return Ok(DeploymentsFile::new());
    }

    let contents =
        fs::read_to_string(path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployment under the given network, keeping other networks' records
pub fn write_deployment(
    path: &Path,
    network: &str,
    record: DeploymentRecord,
) -> Result<(), ScriptError> {
    let mut deployments = read_deployments(path)?;
    deployments.insert(network.to_string(), record);

    let json = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(path, json).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}
